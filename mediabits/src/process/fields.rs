//! Syntax-descriptor driven field decoding.
//!
//! Descriptors use codec syntax table notation: `u(n)`, `f(n)`, `ue(v)`,
//! `se(v)`, `leb128()` and `skip(n)`, optionally prefixed with a field name
//! as in `seq_parameter_set_id:ue(v)`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use log::{debug, trace};
use serde::{Serialize, Serializer};

use crate::readers::golomb::{self, ExpGolombReader};
use crate::readers::obu::{self, Av1BitReader};
use crate::utils::errors::{FieldError, FieldSpecError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `u(n)`
    U(u32),
    /// `f(n)`
    F(u32),
    /// `ue(v)`
    Ue,
    /// `se(v)`
    Se,
    /// `leb128()`
    Leb128,
    /// Discard `n` bits.
    Skip(u32),
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::U(n) => write!(f, "u({n})"),
            FieldKind::F(n) => write!(f, "f({n})"),
            FieldKind::Ue => write!(f, "ue(v)"),
            FieldKind::Se => write!(f, "se(v)"),
            FieldKind::Leb128 => write!(f, "leb128()"),
            FieldKind::Skip(n) => write!(f, "skip({n})"),
        }
    }
}

impl FromStr for FieldKind {
    type Err = FieldSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let desc = s.trim();
        if desc.is_empty() {
            return Err(FieldSpecError::Empty);
        }

        let (head, arg) = match desc.split_once('(') {
            Some((head, rest)) => {
                let arg = rest
                    .strip_suffix(')')
                    .ok_or_else(|| FieldSpecError::UnknownDescriptor(desc.to_string()))?;
                (head.trim(), Some(arg.trim()))
            }
            None => (desc, None),
        };

        match (head, arg) {
            ("u", Some(n)) => Ok(FieldKind::U(parse_width(desc, n)?)),
            ("f", Some(n)) => Ok(FieldKind::F(parse_width(desc, n)?)),
            ("skip", Some(n)) => n
                .parse()
                .map(FieldKind::Skip)
                .map_err(|_| FieldSpecError::InvalidBitCount(desc.to_string())),
            ("ue", Some("v") | None) => Ok(FieldKind::Ue),
            ("se", Some("v") | None) => Ok(FieldKind::Se),
            ("leb128", Some("") | None) => Ok(FieldKind::Leb128),
            _ => Err(FieldSpecError::UnknownDescriptor(desc.to_string())),
        }
    }
}

fn parse_width(desc: &str, n: &str) -> Result<u32, FieldSpecError> {
    let n: u32 = n
        .parse()
        .map_err(|_| FieldSpecError::InvalidBitCount(desc.to_string()))?;

    // Both readers share the same fixed-width cap.
    if n > golomb::MAX_READ_BITS.min(obu::MAX_READ_BITS) {
        return Err(FieldSpecError::BitCountTooLarge(n));
    }

    Ok(n)
}

/// A descriptor with an optional field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: Option<String>,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: Some(name.into()),
            kind,
        }
    }
}

impl Display for FieldSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}:{}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl FromStr for FieldSpec {
    type Err = FieldSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, desc) = match s.split_once(':') {
            Some((name, desc)) => (Some(name.trim()), desc),
            None => (None, s),
        };

        Ok(Self {
            name: name.filter(|n| !n.is_empty()).map(str::to_string),
            kind: desc.parse()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Unsigned(u64),
    Signed(i64),
    Skipped,
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Unsigned(v) => write!(f, "{v}"),
            FieldValue::Signed(v) => write!(f, "{v}"),
            FieldValue::Skipped => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedField {
    pub name: Option<String>,
    pub descriptor: String,
    pub bit_offset: u64,
    pub bit_len: u64,
    pub value: FieldValue,
}

impl Display for DecodedField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}+{}] {} {} = {}",
            self.bit_offset,
            self.bit_len,
            self.name.as_deref().unwrap_or("-"),
            self.descriptor,
            self.value
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    pub index: usize,
    pub field: String,
    pub bit_offset: u64,
    #[serde(serialize_with = "serialize_display")]
    pub error: FieldError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReport {
    pub reader: &'static str,
    pub fields: Vec<DecodedField>,
    pub failure: Option<FieldFailure>,
    pub bits_consumed: u64,
    pub bits_remaining: u64,
    pub more_data: bool,
}

fn serialize_display<T: Display, S: Serializer>(value: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}

/// A reader that can decode syntax descriptors.
///
/// Each reader accepts only the descriptors its syntax uses and refuses the
/// rest with [`FieldError::Unsupported`].
pub trait FieldSource {
    const READER: &'static str;

    fn read_field(&mut self, kind: &FieldKind) -> Result<FieldValue, FieldError>;

    fn position(&self) -> u64;

    fn bits_remaining(&self) -> u64;

    /// Whether payload remains before the trailing bits.
    fn more_data(&self) -> bool;

    fn unsupported(kind: &FieldKind) -> FieldError {
        FieldError::Unsupported {
            descriptor: kind.to_string(),
            reader: Self::READER,
        }
    }
}

impl FieldSource for ExpGolombReader<'_> {
    const READER: &'static str = "h26x";

    fn read_field(&mut self, kind: &FieldKind) -> Result<FieldValue, FieldError> {
        let value = match *kind {
            FieldKind::U(n) | FieldKind::F(n) => FieldValue::Unsigned(self.read_bits(n)?),
            FieldKind::Ue => FieldValue::Unsigned(u64::from(self.read_ue()?)),
            FieldKind::Se => FieldValue::Signed(i64::from(self.read_se()?)),
            FieldKind::Skip(n) => {
                self.skip_bits(u64::from(n))?;
                FieldValue::Skipped
            }
            FieldKind::Leb128 => return Err(Self::unsupported(kind)),
        };

        Ok(value)
    }

    fn position(&self) -> u64 {
        ExpGolombReader::position(self)
    }

    fn bits_remaining(&self) -> u64 {
        ExpGolombReader::bits_remaining(self)
    }

    fn more_data(&self) -> bool {
        self.more_rbsp_data()
    }
}

impl FieldSource for Av1BitReader<'_> {
    const READER: &'static str = "av1";

    fn read_field(&mut self, kind: &FieldKind) -> Result<FieldValue, FieldError> {
        let value = match *kind {
            FieldKind::U(n) | FieldKind::F(n) => FieldValue::Unsigned(self.read_bits(n)?),
            FieldKind::Leb128 => FieldValue::Unsigned(self.read_leb128()?),
            FieldKind::Skip(n) => {
                self.skip_bits(u64::from(n))?;
                FieldValue::Skipped
            }
            FieldKind::Ue | FieldKind::Se => return Err(Self::unsupported(kind)),
        };

        Ok(value)
    }

    fn position(&self) -> u64 {
        Av1BitReader::position(self)
    }

    fn bits_remaining(&self) -> u64 {
        Av1BitReader::bits_remaining(self)
    }

    fn more_data(&self) -> bool {
        self.has_more_data()
    }
}

/// Runs descriptors against a reader in order.
#[derive(Debug)]
pub struct FieldDecoder<R: FieldSource> {
    reader: R,
}

impl<R: FieldSource> FieldDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn decode(&mut self, spec: &FieldSpec) -> Result<DecodedField, FieldError> {
        let bit_offset = self.reader.position();
        let value = self.reader.read_field(&spec.kind)?;

        let field = DecodedField {
            name: spec.name.clone(),
            descriptor: spec.kind.to_string(),
            bit_offset,
            bit_len: self.reader.position() - bit_offset,
            value,
        };
        trace!("{}: {field}", R::READER);

        Ok(field)
    }

    /// Decodes every spec, stopping at the first failure. The reader is left
    /// where the failure put it.
    pub fn decode_all(&mut self, specs: &[FieldSpec]) -> FieldReport {
        let mut fields = Vec::with_capacity(specs.len());
        let mut failure = None;

        for (index, spec) in specs.iter().enumerate() {
            let bit_offset = self.reader.position();
            match self.decode(spec) {
                Ok(field) => fields.push(field),
                Err(error) => {
                    debug!(
                        "{}: field #{index} {spec} failed at bit {bit_offset}: {error}",
                        R::READER
                    );
                    failure = Some(FieldFailure {
                        index,
                        field: spec.to_string(),
                        bit_offset,
                        error,
                    });
                    break;
                }
            }
        }

        FieldReport {
            reader: R::READER,
            fields,
            failure,
            bits_consumed: self.reader.position(),
            bits_remaining: self.reader.bits_remaining(),
            more_data: self.reader.more_data(),
        }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::BitReadError;

    fn specs(list: &str) -> Vec<FieldSpec> {
        list.split(',').map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn parses_descriptors() {
        assert_eq!("u(8)".parse(), Ok(FieldKind::U(8)));
        assert_eq!(" f( 1 ) ".parse(), Ok(FieldKind::F(1)));
        assert_eq!("ue(v)".parse(), Ok(FieldKind::Ue));
        assert_eq!("se".parse(), Ok(FieldKind::Se));
        assert_eq!("leb128()".parse(), Ok(FieldKind::Leb128));
        assert_eq!("skip(100)".parse(), Ok(FieldKind::Skip(100)));

        assert_eq!(
            "u(65)".parse::<FieldKind>(),
            Err(FieldSpecError::BitCountTooLarge(65))
        );
        assert_eq!(
            "u(x)".parse::<FieldKind>(),
            Err(FieldSpecError::InvalidBitCount("u(x)".to_string()))
        );
        assert_eq!(
            "ue(8)".parse::<FieldKind>(),
            Err(FieldSpecError::UnknownDescriptor("ue(8)".to_string()))
        );
        assert_eq!("".parse::<FieldKind>(), Err(FieldSpecError::Empty));
    }

    #[test]
    fn parses_named_specs() {
        let spec: FieldSpec = "level_idc:u(8)".parse().unwrap();
        assert_eq!(spec, FieldSpec::new("level_idc", FieldKind::U(8)));
        assert_eq!(spec.to_string(), "level_idc:u(8)");

        let spec: FieldSpec = ":ue(v)".parse().unwrap();
        assert_eq!(spec.name, None);
        assert_eq!(spec.to_string(), "ue(v)");
    }

    #[test]
    fn decodes_sps_head() {
        // profile_idc 100, constraint flags, level_idc 31, sps_id 0, then se(v) -1
        let rbsp = [0x64, 0x00, 0x1F, 0xB0];
        let list = specs("profile_idc:u(8),skip(8),level_idc:u(8),sps_id:ue(v),se(v)");

        let report = FieldDecoder::new(ExpGolombReader::new(&rbsp)).decode_all(&list);

        assert_eq!(report.reader, "h26x");
        assert!(report.failure.is_none());
        let values: Vec<FieldValue> = report.fields.iter().map(|f| f.value).collect();
        assert_eq!(
            values,
            vec![
                FieldValue::Unsigned(100),
                FieldValue::Skipped,
                FieldValue::Unsigned(31),
                FieldValue::Unsigned(0),
                FieldValue::Signed(-1),
            ]
        );
        assert_eq!(report.fields[3].bit_offset, 24);
        assert_eq!(report.fields[4].bit_len, 3);
        assert_eq!(report.bits_consumed, 28);
        assert!(!report.more_data);
    }

    #[test]
    fn stops_at_first_failure() {
        let list = specs("a:u(4),b:ue(v),c:u(1)");
        let mut decoder = FieldDecoder::new(ExpGolombReader::new(&[0xF0]));

        let report = decoder.decode_all(&list);

        assert_eq!(report.fields.len(), 1);
        let failure = report.failure.unwrap();
        assert_eq!(failure.index, 1);
        assert_eq!(failure.field, "b:ue(v)");
        assert_eq!(failure.bit_offset, 4);
        assert_eq!(
            failure.error,
            FieldError::Read(BitReadError::Exhausted {
                position: 8,
                len: 8,
            })
        );
        assert_eq!(decoder.reader().position(), 8);
    }

    #[test]
    fn av1_sequence_header_obu() {
        // obu_header with has_size_field, then obu_size 300
        let payload = [0x0A, 0xAC, 0x02];
        let list = specs(
            "obu_forbidden_bit:f(1),obu_type:u(4),obu_extension_flag:u(1),\
             obu_has_size_field:u(1),obu_reserved_1bit:u(1),obu_size:leb128()",
        );

        let report = FieldDecoder::new(Av1BitReader::new(&payload)).decode_all(&list);

        assert!(report.failure.is_none());
        assert_eq!(report.fields[1].value, FieldValue::Unsigned(1));
        assert_eq!(report.fields[3].value, FieldValue::Unsigned(1));
        assert_eq!(report.fields[5].value, FieldValue::Unsigned(300));
        assert_eq!(report.fields[5].bit_len, 16);
        assert_eq!(report.bits_remaining, 0);
    }

    #[test]
    fn readers_refuse_foreign_descriptors() {
        let mut av1 = FieldDecoder::new(Av1BitReader::new(&[0x80]));
        assert_eq!(
            av1.decode(&FieldSpec::new("x", FieldKind::Ue)),
            Err(FieldError::Unsupported {
                descriptor: "ue(v)".to_string(),
                reader: "av1",
            })
        );
        assert_eq!(av1.reader().position(), 0);

        let mut h26x = FieldDecoder::new(ExpGolombReader::new(&[0x80]));
        assert!(matches!(
            h26x.decode(&FieldSpec::new("x", FieldKind::Leb128)),
            Err(FieldError::Unsupported { reader: "h26x", .. })
        ));
    }

    #[test]
    fn failure_carries_read_error() {
        let report = FieldDecoder::new(Av1BitReader::new(&[0x80])).decode_all(&specs("u(9)"));
        let failure = report.failure.unwrap();

        assert_eq!(failure.error.to_string(), "Out of bits at position 8 of 8");
    }
}
