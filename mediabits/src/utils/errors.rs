/// Failure kinds shared by the bit readers.
///
/// A failed read is terminal: the reader keeps whatever bits it consumed
/// before the failure and callers are expected to drop it.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitReadError {
    #[error("Out of bits at position {position} of {len}")]
    Exhausted { position: u64, len: u64 },

    #[error("Exp-Golomb prefix exceeds 31 leading zeros ({leading_zeros}) at bit {position}")]
    MalformedCode { leading_zeros: u32, position: u64 },

    #[error("Bit width must be between 0 and 64. Requested {0}")]
    InvalidWidth(u32),

    #[error("Variable-length integer is not terminated after {scanned} bytes")]
    UnterminatedVarUint { scanned: usize },
}

pub type BitResult<T> = Result<T, BitReadError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldSpecError {
    #[error("Empty field descriptor")]
    Empty,

    #[error("Unknown field descriptor: {0}")]
    UnknownDescriptor(String),

    #[error("Invalid bit count in descriptor {0}")]
    InvalidBitCount(String),

    #[error("Bit count must be between 0 and 64. Got {0}")]
    BitCountTooLarge(u32),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{descriptor} is not supported by the {reader} reader")]
    Unsupported {
        descriptor: String,
        reader: &'static str,
    },

    #[error(transparent)]
    Read(#[from] BitReadError),
}
