//! AV1 OBU bit reader and `leb128()` decoding.

use log::debug;

use crate::utils::errors::{BitReadError, BitResult};
use crate::utils::trailing::{last_one_bit, more_data_before_stop_bit};

/// Widest field accepted by [`Av1BitReader::read_bits`].
pub const MAX_READ_BITS: u32 = 64;

/// Bytes scanned before a base-128 value is treated as unterminated.
/// Ten 7-bit groups cover a 64-bit value.
pub const MAX_LEB128_BYTES: usize = 10;

/// MSB-first reader over an OBU payload, tracked as a (byte, bit) pair.
#[derive(Debug)]
pub struct Av1BitReader<'a> {
    data: &'a [u8],
    byte_pos: usize,
    bit_pos: u8,
    stop_bit: Option<u64>,
}

impl<'a> Av1BitReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            data: payload,
            byte_pos: 0,
            bit_pos: 0,
            stop_bit: last_one_bit(payload),
        }
    }

    #[inline(always)]
    pub fn read_bit(&mut self) -> BitResult<bool> {
        let Some(&byte) = self.data.get(self.byte_pos) else {
            return Err(BitReadError::Exhausted {
                position: self.position(),
                len: self.len(),
            });
        };

        let bit = (byte >> (7 - self.bit_pos)) & 1;

        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }

        Ok(bit == 1)
    }

    /// Reads `n` bits, `n` in `0..=64`, as a big-endian unsigned value.
    ///
    /// A width outside that range fails before touching the cursor. Running
    /// out of data part way leaves the bits already taken consumed.
    #[inline(always)]
    pub fn read_bits(&mut self, n: u32) -> BitResult<u64> {
        if n > MAX_READ_BITS {
            return Err(BitReadError::InvalidWidth(n));
        }

        let mut value = 0u64;
        for _ in 0..n {
            value = (value << 1) | u64::from(self.read_bit()?);
        }

        Ok(value)
    }

    /// `leb128()` read through the bit cursor, one byte-sized group at a time.
    pub fn read_leb128(&mut self) -> BitResult<u64> {
        let start = self.position();

        let mut value = 0u64;
        for i in 0..MAX_LEB128_BYTES {
            let byte = self.read_bits(8)?;
            value |= (byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }

        debug!("leb128() at bit {start} not terminated within {MAX_LEB128_BYTES} bytes");
        Err(BitReadError::UnterminatedVarUint {
            scanned: MAX_LEB128_BYTES,
        })
    }

    pub fn skip_bits(&mut self, n: u64) -> BitResult<()> {
        for _ in 0..n {
            self.read_bit()?;
        }

        Ok(())
    }

    /// Whether unread bits precede `trailing_bits()`.
    pub fn has_more_data(&self) -> bool {
        more_data_before_stop_bit(self.stop_bit, self.position())
    }

    #[inline(always)]
    pub fn byte_pos(&self) -> usize {
        self.byte_pos
    }

    #[inline(always)]
    pub fn bit_pos(&self) -> u8 {
        self.bit_pos
    }

    #[inline(always)]
    pub fn position(&self) -> u64 {
        ((self.byte_pos as u64) << 3) + u64::from(self.bit_pos)
    }

    #[inline(always)]
    pub fn bits_remaining(&self) -> u64 {
        self.len() - self.position()
    }

    #[inline(always)]
    pub fn is_byte_aligned(&self) -> bool {
        self.bit_pos == 0
    }

    fn len(&self) -> u64 {
        (self.data.len() as u64) << 3
    }
}

/// Decodes a little-endian base-128 integer from the start of `data`.
///
/// Returns the value and the number of bytes it occupied. At most
/// [`MAX_LEB128_BYTES`] are scanned; groups beyond bit 63 are dropped.
pub fn decode_leb128(data: &[u8]) -> BitResult<(u64, usize)> {
    let mut value = 0u64;

    for (i, &byte) in data.iter().take(MAX_LEB128_BYTES).enumerate() {
        value |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(BitReadError::UnterminatedVarUint {
        scanned: data.len().min(MAX_LEB128_BYTES),
    })
}
