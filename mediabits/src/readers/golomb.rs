//! Exp-Golomb bit reader for H.264/H.265 RBSPs.
//!
//! Bits are consumed MSB-first from an RBSP whose emulation prevention bytes
//! have already been removed. Fixed-width fields are read with
//! [`ExpGolombReader::read_bits`], `ue(v)` and `se(v)` with
//! [`ExpGolombReader::read_ue`] and [`ExpGolombReader::read_se`].

use std::io;

use bitstream_io::{BigEndian, BitRead, BitReader};
use log::debug;

use crate::utils::errors::{BitReadError, BitResult};
use crate::utils::trailing::{last_one_bit, more_data_before_stop_bit};

/// Longest prefix run accepted by [`ExpGolombReader::read_ue`].
pub const MAX_LEADING_ZEROS: u32 = 31;

/// Widest fixed-length field accepted by [`ExpGolombReader::read_bits`].
pub const MAX_READ_BITS: u32 = 64;

#[derive(Debug)]
pub struct ExpGolombReader<'a> {
    bs: BitReader<io::Cursor<&'a [u8]>, BigEndian>,
    len: u64,
    position: u64,
    stop_bit: Option<u64>,
}

impl<'a> ExpGolombReader<'a> {
    pub fn new(rbsp: &'a [u8]) -> Self {
        Self {
            bs: BitReader::new(io::Cursor::new(rbsp)),
            len: (rbsp.len() as u64) << 3,
            position: 0,
            stop_bit: last_one_bit(rbsp),
        }
    }

    /// Reads the next bit. At the end of the buffer this fails on every call
    /// and the cursor stays put.
    #[inline(always)]
    pub fn read_bit(&mut self) -> BitResult<bool> {
        if self.position >= self.len {
            return Err(self.exhausted());
        }

        let bit = self.bs.read_bit().map_err(|_| self.exhausted())?;
        self.position += 1;

        Ok(bit)
    }

    /// Reads `n` bits as a big-endian unsigned value.
    ///
    /// Bits are taken one at a time, so running out of data part way through
    /// leaves the bits already taken consumed.
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

    /// Decodes `ue(v)`.
    pub fn read_ue(&mut self) -> BitResult<u32> {
        let start = self.position;

        let mut leading_zeros = 0u32;
        while !self.read_bit()? {
            leading_zeros += 1;
            if leading_zeros > MAX_LEADING_ZEROS {
                debug!("ue(v) prefix longer than {MAX_LEADING_ZEROS} bits at bit {start}");
                return Err(BitReadError::MalformedCode {
                    leading_zeros,
                    position: start,
                });
            }
        }

        if leading_zeros == 0 {
            return Ok(0);
        }

        let suffix = self.read_bits(leading_zeros)?;

        // At most 2^32 - 2 with a 31-bit prefix.
        Ok(((1u64 << leading_zeros) - 1 + suffix) as u32)
    }

    /// Decodes `se(v)`: `ue` values 0, 1, 2, 3, 4 map to 0, 1, -1, 2, -2.
    pub fn read_se(&mut self) -> BitResult<i32> {
        let ue = self.read_ue()?;

        if ue & 1 == 1 {
            Ok((ue / 2 + 1) as i32)
        } else {
            Ok(-((ue / 2) as i32))
        }
    }

    pub fn skip_ue(&mut self) -> BitResult<()> {
        self.read_ue().map(|_| ())
    }

    pub fn skip_se(&mut self) -> BitResult<()> {
        self.read_se().map(|_| ())
    }

    pub fn skip_bits(&mut self, n: u64) -> BitResult<()> {
        for _ in 0..n {
            self.read_bit()?;
        }

        Ok(())
    }

    /// `more_rbsp_data()`: true while unread bits precede the stop bit.
    pub fn more_rbsp_data(&self) -> bool {
        more_data_before_stop_bit(self.stop_bit, self.position)
    }

    #[inline(always)]
    pub fn position(&self) -> u64 {
        self.position
    }

    #[inline(always)]
    pub fn bits_remaining(&self) -> u64 {
        self.len - self.position
    }

    #[inline(always)]
    pub fn is_byte_aligned(&self) -> bool {
        self.position & 7 == 0
    }

    fn exhausted(&self) -> BitReadError {
        BitReadError::Exhausted {
            position: self.position,
            len: self.len,
        }
    }
}

impl Default for ExpGolombReader<'_> {
    fn default() -> Self {
        Self::new(&[])
    }
}
