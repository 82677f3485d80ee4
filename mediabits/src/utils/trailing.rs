//! Trailing-bit detection.
//!
//! RBSPs end with `rbsp_stop_one_bit` followed by zero bits, and AV1 OBUs end
//! with `trailing_bits()` of the same shape. Payload data ends right before the
//! last `1` bit of the buffer.

/// Bit index (MSB-first) of the last `1` bit in `data`, if any.
pub fn last_one_bit(data: &[u8]) -> Option<u64> {
    let (index, byte) = data.iter().enumerate().rev().find(|(_, b)| **b != 0)?;

    Some(((index as u64) << 3) + 7 - u64::from(byte.trailing_zeros()))
}

/// Whether unread payload remains before the stop bit.
#[inline]
pub fn more_data_before_stop_bit(stop_bit: Option<u64>, position: u64) -> bool {
    stop_bit.is_some_and(|stop| position < stop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_stop_bit() {
        assert_eq!(last_one_bit(&[0x80]), Some(0));
        assert_eq!(last_one_bit(&[0x01]), Some(7));
        assert_eq!(last_one_bit(&[0x12, 0x34, 0x80, 0x00]), Some(16));
        assert_eq!(last_one_bit(&[0x00, 0x00]), None);
        assert_eq!(last_one_bit(&[]), None);
    }

    #[test]
    fn more_data_stops_at_stop_bit() {
        assert!(more_data_before_stop_bit(Some(16), 15));
        assert!(!more_data_before_stop_bit(Some(16), 16));
        assert!(!more_data_before_stop_bit(None, 0));
    }
}
