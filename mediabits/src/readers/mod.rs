/// Exp-Golomb reader for H.264/H.265 RBSPs.
///
/// Provides [`ExpGolombReader`](golomb::ExpGolombReader) with fixed-width,
/// `ue(v)` and `se(v)` reads.
pub mod golomb;

/// AV1 OBU reader.
///
/// Provides [`Av1BitReader`](obu::Av1BitReader) for fixed-width fields and the
/// free-standing [`decode_leb128`](obu::decode_leb128).
pub mod obu;
