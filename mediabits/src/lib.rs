#![doc = include_str!("../README.md")]
//!
//! ## Technical Overview
//!
//! Two independent readers over immutable payload slices, both MSB-first.
//!
//! ### H.264/H.265
//!
//! [`readers::golomb::ExpGolombReader`] consumes an RBSP bit by bit. `ue(v)`
//! prefixes longer than 31 zero bits are rejected as malformed.
//!
//! ### AV1
//!
//! [`readers::obu::Av1BitReader`] reads fixed-width fields of up to 64 bits.
//! [`readers::obu::decode_leb128`] decodes `leb128()` values straight from
//! bytes and gives up after 10 bytes.
//!
//! ### Failure Model
//!
//! Reads are not atomic. A read that runs out of data keeps the bits it
//! consumed before failing, so a reader that returned an error is finished.

/// Bit readers for codec payloads.
///
/// - **Exp-Golomb** ([`readers::golomb`]): H.264/H.265 RBSP fields
/// - **OBU** ([`readers::obu`]): AV1 fields and `leb128()`
pub mod readers;

/// Descriptor driven field decoding over either reader.
pub mod process;

/// Utility functions and supporting infrastructure.
///
/// - **Error Handling** ([`utils::errors`]): Error types
/// - **Trailing Bits** ([`utils::trailing`]): Stop bit detection
pub mod utils;
