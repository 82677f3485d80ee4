//! Utility functions and supporting infrastructure.
//!
//! Provides error types and the trailing-bit scan shared by both readers.

pub mod errors;
pub mod trailing;
