//! Errors raised while decoding sections.

use thiserror::Error;

/// A structural failure decoding a section or one of its nested records.
///
/// Bit counts are relative to the scope of the failing read, not the whole
/// section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A read would leave the scope of its cursor.
    #[error("Read of {requested} bits exceeds the {available} bits remaining in scope.")]
    OutOfBounds { requested: usize, available: usize },
    /// The section is too short to hold its fixed header and checksum.
    #[error("Section of {length} bytes is shorter than the {required} bytes required.")]
    TruncatedHeader { length: usize, required: usize },
    /// A composite did not consume exactly its declared length.
    #[error("Declared length of {expected} bits does not match the {actual} bits decoded.")]
    LengthMismatch { expected: usize, actual: usize },
    /// A recognised wire variant which cannot be decoded.
    #[error("Unsupported feature: {0}.")]
    UnsupportedFeature(&'static str),
    /// Calculated and found checksums do not match.
    #[error("Calculated ({calculated:#010x}) and found ({found:#010x}) checksums do not match.")]
    ChecksumMismatch { found: u32, calculated: u32 },
}
