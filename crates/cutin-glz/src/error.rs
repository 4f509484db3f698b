//! Error types for the GLZ codec.

use thiserror::Error;

/// Errors that can occur when encoding or decoding GLZ streams.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] cutin_common::Error),

    /// The token stream ended in the middle of a back-reference.
    #[error("GLZ stream truncated inside a token at offset {position:#x}")]
    TruncatedToken { position: usize },

    /// A back-reference points outside the bytes decoded so far.
    #[error("invalid back-reference: distance {distance} with only {available} bytes decoded")]
    InvalidBackReference { distance: u8, available: usize },

    /// A back-reference token to encode has a distance outside `1..=254`.
    #[error("back-reference distance {0} is outside 1..=254")]
    InvalidDistance(u8),
}

/// Result type for GLZ operations.
pub type Result<T> = std::result::Result<T, Error>;
