//! Error types for cutin-common.

use thiserror::Error;

/// Common error type for Cutin operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// A length does not fit in a 32-bit header field.
    #[error("size {0} does not fit in a 32-bit field")]
    SizeOverflow(usize),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
