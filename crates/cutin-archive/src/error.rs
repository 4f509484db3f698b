//! Error types for the Cutin archive crate.

use thiserror::Error;

/// Errors that can occur when reading or writing Cutin archives.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] cutin_common::Error),

    /// GLZ codec error.
    #[error("GLZ error: {0}")]
    Glz(#[from] cutin_glz::Error),

    /// An item record declares a negative size.
    #[error("item {id} has invalid size {size}")]
    InvalidItemSize { id: i32, size: i32 },
}

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, Error>;
