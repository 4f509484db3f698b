//! Error types for batch processing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while processing archives on disk.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Archive format error in a specific file.
    #[error("{}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: cutin_archive::Error,
    },

    /// Directory traversal error.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid file name pattern.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Invalid sort expression.
    #[error("invalid regex: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, source: cutin_archive::Error) -> Self {
        Self::Archive {
            path: path.into(),
            source,
        }
    }
}

/// Result type for batch operations.
pub type Result<T> = std::result::Result<T, Error>;
