//! Cutin - texture archive extraction and packing library.
//!
//! This crate ties the Cutin format crates together and adds batch
//! processing of whole directory trees.
//!
//! # Crates
//!
//! - [`cutin_common`] - Common utilities (binary reading)
//! - [`cutin_glz`] - GLZ marker-escaped LZ codec
//! - [`cutin_archive`] - GLH envelopes and the item directory
//!
//! # Example
//!
//! ```no_run
//! use cutin::prelude::*;
//!
//! let file = std::fs::read("bustup.001")?;
//! let items = unpack(&file)?;
//! println!("Items: {}", items.len());
//!
//! let images: Vec<_> = items.into_iter().map(|item| item.data).collect();
//! std::fs::write("bustup.001.repacked", pack(&images)?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use cutin_archive as archive;
pub use cutin_common as common;
pub use cutin_glz as glz;

pub mod batch;
mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::batch::{BatchReport, ImageGroup, TaskProgress};
    pub use cutin_archive::{glh, pack, read_directory, unpack, CutinItem, GlhHeader, RawItem};
    pub use cutin_common::BinaryReader;
    pub use cutin_glz::{compress, decompress, GlzHeader};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
