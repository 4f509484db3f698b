//! Cutin archive reader and writer.
//!
//! A Cutin archive bundles the texture images of one cut-in animation. Each
//! image is GLZ-compressed, wrapped in a GLH envelope, and listed in a
//! big-endian item directory.
//!
//! # File Format
//!
//! - Directory (big-endian): item count, then `(id, size, bytes)` records
//! - GLH envelope (little-endian, 32-byte header):
//!   - 4 bytes: Magic (`0HLG`)
//!   - 4 bytes: Format tag (`0x01105030`)
//!   - 4 bytes: Version (1)
//!   - 4 bytes: Original size
//!   - 4 bytes: Wrapped size (header included)
//!   - 12 bytes: Reserved
//! - GLZ stream: see [`cutin_glz`]
//!
//! # Example
//!
//! ```no_run
//! use cutin_archive::{pack, unpack};
//!
//! let file = std::fs::read("bustup.001")?;
//! for item in unpack(&file)? {
//!     std::fs::write(format!("bustup.001-{}.dds", item.id), &item.data)?;
//! }
//!
//! let images = [std::fs::read("a.dds")?, std::fs::read("b.dds")?];
//! std::fs::write("bustup.002", pack(&images)?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod directory;
mod error;
pub mod glh;

pub use directory::{pack, read_directory, unpack, CutinItem, RawItem};
pub use error::{Error, Result};
pub use glh::{GlhHeader, GLH_MAGIC};
