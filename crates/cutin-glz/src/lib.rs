//! GLZ codec for Cutin texture archives.
//!
//! GLZ is a byte-oriented LZ scheme with a single escape byte (the
//! *marker*). A stream is a 32-byte header followed by tokens:
//!
//! - any byte other than the marker is a literal
//! - `marker, marker` is a literal marker byte
//! - `marker, distance, count` copies `count` bytes from `distance` bytes back;
//!   stored distances at or above the marker are one too high
//!
//! # Header
//!
//! All fields are little-endian:
//! - 4 bytes: Magic (`0ZLG`)
//! - 4 bytes: Format tag (`0x01105030`)
//! - 4 bytes: Decompressed size
//! - 4 bytes: Compressed size (header included)
//! - 1 byte: Marker
//! - 15 bytes: Reserved
//!
//! # Example
//!
//! ```
//! let image = vec![0x42u8; 1024];
//!
//! let packed = cutin_glz::compress(&image)?;
//! assert!(cutin_glz::is_glz(&packed));
//! assert_eq!(cutin_glz::decompress(&packed)?, image);
//! # Ok::<(), cutin_glz::Error>(())
//! ```

mod compress;
mod decompress;
mod error;
mod header;
pub mod marker;
mod token;

pub use compress::{compress, tokenize};
pub use decompress::decompress;
pub use error::{Error, Result};
pub use header::GlzHeader;
pub use marker::{select_marker, ByteHistogram};
pub use token::{encode_tokens, Token};

/// GLZ stream magic bytes.
pub const GLZ_MAGIC: &[u8; 4] = b"0ZLG";

/// Format tag written into GLZ and GLH headers.
pub const FORMAT_TAG: i32 = 0x01105030;

/// Size of the GLZ header.
pub const HEADER_SIZE: usize = 0x20;

/// Farthest distance a back-reference may reach.
pub const MAX_DISTANCE: usize = 254;

/// Shortest match worth a back-reference token.
pub const MIN_MATCH: usize = 4;

/// Check whether `data` starts with the GLZ magic.
#[inline]
pub fn is_glz(data: &[u8]) -> bool {
    data.starts_with(GLZ_MAGIC)
}
