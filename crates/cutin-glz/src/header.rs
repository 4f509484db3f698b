//! GLZ header structure.

use cutin_common::{i32_field, BinaryReader};
use zerocopy::byteorder::little_endian::I32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Result, FORMAT_TAG, GLZ_MAGIC, HEADER_SIZE};

/// The 32-byte header in front of every GLZ token stream.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct GlzHeader {
    /// Magic (`0ZLG`).
    pub magic: [u8; 4],
    /// Format tag, always [`FORMAT_TAG`] in files we write.
    pub format_tag: I32,
    /// Decompressed length.
    pub original_size: I32,
    /// Header plus token stream length.
    pub compressed_size: I32,
    /// Escape marker byte.
    pub marker: u8,
    /// Reserved, zero.
    pub reserved: [u8; 15],
}

const _: () = assert!(std::mem::size_of::<GlzHeader>() == HEADER_SIZE);

impl GlzHeader {
    /// Build a header for a stream of `token_len` bytes decoding to `original_len` bytes.
    pub fn new(original_len: usize, token_len: usize, marker: u8) -> Result<Self> {
        let total = HEADER_SIZE + token_len;
        Ok(Self {
            magic: *GLZ_MAGIC,
            format_tag: I32::new(FORMAT_TAG),
            original_size: I32::new(i32_field(original_len)?),
            compressed_size: I32::new(i32_field(total)?),
            marker,
            reserved: [0; 15],
        })
    }

    /// Read a header from the start of `data`.
    ///
    /// The magic is not checked here; see [`crate::is_glz`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        Ok(BinaryReader::new(data).read_struct()?)
    }

    /// Declared decompressed length, if it is not negative.
    pub fn original_len(&self) -> Option<usize> {
        usize::try_from(self.original_size.get()).ok()
    }
}
