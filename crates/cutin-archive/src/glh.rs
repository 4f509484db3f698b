//! GLH wrapper around a GLZ stream.
//!
//! Every item in a Cutin archive is a GLH envelope: a 32-byte little-endian
//! header followed by a complete GLZ stream.

use cutin_common::{i32_field, BinaryReader};
use cutin_glz::FORMAT_TAG;
use tracing::{trace, warn};
use zerocopy::byteorder::little_endian::I32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::Result;

/// GLH envelope magic bytes.
pub const GLH_MAGIC: &[u8; 4] = b"0HLG";

/// Value of the header's version field in files we write.
pub const GLH_VERSION: i32 = 1;

/// Size of the GLH header.
pub const GLH_HEADER_SIZE: usize = 0x20;

/// GLH envelope header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct GlhHeader {
    /// Magic (`0HLG`).
    pub magic: [u8; 4],
    /// Format tag, shared with the inner GLZ header.
    pub format_tag: I32,
    /// Unknown; always 1 in known files and never checked.
    pub version: I32,
    /// Decompressed image length.
    pub original_size: I32,
    /// Header plus GLZ stream length.
    pub wrapped_size: I32,
    /// Reserved, zero.
    pub reserved: [u8; 12],
}

const _: () = assert!(std::mem::size_of::<GlhHeader>() == GLH_HEADER_SIZE);

impl GlhHeader {
    /// Read a header from the start of `data`.
    ///
    /// The magic is not checked here; see [`is_glh`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        Ok(BinaryReader::new(data).read_struct()?)
    }
}

/// Check whether `data` starts with the GLH magic.
#[inline]
pub fn is_glh(data: &[u8]) -> bool {
    data.starts_with(GLH_MAGIC)
}

/// Unwrap a GLH envelope and decompress the GLZ stream inside it.
///
/// Data without the `0HLG` magic is logged and returned unchanged. The header
/// sizes are not used to bound the inner stream: everything after the header
/// is handed to [`cutin_glz::decompress`], which applies the same
/// pass-through rule to its own magic.
pub fn unwrap(data: &[u8]) -> Result<Vec<u8>> {
    if !is_glh(data) {
        warn!("Invalid GLH data, passing {} bytes through unchanged", data.len());
        return Ok(data.to_vec());
    }

    let mut reader = BinaryReader::new(data);
    let header: GlhHeader = reader.read_struct()?;

    trace!(
        "Unwrapping GLH: declared {} original bytes, {} wrapped bytes",
        header.original_size.get(),
        header.wrapped_size.get()
    );

    Ok(cutin_glz::decompress(reader.remaining_bytes())?)
}

/// Compress `data` and wrap it in a GLH envelope.
pub fn wrap(data: &[u8]) -> Result<Vec<u8>> {
    let glz = cutin_glz::compress(data)?;
    let wrapped_len = GLH_HEADER_SIZE + glz.len();

    let header = GlhHeader {
        magic: *GLH_MAGIC,
        format_tag: I32::new(FORMAT_TAG),
        version: I32::new(GLH_VERSION),
        original_size: I32::new(i32_field(data.len())?),
        wrapped_size: I32::new(i32_field(wrapped_len)?),
        reserved: [0; 12],
    };

    let mut output = Vec::with_capacity(wrapped_len);
    output.extend_from_slice(header.as_bytes());
    output.extend_from_slice(&glz);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_wrap_header() {
        let data = b"a small texture a small texture";
        let wrapped = wrap(data).unwrap();
        let header = GlhHeader::parse(&wrapped).unwrap();

        assert_eq!(&header.magic, GLH_MAGIC);
        assert_eq!(header.format_tag.get(), 0x01105030);
        assert_eq!(header.version.get(), 1);
        assert_eq!(header.original_size.get() as usize, data.len());
        assert_eq!(header.wrapped_size.get() as usize, wrapped.len());
        assert!(cutin_glz::is_glz(&wrapped[GLH_HEADER_SIZE..]));
    }

    #[test]
    fn test_wrap_unwrap() {
        let data: Vec<u8> = (0..3000u32).map(|i| (i * 7 % 13) as u8).collect();
        assert_eq!(unwrap(&wrap(&data).unwrap()).unwrap(), data);
        assert!(unwrap(&wrap(&[]).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_magic_passes_through() {
        let data = wrap(b"payload payload payload").unwrap();
        let mut bad = data.clone();
        bad[0] = b'X';
        assert_eq!(unwrap(&bad).unwrap(), bad);

        // A bare GLZ stream is not a GLH envelope either.
        let glz = cutin_glz::compress(b"payload").unwrap();
        assert_eq!(unwrap(&glz).unwrap(), glz);
    }

    #[test]
    fn test_inner_pass_through() {
        let mut data = vec![0u8; GLH_HEADER_SIZE];
        data[..4].copy_from_slice(GLH_MAGIC);
        data.extend_from_slice(b"raw bytes");
        assert_eq!(unwrap(&data).unwrap(), b"raw bytes");
    }

    #[test]
    fn test_version_is_not_checked() {
        let mut data = wrap(b"abcdabcdabcd").unwrap();
        data[8..12].copy_from_slice(&77i32.to_le_bytes());
        data[12..20].fill(0xFF);
        assert_eq!(unwrap(&data).unwrap(), b"abcdabcdabcd");
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(unwrap(b"0HLG\x00\x00"), Err(Error::Common(_))));
    }
}
