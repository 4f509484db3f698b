//! Cutin item directory.
//!
//! The container is a flat big-endian directory:
//!
//! ```text
//! i32  item_count
//! repeat item_count times (or until fewer than 8 bytes remain):
//!     i32  item_id
//!     i32  item_size
//!     u8[item_size]  GLH envelope
//! ```

use byteorder::{BigEndian, WriteBytesExt};
use cutin_common::{i32_field, BinaryReader};
use tracing::debug;

use crate::glh;
use crate::{Error, Result};

/// Size of an item record's id and size fields.
const RECORD_HEADER_SIZE: usize = 8;

/// An item record as stored, borrowing its GLH envelope from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawItem<'a> {
    /// Item id.
    pub id: i32,
    /// Wrapped (GLH) bytes.
    pub data: &'a [u8],
}

impl RawItem<'_> {
    /// Unwrap and decompress this item.
    pub fn decode(&self) -> Result<CutinItem> {
        Ok(CutinItem {
            id: self.id,
            data: glh::unwrap(self.data)?,
        })
    }
}

/// A decoded item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutinItem {
    /// Item id.
    pub id: i32,
    /// Decompressed image bytes.
    pub data: Vec<u8>,
}

/// Read the item records of a Cutin file without decoding them.
///
/// The declared count is only an upper bound: reading stops early once fewer
/// than 8 bytes remain. A record whose size runs past the end of the file is
/// an error.
pub fn read_directory(file: &[u8]) -> Result<Vec<RawItem<'_>>> {
    let mut reader = BinaryReader::new(file);
    let declared = reader.read_i32_be()?;

    let mut items = Vec::new();
    for _ in 0..declared.max(0) {
        if reader.remaining() < RECORD_HEADER_SIZE {
            debug!(
                "Directory declares {} items but only {} are present",
                declared,
                items.len()
            );
            break;
        }

        let id = reader.read_i32_be()?;
        let size = reader.read_i32_be()?;
        let size = usize::try_from(size).map_err(|_| Error::InvalidItemSize { id, size })?;
        let data = reader.read_bytes(size)?;

        items.push(RawItem { id, data });
    }

    Ok(items)
}

/// Unpack a Cutin file into its decompressed items, in file order.
///
/// # Example
///
/// ```
/// let file = cutin_archive::pack(&[b"first image".as_slice(), b"second".as_slice()])?;
/// let items = cutin_archive::unpack(&file)?;
///
/// assert_eq!(items[1].id, 1);
/// assert_eq!(items[1].data, b"second");
/// # Ok::<(), cutin_archive::Error>(())
/// ```
pub fn unpack(file: &[u8]) -> Result<Vec<CutinItem>> {
    read_directory(file)?.iter().map(RawItem::decode).collect()
}

/// Pack images into a Cutin file, assigning ids `0..n` in order.
pub fn pack<T: AsRef<[u8]>>(images: &[T]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    output.write_i32::<BigEndian>(i32_field(images.len())?)?;

    for (index, image) in images.iter().enumerate() {
        let wrapped = glh::wrap(image.as_ref())?;

        output.write_i32::<BigEndian>(i32_field(index)?)?;
        output.write_i32::<BigEndian>(i32_field(wrapped.len())?)?;
        output.extend_from_slice(&wrapped);
    }

    Ok(output)
}
