//! Conversions for fixed-width header fields.

use crate::{Error, Result};

/// Convert a length to the signed 32-bit value stored in size fields.
pub fn i32_field(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| Error::SizeOverflow(len))
}
