//! GLZ decompression.

use cutin_common::BinaryReader;
use tracing::{trace, warn};

use crate::header::GlzHeader;
use crate::{is_glz, Error, Result, HEADER_SIZE};

/// Upper bound on output bytes per stream byte (a 3-byte back-reference
/// copies at most 255 bytes), used to cap the untrusted size hint.
const MAX_EXPANSION: usize = 85;

/// Decompress a GLZ stream.
///
/// Data that does not start with the `0ZLG` magic is not GLZ; it is logged
/// and returned unchanged, so `Ok` does not by itself mean anything was
/// decoded. Use [`is_glz`] first when the distinction matters.
///
/// The header's size fields are informational. Only the marker byte is
/// used; `original_size` just pre-sizes the output.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if !is_glz(data) {
        warn!("Invalid GLZ data, passing {} bytes through unchanged", data.len());
        return Ok(data.to_vec());
    }

    let mut reader = BinaryReader::new(data);
    let header: GlzHeader = reader.read_struct()?;
    let stream = reader.remaining_bytes();

    let size_hint = header
        .original_len()
        .unwrap_or(0)
        .min(stream.len().saturating_mul(MAX_EXPANSION));

    trace!(
        "Decoding GLZ stream: {} token bytes, marker {:#04x}, declared size {}",
        stream.len(),
        header.marker,
        header.original_size.get()
    );

    decode_stream(stream, header.marker, size_hint)
}

fn decode_stream(stream: &[u8], marker: u8, size_hint: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(size_hint);
    let mut bytes = stream.iter().copied().enumerate();

    while let Some((_, byte)) = bytes.next() {
        if byte != marker {
            output.push(byte);
            continue;
        }

        let (position, mut distance) = bytes.next().ok_or(Error::TruncatedToken {
            position: HEADER_SIZE + stream.len(),
        })?;

        if distance == marker {
            output.push(marker);
            continue;
        }
        if distance > marker {
            distance -= 1;
        }

        let (_, count) = bytes.next().ok_or(Error::TruncatedToken {
            position: HEADER_SIZE + position,
        })?;

        copy_back_reference(&mut output, distance, count)?;
    }

    Ok(output)
}

/// Append `count` bytes, each read from `distance` bytes behind the current end.
///
/// Bytes are copied one at a time so that a run longer than its distance
/// repeats the bytes it has just written.
fn copy_back_reference(output: &mut Vec<u8>, distance: u8, count: u8) -> Result<()> {
    if count == 0 {
        return Ok(());
    }

    let back = usize::from(distance);
    if back == 0 || back > output.len() {
        return Err(Error::InvalidBackReference {
            distance,
            available: output.len(),
        });
    }

    let start = output.len() - back;
    output.reserve(usize::from(count));
    for i in 0..usize::from(count) {
        let byte = output[start + i];
        output.push(byte);
    }

    Ok(())
}
