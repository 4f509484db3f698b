//! GLZ compression.

use tracing::debug;
use zerocopy::IntoBytes;

use crate::header::GlzHeader;
use crate::marker::ByteHistogram;
use crate::token::{encode_tokens, Token};
use crate::{Result, MAX_DISTANCE, MIN_MATCH};

/// Compress `data` into a complete GLZ stream (header and tokens).
///
/// # Example
///
/// ```
/// let packed = cutin_glz::compress(b"abcabcabcabc")?;
/// assert_eq!(&packed[..4], b"0ZLG");
/// assert_eq!(cutin_glz::decompress(&packed)?, b"abcabcabcabc");
/// # Ok::<(), cutin_glz::Error>(())
/// ```
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let (tokens, literals) = tokenize(data);
    let marker = literals.rarest();
    let stream = encode_tokens(&tokens, marker)?;

    let header = GlzHeader::new(data.len(), stream.len(), marker)?;

    debug!(
        "GLZ compressed {} bytes into {} tokens ({} stream bytes, marker {:#04x})",
        data.len(),
        tokens.len(),
        stream.len(),
        marker
    );

    let mut output = Vec::with_capacity(header.as_bytes().len() + stream.len());
    output.extend_from_slice(header.as_bytes());
    output.extend_from_slice(&stream);
    Ok(output)
}

/// Split `data` into greedy literal/back-reference tokens.
///
/// Also returns the frequency of every literal byte, which is what the
/// marker is chosen from.
pub fn tokenize(data: &[u8]) -> (Vec<Token>, ByteHistogram) {
    let mut tokens = Vec::new();
    let mut literals = ByteHistogram::new();

    let mut pos = 0;
    while pos < data.len() {
        let (distance, length) = longest_match(data, pos);

        if length >= MIN_MATCH {
            // distance <= MAX_DISTANCE and length <= distance, both fit a byte
            tokens.push(Token::BackRef {
                distance: distance as u8,
                length: length as u8,
            });
            pos += length;
        } else {
            let byte = data[pos];
            tokens.push(Token::Literal(byte));
            literals.record(byte);
            pos += 1;
        }
    }

    debug_assert_eq!(tokens.iter().map(|t| t.output_len()).sum::<usize>(), data.len());
    (tokens, literals)
}

/// Find the best `(distance, length)` match for `data[pos..]`.
///
/// Distances are tried from farthest to nearest and a tie replaces the
/// current best, so the nearest distance wins among equal lengths. A match
/// never runs longer than its distance.
fn longest_match(data: &[u8], pos: usize) -> (usize, usize) {
    let remaining = data.len() - pos;
    let mut best = (0, 0);

    for distance in (1..=pos.min(MAX_DISTANCE)).rev() {
        let limit = remaining.min(distance);
        let length = data[pos - distance..pos - distance + limit]
            .iter()
            .zip(&data[pos..pos + limit])
            .take_while(|(a, b)| a == b)
            .count();

        if length >= best.1 {
            best = (distance, length);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literals(bytes: &[u8]) -> Vec<Token> {
        bytes.iter().map(|&b| Token::Literal(b)).collect()
    }

    #[test]
    fn test_three_byte_match_stays_literal() {
        let (tokens, _) = tokenize(b"abcXabc");
        assert_eq!(tokens, literals(b"abcXabc"));
    }

    #[test]
    fn test_four_byte_match_uses_back_reference() {
        let (tokens, literal_counts) = tokenize(b"abcdabcd");
        let mut expected = literals(b"abcd");
        expected.push(Token::BackRef { distance: 4, length: 4 });

        assert_eq!(tokens, expected);
        assert_eq!(literal_counts.count(b'a'), 1);
    }

    #[test]
    fn test_match_never_outruns_its_distance() {
        // With no earlier window long enough, a short run stays literal.
        let (tokens, _) = tokenize(b"AAAA");
        assert_eq!(tokens, literals(b"AAAA"));

        let (tokens, _) = tokenize(b"AAAAAAAA");
        let mut expected = literals(b"AAAA");
        expected.push(Token::BackRef { distance: 4, length: 4 });
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_nearest_distance_wins_ties() {
        // At position 8 both distance 4 and distance 8 match "abcd".
        let (tokens, _) = tokenize(b"abcdabcdabcd");
        assert_eq!(tokens[4], Token::BackRef { distance: 4, length: 4 });
        assert_eq!(tokens[5], Token::BackRef { distance: 4, length: 4 });
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_tokens_cover_input() {
        let data: Vec<u8> = (0..2000u32).map(|i| (i % 7 + i / 300) as u8).collect();
        let (tokens, _) = tokenize(&data);
        assert_eq!(tokens.iter().map(|t| t.output_len()).sum::<usize>(), data.len());
    }

    #[test]
    fn test_back_references_do_not_count_as_literals() {
        let data = [9u8; 64];
        let (_, literal_counts) = tokenize(&data);
        assert_eq!(literal_counts.count(9), 4);
    }

    #[test]
    fn test_empty_input() {
        let packed = compress(&[]).unwrap();
        assert_eq!(packed.len(), 32);
        assert_eq!(&packed[12..16], &[32, 0, 0, 0]);
        assert_eq!(packed[16], 0);
    }

    #[test]
    fn test_header_sizes() {
        let data = b"hello hello hello hello";
        let packed = compress(data).unwrap();
        let header = GlzHeader::parse(&packed).unwrap();

        assert_eq!(header.original_size.get() as usize, data.len());
        assert_eq!(header.compressed_size.get() as usize, packed.len());
    }
}
