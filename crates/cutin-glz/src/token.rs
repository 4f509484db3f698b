//! GLZ token model and serialization.

use crate::{Error, Result, MAX_DISTANCE};

/// One unit of a GLZ token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A byte copied to the output as-is.
    Literal(u8),
    /// Copy `length` bytes starting `distance` bytes back, one byte at a time,
    /// so a run may read bytes it has itself just written.
    BackRef { distance: u8, length: u8 },
}

impl Token {
    /// Number of output bytes this token produces.
    #[inline]
    pub fn output_len(self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::BackRef { length, .. } => usize::from(length),
        }
    }
}

/// Serialize `tokens` into a GLZ token stream escaped with `marker`.
///
/// Distances at or above the marker value are stored one higher, so the
/// marker value itself never appears as a distance and `marker, marker`
/// always means a literal marker byte. A back-reference distance outside
/// `1..=`[`MAX_DISTANCE`] is rejected; [`tokenize`](crate::tokenize) never
/// produces one.
pub fn encode_tokens(tokens: &[Token], marker: u8) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(tokens.len() + tokens.len() / 4);

    for &token in tokens {
        match token {
            Token::Literal(byte) => {
                out.push(byte);
                if byte == marker {
                    out.push(byte);
                }
            }
            Token::BackRef { distance, length } => {
                if distance == 0 || usize::from(distance) > MAX_DISTANCE {
                    return Err(Error::InvalidDistance(distance));
                }
                let distance = if distance >= marker { distance + 1 } else { distance };
                out.extend_from_slice(&[marker, distance, length]);
            }
        }
    }

    Ok(out)
}
