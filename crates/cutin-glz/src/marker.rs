//! Escape marker selection.
//!
//! The marker is the byte value that introduces a back-reference in the token
//! stream. Every literal equal to it costs an extra byte, so the encoder picks
//! the value that occurs least often among the literals it emitted.

/// Occurrence counts for each of the 256 byte values.
#[derive(Debug, Clone)]
pub struct ByteHistogram {
    counts: [u32; 256],
}

impl ByteHistogram {
    /// Create an empty histogram.
    pub const fn new() -> Self {
        Self { counts: [0; 256] }
    }

    /// Count one occurrence of `byte`.
    #[inline]
    pub fn record(&mut self, byte: u8) {
        self.counts[usize::from(byte)] = self.counts[usize::from(byte)].saturating_add(1);
    }

    /// Number of recorded occurrences of `byte`.
    #[inline]
    pub fn count(&self, byte: u8) -> u32 {
        self.counts[usize::from(byte)]
    }

    /// The least frequent byte value, smallest value first on ties.
    pub fn rarest(&self) -> u8 {
        // min_by_key keeps the first of equal minima, so ascending index order
        // gives the smallest value.
        self.counts
            .iter()
            .zip(0..=u8::MAX)
            .min_by_key(|(count, _)| **count)
            .map_or(0, |(_, byte)| byte)
    }
}

impl Default for ByteHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<u8> for ByteHistogram {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for byte in iter {
            histogram.record(byte);
        }
        histogram
    }
}

/// Pick the escape marker for a stream containing `literals`.
pub fn select_marker<I: IntoIterator<Item = u8>>(literals: I) -> u8 {
    literals.into_iter().collect::<ByteHistogram>().rarest()
}
