//! Near-duplicate detection by longest common run of body text.

use serde::{Deserialize, Serialize};

use crate::model::ClippingId;

/// Shortest shared run, in characters, that links two clippings.
pub const DEFAULT_SIMILARITY_THRESHOLD: usize = 40;

/// A run of text found verbatim in two bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonRun {
    /// The shared text.
    pub shared: String,
    /// Character offset of the run in the first text.
    pub offset_in_first: usize,
    /// Character offset of the run in the second text.
    pub offset_in_second: usize,
}

impl CommonRun {
    /// Length of the run in characters.
    pub fn len(&self) -> usize {
        self.shared.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.is_empty()
    }
}

/// Find the longest run of at least `threshold` characters that occurs in
/// both texts.
///
/// The shorter text (the first one on a tie) is searched for in the longer.
/// Lengths are tried from longest to `threshold`, start offsets left to right
/// in the shorter text, and the left-most occurrence in the longer text wins,
/// so the result is fully deterministic.
pub fn longest_common_run(first: &str, second: &str, threshold: usize) -> Option<CommonRun> {
    let threshold = threshold.max(1);
    let first_len = first.chars().count();
    let second_len = second.chars().count();

    let first_is_small = first_len <= second_len;
    let (small, big, small_len) = if first_is_small {
        (first, second, first_len)
    } else {
        (second, first, second_len)
    };

    if small_len < threshold {
        return None;
    }

    // Byte offset of every character boundary in `small`, including the end.
    let bounds: Vec<usize> = small
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(small.len()))
        .collect();

    for len in (threshold..=small_len).rev() {
        for start in 0..=(small_len - len) {
            let candidate = &small[bounds[start]..bounds[start + len]];
            if let Some(byte_pos) = big.find(candidate) {
                let offset_in_big = big[..byte_pos].chars().count();
                let (offset_in_first, offset_in_second) = if first_is_small {
                    (start, offset_in_big)
                } else {
                    (offset_in_big, start)
                };
                return Some(CommonRun {
                    shared: candidate.to_string(),
                    offset_in_first,
                    offset_in_second,
                });
            }
        }
    }

    None
}

/// Two clippings linked by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarPair {
    /// Earlier clipping in scan order.
    pub first: ClippingId,
    /// Later clipping in scan order.
    pub second: ClippingId,
    /// The run that linked them.
    pub run: CommonRun,
}

/// Pairwise scanner over an ordered list of clipping bodies.
///
/// Every unordered pair is compared, so a scan is quadratic in the number of
/// clippings; keep the scope to one book where possible.
#[derive(Debug, Clone)]
pub struct SimilarityScanner {
    threshold: usize,
}

impl SimilarityScanner {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Compare every pair `(i, j)` with `i < j` and return the linked pairs
    /// in scan order.
    pub fn scan(&self, bodies: &[(ClippingId, &str)]) -> Vec<SimilarPair> {
        let mut pairs = Vec::new();

        for (i, (first, first_text)) in bodies.iter().enumerate() {
            for (second, second_text) in &bodies[i + 1..] {
                if first == second {
                    continue;
                }
                if let Some(run) = longest_common_run(first_text, second_text, self.threshold) {
                    pairs.push(SimilarPair {
                        first: *first,
                        second: *second,
                        run,
                    });
                }
            }
        }

        pairs
    }
}

impl Default for SimilarityScanner {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}
