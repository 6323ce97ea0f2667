//! Resolve overlapping candidate spans into a non-overlapping set.
//!
//! Candidates arrive in lexicon priority order (phrases before words, longer
//! before shorter). The first candidate to claim a byte range keeps it; any
//! later candidate touching that range is dropped.

use crate::models::Span;

/// Keep the highest-priority candidate for every contested range.
///
/// `candidates` must be in priority order. The result is sorted by start offset
/// and contains no two overlapping spans.
pub fn select_longest(candidates: Vec<Span>) -> Vec<Span> {
    let mut accepted: Vec<Span> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        if candidate.is_empty() {
            continue;
        }

        // Insertion point keeping `accepted` sorted by start
        let idx = accepted.partition_point(|s| s.start < candidate.start);

        let clashes_before = idx > 0
            && ranges_overlap(
                accepted[idx - 1].start,
                accepted[idx - 1].end,
                candidate.start,
                candidate.end,
            );
        let clashes_after = idx < accepted.len()
            && ranges_overlap(
                accepted[idx].start,
                accepted[idx].end,
                candidate.start,
                candidate.end,
            );

        if !clashes_before && !clashes_after {
            accepted.insert(idx, candidate);
        }
    }

    accepted
}

/// Check if two half-open ranges overlap.
#[inline]
pub fn ranges_overlap(start_a: usize, end_a: usize, start_b: usize, end_b: usize) -> bool {
    start_a < end_b && start_b < end_a
}

/// Number of bytes covered by spans.
pub fn covered_len(spans: &[Span]) -> usize {
    spans.iter().map(Span::len).sum()
}
