//! Needleman-Wunsch global alignment of word sequences.
//!
//! Used by the comparator for the aligned diff, which catches replacements
//! that change the word count (one word into two, a deleted filler) where the
//! positional check cannot.

use crate::models::{AlignOp, CompareOptions, DiffHunk, HunkKind, WordAlignment};

/// Number of DP cells an alignment of `n` by `m` tokens needs.
#[inline]
pub fn alignment_cells(n: usize, m: usize) -> usize {
    n.saturating_add(1).saturating_mul(m.saturating_add(1))
}

/// Global alignment of two token sequences.
///
/// Every token of both sequences appears in exactly one op. Ties prefer the
/// diagonal, then a deletion from `seq_a`.
pub fn align_words<T: PartialEq>(seq_a: &[T], seq_b: &[T], options: &CompareOptions) -> WordAlignment {
    let n = seq_a.len();
    let m = seq_b.len();
    let gap = options.gap_penalty;

    // DP matrix - flat Vec, H[i][j] = h[i * (m+1) + j]
    let width = m + 1;
    let mut h = vec![0i32; (n + 1) * width];

    for i in 1..=n {
        h[i * width] = h[(i - 1) * width] + gap;
    }
    for j in 1..=m {
        h[j] = h[j - 1] + gap;
    }

    for i in 1..=n {
        let row_offset = i * width;
        let prev_row_offset = (i - 1) * width;

        for j in 1..=m {
            let pair = pair_score(&seq_a[i - 1], &seq_b[j - 1], options);
            let diagonal = h[prev_row_offset + (j - 1)] + pair;
            let up = h[prev_row_offset + j] + gap;
            let left = h[row_offset + (j - 1)] + gap;

            h[row_offset + j] = diagonal.max(up).max(left);
        }
    }

    // Traceback from the bottom-right corner
    let mut ops = Vec::with_capacity(n.max(m));
    let mut matches = 0u32;
    let mut substitutions = 0u32;
    let mut gaps = 0u32;
    let mut i = n;
    let mut j = m;

    while i > 0 || j > 0 {
        let current = h[i * width + j];

        if i > 0 && j > 0 {
            let pair = pair_score(&seq_a[i - 1], &seq_b[j - 1], options);
            if current == h[(i - 1) * width + (j - 1)] + pair {
                if seq_a[i - 1] == seq_b[j - 1] {
                    ops.push(AlignOp::Match(i - 1, j - 1));
                    matches += 1;
                } else {
                    ops.push(AlignOp::Substitute(i - 1, j - 1));
                    substitutions += 1;
                }
                i -= 1;
                j -= 1;
                continue;
            }
        }

        if i > 0 && current == h[(i - 1) * width + j] + gap {
            ops.push(AlignOp::Delete(i - 1));
            i -= 1;
        } else {
            ops.push(AlignOp::Insert(j - 1));
            j -= 1;
        }
        gaps += 1;
    }

    // Built backwards
    ops.reverse();

    WordAlignment {
        ops,
        score: h[n * width + m],
        matches,
        substitutions,
        gaps,
    }
}

#[inline(always)]
fn pair_score<T: PartialEq>(a: &T, b: &T, options: &CompareOptions) -> i32 {
    if a == b {
        options.match_score
    } else {
        options.mismatch_penalty
    }
}

/// Group the non-matching ops of an alignment into maximal hunks.
///
/// `original` and `rewritten` are the display tokens the alignment indices
/// refer to. Hunk indices are token positions where the hunk starts.
pub fn group_hunks(ops: &[AlignOp], original: &[&str], rewritten: &[&str]) -> Vec<DiffHunk> {
    let mut hunks = Vec::new();
    let mut pending_a: Vec<usize> = Vec::new();
    let mut pending_b: Vec<usize> = Vec::new();
    let mut pos_a = 0usize; // Original tokens consumed so far
    let mut pos_b = 0usize;
    let mut hunk_start = (0usize, 0usize);

    for op in ops {
        if !matches!(op, AlignOp::Match(..)) && pending_a.is_empty() && pending_b.is_empty() {
            hunk_start = (pos_a, pos_b);
        }

        match *op {
            AlignOp::Match(..) => {
                flush_hunk(&mut hunks, &mut pending_a, &mut pending_b, hunk_start, original, rewritten);
                pos_a += 1;
                pos_b += 1;
            }
            AlignOp::Substitute(a, b) => {
                pending_a.push(a);
                pending_b.push(b);
                pos_a += 1;
                pos_b += 1;
            }
            AlignOp::Delete(a) => {
                pending_a.push(a);
                pos_a += 1;
            }
            AlignOp::Insert(b) => {
                pending_b.push(b);
                pos_b += 1;
            }
        }
    }

    flush_hunk(&mut hunks, &mut pending_a, &mut pending_b, hunk_start, original, rewritten);
    hunks
}

fn flush_hunk(
    hunks: &mut Vec<DiffHunk>,
    pending_a: &mut Vec<usize>,
    pending_b: &mut Vec<usize>,
    start: (usize, usize),
    original: &[&str],
    rewritten: &[&str],
) {
    let kind = match (pending_a.is_empty(), pending_b.is_empty()) {
        (true, true) => return,
        (false, false) => HunkKind::Replace,
        (false, true) => HunkKind::Delete,
        (true, false) => HunkKind::Insert,
    };

    hunks.push(DiffHunk {
        kind,
        original_index: start.0,
        rewritten_index: start.1,
        original: join_tokens(pending_a, original),
        rewritten: join_tokens(pending_b, rewritten),
    });

    pending_a.clear();
    pending_b.clear();
}

fn join_tokens(indices: &[usize], tokens: &[&str]) -> String {
    indices
        .iter()
        .filter_map(|&i| tokens.get(i).copied())
        .collect::<Vec<_>>()
        .join(" ")
}
