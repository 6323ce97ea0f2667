//! Before/after comparison of an original and a rewritten text.
//!
//! Works from the two strings alone, without the rewriter's change log. Two
//! views are produced:
//!
//! - the positional view: a lexicon word counts as changed when the rewritten
//!   token at the *same index* is one of its alternatives, and a lexicon phrase
//!   counts as changed when it disappears from the joined text while one of its
//!   alternatives is present. Replacements that shift the word count are missed
//!   here.
//! - the aligned view: a global word alignment grouped into hunks, which does
//!   not have that blind spot.

use crate::align::{align_words, alignment_cells, group_hunks};
use crate::detect::Detector;
use crate::lexicon::Lexicon;
use crate::markup::{render, Mark};
use crate::models::*;
use crate::tokenize::{
    average_sentence_length, clean_word, is_word_char, sentence_count, tokenize, Token,
};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Readability points per word of average sentence length removed
const READABILITY_SCALE: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct Comparator<'a> {
    lexicon: &'a Lexicon,
    options: CompareOptions,
}

impl<'a> Comparator<'a> {
    pub fn new(lexicon: &'a Lexicon, options: CompareOptions) -> Self {
        Self { lexicon, options }
    }

    /// Compare `original` against `rewritten`.
    pub fn compare(&self, original: &str, rewritten: &str) -> ComparisonReport {
        let orig_tokens = tokenize(original);
        let rew_tokens = tokenize(rewritten);
        let orig_clean: Vec<String> = orig_tokens.iter().map(|t| clean_word(t.text)).collect();
        let rew_clean: Vec<String> = rew_tokens.iter().map(|t| clean_word(t.text)).collect();

        let mut changes = self.word_changes(&orig_tokens, &rew_tokens, &orig_clean, &rew_clean);
        changes.extend(self.phrase_changes(&orig_tokens, &rew_tokens));

        let stats = self.statistics(original, rewritten, &orig_tokens, &rew_tokens, &changes);
        let aligned_hunks = self.aligned_hunks(&orig_tokens, &rew_tokens, &orig_clean, &rew_clean);

        let (highlighted_original, highlighted_rewritten) =
            highlight(original, rewritten, &orig_tokens, &rew_tokens, &changes);

        debug!(
            words = stats.total_words,
            changed_words = stats.changed_words,
            changed_phrases = stats.changed_phrases,
            hunks = aligned_hunks.as_ref().map(|h| h.len()),
            "comparison complete"
        );

        ComparisonReport {
            original: original.to_string(),
            rewritten: rewritten.to_string(),
            changes,
            stats,
            highlighted_original,
            highlighted_rewritten,
            aligned_hunks,
        }
    }

    /// Positional check of single-word entries.
    fn word_changes(
        &self,
        orig_tokens: &[Token<'_>],
        rew_tokens: &[Token<'_>],
        orig_clean: &[String],
        rew_clean: &[String],
    ) -> Vec<ComparisonChange> {
        let mut changes = Vec::new();

        for entry in self.lexicon.word_entries() {
            let pattern = clean_word(&entry.pattern);
            let alternatives: HashSet<String> =
                entry.alternatives.iter().map(|a| clean_word(a)).collect();

            for (index, word) in orig_clean.iter().enumerate() {
                if *word != pattern {
                    continue;
                }
                let Some(counterpart) = rew_clean.get(index) else {
                    continue;
                };
                if alternatives.contains(counterpart) {
                    changes.push(ComparisonChange {
                        kind: ChangeKind::WordReplacement,
                        original: orig_tokens[index].text.to_string(),
                        rewritten: rew_tokens[index].text.to_string(),
                        position: index,
                        category: Some(entry.category),
                    });
                }
            }
        }

        changes.sort_by_key(|c| c.position);
        changes
    }

    /// Substring check of phrase entries over the space-joined texts.
    fn phrase_changes(
        &self,
        orig_tokens: &[Token<'_>],
        rew_tokens: &[Token<'_>],
    ) -> Vec<ComparisonChange> {
        let orig_joined = join_lower(orig_tokens);
        let rew_joined = join_lower(rew_tokens);
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut changes = Vec::new();

        // Longer phrases come first, so a phrase inside a recorded one is skipped
        for entry in self.lexicon.phrase_entries() {
            let pattern = entry.pattern.to_ascii_lowercase();
            let Some(at) = orig_joined.find(&pattern) else {
                continue;
            };
            let end = at + pattern.len();
            if claimed.iter().any(|&(s, e)| s <= at && end <= e) {
                continue;
            }

            // Still there as often as before: not replaced
            if rew_joined.matches(&pattern).count() >= orig_joined.matches(&pattern).count() {
                continue;
            }

            let Some(alternative) = entry
                .alternatives
                .iter()
                .find(|a| rew_joined.contains(&a.to_ascii_lowercase()))
            else {
                continue;
            };

            claimed.push((at, end));
            changes.push(ComparisonChange {
                kind: ChangeKind::PhraseReplacement,
                original: entry.pattern.clone(),
                rewritten: alternative.clone(),
                position: orig_joined[..at].chars().count(),
                category: Some(entry.category),
            });
        }

        changes.sort_by_key(|c| c.position);
        changes
    }

    fn statistics(
        &self,
        original: &str,
        rewritten: &str,
        orig_tokens: &[Token<'_>],
        rew_tokens: &[Token<'_>],
        changes: &[ComparisonChange],
    ) -> ComparisonStats {
        let total_words = orig_tokens.len();
        let rewritten_words = rew_tokens.len();
        let changed_words = changes
            .iter()
            .filter(|c| c.kind == ChangeKind::WordReplacement)
            .count();
        let changed_phrases = changes.len() - changed_words;
        let change_percentage =
            ((changed_words as f64 / total_words.max(1) as f64) * 100.0).round() as u32;

        let detector = Detector::new(self.lexicon);
        let orig_unique = detector.detect(original).unique_word_count;
        let new_unique = detector.detect(rewritten).unique_word_count;

        ComparisonStats {
            total_words,
            rewritten_words,
            changed_words,
            changed_phrases,
            added_words: rewritten_words.saturating_sub(total_words),
            removed_words: total_words.saturating_sub(rewritten_words),
            change_percentage,
            total_changes: changes.len(),
            original_sentences: sentence_count(original),
            rewritten_sentences: sentence_count(rewritten),
            improvement_score: improvement_score(orig_unique, new_unique),
            readability_improvement: readability_improvement(original, rewritten),
        }
    }

    fn aligned_hunks(
        &self,
        orig_tokens: &[Token<'_>],
        rew_tokens: &[Token<'_>],
        orig_clean: &[String],
        rew_clean: &[String],
    ) -> Option<Vec<DiffHunk>> {
        if !self.options.aligned_diff {
            return None;
        }

        let cells = alignment_cells(orig_clean.len(), rew_clean.len());
        if cells > self.options.max_alignment_cells {
            warn!(
                cells,
                limit = self.options.max_alignment_cells,
                "texts too long for aligned diff, skipping"
            );
            return None;
        }

        let alignment = align_words(orig_clean, rew_clean, &self.options);
        let orig_display: Vec<&str> = orig_tokens.iter().map(|t| t.text).collect();
        let rew_display: Vec<&str> = rew_tokens.iter().map(|t| t.text).collect();

        Some(group_hunks(&alignment.ops, &orig_display, &rew_display))
    }
}

/// Percentage drop in distinct matched words, 0 when nothing was matched.
pub fn improvement_score(original_unique: usize, rewritten_unique: usize) -> u32 {
    if original_unique == 0 {
        return 0;
    }
    let drop = original_unique.saturating_sub(rewritten_unique) as f64;
    (drop / original_unique as f64 * 100.0).round() as u32
}

/// Drop in average sentence length, scaled and capped to 0-100.
pub fn readability_improvement(original: &str, rewritten: &str) -> f64 {
    let before = average_sentence_length(original);
    let after = average_sentence_length(rewritten);
    ((before - after).max(0.0) * READABILITY_SCALE).min(100.0)
}

fn join_lower(tokens: &[Token<'_>]) -> String {
    tokens
        .iter()
        .map(|t| t.text)
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

/// First case-insensitive, word-bounded occurrence of `needle`.
fn find_bounded(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    let lower = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();

    lower.match_indices(&needle).map(|(at, _)| (at, at + needle.len())).find(|&(start, end)| {
        let before_ok = lower[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
        let after_ok = lower[end..].chars().next().map_or(true, |c| !is_word_char(c));
        before_ok && after_ok
    })
}

fn highlight(
    original: &str,
    rewritten: &str,
    orig_tokens: &[Token<'_>],
    rew_tokens: &[Token<'_>],
    changes: &[ComparisonChange],
) -> (String, String) {
    let mut orig_marks = Vec::new();
    let mut rew_marks = Vec::new();

    for change in changes {
        match change.kind {
            ChangeKind::WordReplacement => {
                let (Some(before), Some(after)) =
                    (orig_tokens.get(change.position), rew_tokens.get(change.position))
                else {
                    continue;
                };
                orig_marks.push(Mark::new(
                    before.start,
                    before.end(),
                    "original-highlight",
                    format!("Will change from: {} to: {}", change.original, change.rewritten),
                ));
                rew_marks.push(Mark::new(
                    after.start,
                    after.end(),
                    "rewritten-highlight",
                    format!("Changed to: {} (was: {})", change.rewritten, change.original),
                ));
            }
            ChangeKind::PhraseReplacement => {
                if let Some((start, end)) = find_bounded(original, &change.original) {
                    orig_marks.push(Mark::new(
                        start,
                        end,
                        "original-phrase-highlight",
                        format!("Will change from: {} to: {}", change.original, change.rewritten),
                    ));
                }
                if let Some((start, end)) = find_bounded(rewritten, &change.rewritten) {
                    rew_marks.push(Mark::new(
                        start,
                        end,
                        "rewritten-phrase-highlight",
                        format!("Changed to: {} (was: {})", change.rewritten, change.original),
                    ));
                }
            }
        }
    }

    (render(original, orig_marks), render(rewritten, rew_marks))
}
