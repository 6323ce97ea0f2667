//! Lexicon-driven detection of AI-associated wording.
//!
//! Paragraphs are scanned independently, so no span ever crosses a blank
//! line. Within a paragraph, entries are tried phrase-first and the first
//! entry to claim a range keeps it.

use crate::lexicon::Lexicon;
use crate::markup::highlight_spans;
use crate::merge::{covered_len, select_longest};
use crate::style;
use crate::models::{
    Category, DetectionResult, DetectionSummary, Priority, Span, Suggestion, SuggestionKind,
};
use crate::tokenize::{paragraph_layout, word_count, Paragraph};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};

/// Confidence never reaches certainty.
pub const CONFIDENCE_CEILING: f64 = 0.98;
/// Confidence of non-empty text without matches.
pub const CONFIDENCE_FLOOR: f64 = 0.1;
const DENSITY_WEIGHT: f64 = 2.0;

/// Saturating AI-likeness score from match density.
#[inline]
pub fn confidence(density: f64) -> f64 {
    (density * DENSITY_WEIGHT + CONFIDENCE_FLOOR).min(CONFIDENCE_CEILING)
}

/// Scans text against a borrowed lexicon
#[derive(Debug, Clone, Copy)]
pub struct Detector<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> Detector<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &'a Lexicon {
        self.lexicon
    }

    /// Detect every lexicon match in `text`.
    ///
    /// Empty or whitespace-only input yields an empty result with zero
    /// confidence.
    pub fn detect(&self, text: &str) -> DetectionResult {
        if text.trim().is_empty() {
            return DetectionResult::empty(text);
        }

        let layout = paragraph_layout(text);
        let mut spans = Vec::new();
        let mut paragraph_count = 0usize;

        for paragraph in &layout {
            if paragraph.text.trim().is_empty() {
                continue;
            }
            paragraph_count += 1;
            spans.extend(self.scan_paragraph(paragraph));
        }

        let word_count = word_count(text);
        let match_count = spans.len();
        let unique_word_count = spans
            .iter()
            .map(|s| fold_matched(&s.matched_text))
            .collect::<HashSet<_>>()
            .len();
        let density = if word_count > 0 {
            match_count as f64 / word_count as f64
        } else {
            0.0
        };
        let confidence_score = confidence(density);

        debug!(
            words = word_count,
            paragraphs = paragraph_count,
            matches = match_count,
            covered_bytes = covered_len(&spans),
            confidence = confidence_score,
            "detection complete"
        );

        let summary = summarize(&spans);
        let highlighted_text = highlight_spans(text, &spans);
        let style = style::analyze(text);
        trace!(
            structure = style.structure_score,
            complexity = style.complexity_score,
            "style analyzed"
        );

        DetectionResult {
            source_text: text.to_string(),
            spans,
            confidence_score,
            match_count,
            unique_word_count,
            word_count,
            density,
            paragraph_count,
            highlighted_text,
            summary,
            style,
        }
    }

    /// Non-overlapping spans for one paragraph, offsets relative to the source.
    fn scan_paragraph(&self, paragraph: &Paragraph<'_>) -> Vec<Span> {
        let mut candidates = Vec::new();

        for (entry, matcher) in self.lexicon.entries_with_matchers() {
            for m in matcher.find_iter(paragraph.text) {
                candidates.push(Span {
                    start: paragraph.offset + m.start(),
                    end: paragraph.offset + m.end(),
                    matched_text: m.as_str().to_string(),
                    pattern: entry.pattern.clone(),
                    category: entry.category,
                    severity: entry.severity,
                    confidence: entry.severity.weight(),
                    paragraph: paragraph.index,
                });
            }
        }

        let candidate_count = candidates.len();
        let spans = select_longest(candidates);
        trace!(
            paragraph = paragraph.index,
            candidates = candidate_count,
            kept = spans.len(),
            "paragraph scanned"
        );
        spans
    }
}

/// Case-folded matched text with whitespace runs collapsed.
fn fold_matched(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Per-category counts and the most frequent category.
///
/// Ties go to the category listed first in `Category::ALL`.
pub fn summarize(spans: &[Span]) -> DetectionSummary {
    let mut category_breakdown: BTreeMap<Category, usize> = BTreeMap::new();
    for span in spans {
        *category_breakdown.entry(span.category).or_default() += 1;
    }

    let mut most_common_category = None;
    let mut best = 0usize;
    for (&category, &count) in &category_breakdown {
        if count > best {
            best = count;
            most_common_category = Some(category);
        }
    }

    DetectionSummary {
        total_patterns: spans.len(),
        category_breakdown,
        most_common_category,
    }
}

/// Prioritized, human-readable advice for a detection.
pub fn suggestions(result: &DetectionResult) -> Vec<Suggestion> {
    let mut out = Vec::new();

    if result.source_text.trim().is_empty() {
        return out;
    }

    let word_matches = result
        .spans
        .iter()
        .filter(|s| s.pattern.split_whitespace().count() == 1)
        .count();
    let phrase_matches = result.match_count - word_matches;

    if word_matches > 0 {
        out.push(Suggestion {
            kind: SuggestionKind::WordReplacement,
            message: format!(
                "Replace {} AI-detected words with more natural alternatives",
                word_matches
            ),
            priority: Priority::High,
        });
    }

    if phrase_matches > 0 {
        out.push(Suggestion {
            kind: SuggestionKind::PhraseSimplification,
            message: format!("Simplify {} stock phrases into plain wording", phrase_matches),
            priority: Priority::High,
        });
    }

    let formal = result
        .spans
        .iter()
        .filter(|s| matches!(s.category, Category::Academic | Category::Corporate))
        .count();
    if formal > 3 {
        out.push(Suggestion {
            kind: SuggestionKind::Formality,
            message: "Reduce formal/academic language for more conversational tone".to_string(),
            priority: Priority::Medium,
        });
    }

    if result.match_count.saturating_sub(result.unique_word_count) > 2
        || result.style.repetitive_uses > 2
    {
        out.push(Suggestion {
            kind: SuggestionKind::Variety,
            message: "Use more varied vocabulary to avoid repetition".to_string(),
            priority: Priority::Medium,
        });
    }

    if result.style.structure_score > 0.5 {
        out.push(Suggestion {
            kind: SuggestionKind::Structure,
            message: "Vary sentence length and structure for more natural flow".to_string(),
            priority: Priority::Low,
        });
    }

    if !result.has_matches() {
        out.push(Suggestion {
            kind: SuggestionKind::LowSignal,
            message: "No known AI patterns found. This is a heuristic signal, not proof of human authorship"
                .to_string(),
            priority: Priority::Low,
        });
    }

    out.sort_by(|a, b| b.priority.cmp(&a.priority));
    out
}
