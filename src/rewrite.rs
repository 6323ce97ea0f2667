//! Span-driven rewriting: plan replacements, splice them in, then normalize.

use crate::detect::Detector;
use crate::lexicon::{CaseStyle, Lexicon};
use crate::models::{Change, DetectionResult, RewriteOptions, RewriteResult, Selection, Span};
use crate::normalize::normalize;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, warn};

/// One replacement decided before any text is touched
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedEdit {
    pub span: Span,
    pub replacement: String,
}

/// Ordered, non-overlapping replacements for one text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewritePlan {
    pub edits: Vec<PlannedEdit>,
    pub skipped: usize, // Spans whose pattern the lexicon does not know
}

impl RewritePlan {
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Rewriter<'a> {
    lexicon: &'a Lexicon,
    options: RewriteOptions,
}

impl<'a> Rewriter<'a> {
    pub fn new(lexicon: &'a Lexicon, options: RewriteOptions) -> Self {
        Self { lexicon, options }
    }

    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    /// Rewrite `text`, reusing `prior` when it was computed for the same text.
    pub fn rewrite(&self, text: &str, prior: Option<&DetectionResult>) -> RewriteResult {
        if text.trim().is_empty() {
            return RewriteResult::empty();
        }

        let detection: Cow<'_, DetectionResult> = match prior {
            Some(d) if d.source_text == text => Cow::Borrowed(d),
            Some(_) => {
                warn!("prior detection was computed for different text, detecting again");
                Cow::Owned(Detector::new(self.lexicon).detect(text))
            }
            None => Cow::Owned(Detector::new(self.lexicon).detect(text)),
        };

        let plan = self.plan(&detection);
        let (spliced, changes) = apply(text, &plan);
        let (rewritten_text, normalization) = normalize(&spliced, &self.options);

        debug!(
            replacements = changes.len(),
            skipped = plan.skipped,
            fillers = normalization.fillers_removed,
            contractions = normalization.contractions,
            splits = normalization.sentences_split,
            "rewrite complete"
        );

        RewriteResult {
            rewritten_text,
            replacement_count: changes.len(),
            changes,
            normalization,
        }
    }

    /// Choose a case-matched alternative for every detected span.
    ///
    /// Spans whose pattern is not in the lexicon are skipped and left as they
    /// are in the text.
    pub fn plan(&self, detection: &DetectionResult) -> RewritePlan {
        let mut spans: Vec<&Span> = detection.spans.iter().collect();
        spans.sort_by_key(|s| s.start);

        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        let mut plan = RewritePlan::default();

        for span in spans {
            let seen = occurrences.entry(span.pattern.as_str()).or_insert(0);
            let n = match self.options.selection {
                Selection::First => 0,
                Selection::Rotate => *seen,
            };
            *seen += 1;

            let style = CaseStyle::of(&span.matched_text);
            match self.lexicon.alternative_at(&span.pattern, n, style) {
                Some(replacement) => plan.edits.push(PlannedEdit {
                    span: span.clone(),
                    replacement,
                }),
                None => {
                    debug!(pattern = %span.pattern, "unknown pattern, span left unchanged");
                    plan.skipped += 1;
                }
            }
        }

        plan
    }
}

/// Splice planned replacements into `text` left to right.
///
/// Edits out of order, out of bounds or off a char boundary are ignored.
pub fn apply(text: &str, plan: &RewritePlan) -> (String, Vec<Change>) {
    let mut out = String::with_capacity(text.len());
    let mut changes = Vec::with_capacity(plan.edits.len());
    let mut cursor = 0usize;

    for edit in &plan.edits {
        let span = &edit.span;
        if span.start < cursor
            || span.end > text.len()
            || span.start > span.end
            || !text.is_char_boundary(span.start)
            || !text.is_char_boundary(span.end)
        {
            debug!(start = span.start, end = span.end, "invalid edit skipped");
            continue;
        }

        out.push_str(&text[cursor..span.start]);
        let position = out.len();
        out.push_str(&edit.replacement);
        cursor = span.end;

        changes.push(Change {
            original_span: span.clone(),
            replacement_text: edit.replacement.clone(),
            position,
        });
    }

    out.push_str(&text[cursor..]);
    (out, changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, LexiconEntry, Severity};

    fn rewrite_with(text: &str, options: RewriteOptions) -> RewriteResult {
        let lexicon = Lexicon::builtin();
        Rewriter::new(&lexicon, options).rewrite(text, None)
    }

    fn rewrite(text: &str) -> RewriteResult {
        rewrite_with(text, RewriteOptions::default())
    }

    #[test]
    fn test_basic_rewrite() {
        let result = rewrite("We must utilize a comprehensive approach.");
        assert_eq!(result.rewritten_text, "We must use a complete approach.");
        assert_eq!(result.replacement_count, 2);
        assert_eq!(result.changes[0].replacement_text, "use");
        assert_eq!(result.changes[1].replacement_text, "complete");
    }

    #[test]
    fn test_empty_rewrite() {
        for text in ["", "  \n\n "] {
            let result = rewrite(text);
            assert_eq!(result.rewritten_text, "");
            assert!(result.changes.is_empty());
            assert_eq!(result.replacement_count, 0);
        }
    }

    #[test]
    fn test_uppercase_preserved() {
        let result = rewrite("UTILIZE this NOW.");
        assert_eq!(result.rewritten_text, "USE this NOW.");
    }

    #[test]
    fn test_title_case_preserved() {
        let result = rewrite("Furthermore, it works.");
        assert_eq!(result.rewritten_text, "Also, it works.");
    }

    #[test]
    fn test_phrase_replaced_as_unit() {
        let result = rewrite("It is important to note that the plan failed.");
        assert_eq!(result.rewritten_text, "Note that the plan failed.");
        assert_eq!(result.replacement_count, 1);
    }

    #[test]
    fn test_change_positions() {
        let result = rewrite("We utilize tools to facilitate work.");
        let spliced = "We use tools to help work.";

        for change in &result.changes {
            let end = change.position + change.replacement_text.len();
            assert_eq!(&spliced[change.position..end], change.replacement_text);
        }
        assert_eq!(result.rewritten_text, spliced);
    }

    #[test]
    fn test_paragraphs_preserved() {
        let text = "Furthermore, the results are clear.\n\n  The second paragraph is plain.";
        let result = rewrite(text);
        assert_eq!(
            result.rewritten_text,
            "Also, the results are clear.\n\n  The second paragraph is plain."
        );
    }

    #[test]
    fn test_rotate_selection() {
        let options = RewriteOptions {
            selection: Selection::Rotate,
            ..Default::default()
        };
        let result = rewrite_with("Moreover, a. Moreover, b. Moreover, c. Moreover, d.", options);
        assert_eq!(
            result.rewritten_text,
            "Plus, a. Also, b. On top of that, c. Plus, d."
        );
    }

    #[test]
    fn test_prior_detection_reused() {
        let lexicon = Lexicon::builtin();
        let text = "We leverage data.";
        let detection = Detector::new(&lexicon).detect(text);
        let rewriter = Rewriter::new(&lexicon, RewriteOptions::default());

        let with_prior = rewriter.rewrite(text, Some(&detection));
        let without = rewriter.rewrite(text, None);
        assert_eq!(with_prior, without);
    }

    #[test]
    fn test_stale_prior_detection_ignored() {
        let lexicon = Lexicon::builtin();
        let stale = Detector::new(&lexicon).detect("Something else entirely, robust.");
        let rewriter = Rewriter::new(&lexicon, RewriteOptions::default());

        let result = rewriter.rewrite("We leverage data.", Some(&stale));
        assert_eq!(result.rewritten_text, "We use data.");
    }

    #[test]
    fn test_unknown_pattern_skipped() {
        let full = Lexicon::builtin();
        let text = "We leverage robust data.";
        let detection = Detector::new(&full).detect(text);

        let narrow = Lexicon::new(vec![LexiconEntry::new(
            "leverage",
            &["use"],
            Category::Corporate,
            Severity::High,
        )])
        .unwrap();
        let rewriter = Rewriter::new(&narrow, RewriteOptions::default());

        let plan = rewriter.plan(&detection);
        assert_eq!(plan.edits.len(), 1);
        assert_eq!(plan.skipped, 1);

        let (spliced, changes) = apply(text, &plan);
        assert_eq!(spliced, "We use robust data.");
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_plan_is_inspectable_before_apply() {
        let lexicon = Lexicon::builtin();
        let text = "Leverage it.";
        let detection = Detector::new(&lexicon).detect(text);
        let plan = Rewriter::new(&lexicon, RewriteOptions::default()).plan(&detection);

        assert_eq!(plan.edits.len(), 1);
        assert_eq!(plan.edits[0].replacement, "Use");
        assert_eq!(plan.edits[0].span.matched_text, "Leverage");
    }

    #[test]
    fn test_apply_ignores_overlapping_edits() {
        let lexicon = Lexicon::builtin();
        let text = "We utilize it.";
        let detection = Detector::new(&lexicon).detect(text);
        let mut plan = Rewriter::new(&lexicon, RewriteOptions::default()).plan(&detection);
        plan.edits.push(plan.edits[0].clone());

        let (spliced, changes) = apply(text, &plan);
        assert_eq!(spliced, "We use it.");
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_normalization_not_counted() {
        let result = rewrite("Needless to say, we do not utilize it.");
        assert_eq!(result.rewritten_text, "We don't use it.");
        assert_eq!(result.replacement_count, 1);
        assert_eq!(result.normalization.fillers_removed, 1);
        assert_eq!(result.normalization.contractions, 1);
    }

    #[test]
    fn test_lexicon_pass_idempotent() {
        let text = "Furthermore, we leverage cutting-edge, state-of-the-art tools.\n\n\
                    In conclusion, it is crucial to recognize the paradigm shift.";
        let once = rewrite(text).rewritten_text;
        let twice = rewrite(&once);
        assert_eq!(twice.rewritten_text, once);
        assert_eq!(twice.replacement_count, 0);
    }
}
