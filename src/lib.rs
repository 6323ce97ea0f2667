//! Plainspoken: lexicon-driven detection and rewriting of AI-sounding prose
//!
//! Scans text for words and stock phrases associated with machine-generated
//! writing, scores how AI-like the text reads, rewrites matched spans into
//! plainer alternatives while keeping paragraphs and letter case, and compares
//! the two versions.
//!
//! # Example
//!
//! ```no_run
//! use plainspoken::prelude::*;
//!
//! let text = "Furthermore, we must utilize a comprehensive approach.";
//!
//! let detection = plainspoken::detect(text);
//! println!("AI confidence: {:.0}%", detection.confidence_score * 100.0);
//!
//! // Reuses the detection since it was computed on the same text
//! let rewrite = plainspoken::rewrite(text, Some(&detection));
//! println!("{}", rewrite.rewritten_text);
//!
//! let report = plainspoken::compare(text, &rewrite.rewritten_text);
//! println!("{} words changed", report.stats.changed_words);
//! ```
//!
//! # Custom Lexicon and Strategy
//!
//! ```no_run
//! use plainspoken::prelude::*;
//! use std::path::Path;
//!
//! let lexicon = load_lexicon(Path::new("lexicon.db")).unwrap();
//! let params = EngineParams {
//!     strategy: Strategy::only(&[Category::Transition, Category::Phrase]),
//!     ..Default::default()
//! };
//! let engine = Engine::new(lexicon, params);
//!
//! let result = engine.rewrite("Moreover, in order to win we try.", None);
//! println!("{}", result.rewritten_text);
//! ```

pub mod align;
pub mod compare;
pub mod db;
pub mod detect;
pub mod engine;
pub mod lexicon;
pub mod markup;
pub mod merge;
pub mod models;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod rewrite;
pub mod style;
pub mod tokenize;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::align::{align_words, group_hunks};
    pub use crate::compare::{improvement_score, readability_improvement, Comparator};
    pub use crate::db::{load_lexicon, load_lexicon_stats, save_lexicon, DbError};
    pub use crate::detect::{confidence, suggestions, summarize, Detector};
    pub use crate::engine::{default_engine, Engine};
    pub use crate::lexicon::{CaseStyle, Lexicon, LexiconError};
    pub use crate::markup::{escape_html, highlight_spans};
    pub use crate::merge::select_longest;
    pub use crate::models::{
        Category, Change, ChangeKind, CompareOptions, ComparisonChange, ComparisonReport,
        ComparisonStats, DetectionResult, DetectionSummary, DiffHunk, Document, DocumentReport,
        BatchResult, BatchSummary, EngineParams, HunkKind, LexiconEntry, LexiconStats,
        NormalizationStats, Priority, RewriteOptions, RewriteResult, Selection, Severity, Span,
        Strategy, StyleMetrics, Suggestion, SuggestionKind,
    };
    pub use crate::normalize::normalize;
    pub use crate::output::{
        generate_viewer_html, print_batch_summary, print_comparison_summary,
        print_detection_summary, print_lexicon_stats, print_rewrite_summary, write_changes_csv,
        write_changes_csv_file, write_documents_csv, write_documents_csv_file, write_json,
        write_json_file, write_viewer_html_file, OutputError,
    };
    pub use crate::pipeline::{
        expand_inputs, process_document, process_documents, read_documents, PipelineError,
    };
    pub use crate::rewrite::{apply, PlannedEdit, RewritePlan, Rewriter};
    pub use crate::style::analyze;
    pub use crate::tokenize::{paragraph_layout, split_paragraphs, split_sentences, tokenize};
}

// Re-export commonly used types at the crate root
pub use engine::Engine;
pub use lexicon::Lexicon;
pub use models::{ComparisonReport, DetectionResult, EngineParams, RewriteResult, Strategy};

/// Detect AI-associated patterns with the built-in lexicon.
pub fn detect(text: &str) -> DetectionResult {
    engine::default_engine().detect(text)
}

/// Rewrite text with the built-in lexicon and default options.
///
/// `prior` is reused only when it was detected on this exact text.
pub fn rewrite(text: &str, prior: Option<&DetectionResult>) -> RewriteResult {
    engine::default_engine().rewrite(text, prior)
}

/// Compare an original text with its rewrite.
pub fn compare(original: &str, rewritten: &str) -> ComparisonReport {
    engine::default_engine().compare(original, rewritten)
}
