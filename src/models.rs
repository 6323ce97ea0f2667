//! Data structures for the detection, rewrite and comparison pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Lexicon types
// ============================================================================

/// Grouping of a lexicon pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Connective words ("furthermore", "moreover")
    Transition,
    /// Business jargon ("leverage", "synergistic")
    Corporate,
    /// Formal intensifiers and adverbs ("fundamentally")
    Academic,
    /// Technology and marketing buzzwords ("cutting-edge")
    Buzzword,
    /// Multi-word stock phrases ("it is important to note")
    Phrase,
    /// Overused descriptive adjectives ("remarkable")
    Descriptor,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Transition,
        Category::Corporate,
        Category::Academic,
        Category::Buzzword,
        Category::Phrase,
        Category::Descriptor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Transition => "transition",
            Category::Corporate => "corporate",
            Category::Academic => "academic",
            Category::Buzzword => "buzzword",
            Category::Phrase => "phrase",
            Category::Descriptor => "descriptor",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| s.to_string())
    }
}

/// How strongly a pattern signals AI-style writing
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    /// Per-match confidence contributed by a pattern of this severity.
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Low => 0.5,
            Severity::Medium => 0.7,
            Severity::High => 0.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(s.to_string()),
        }
    }
}

/// A pattern and the plainer alternatives it can be rewritten into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub pattern: String,
    pub alternatives: Vec<String>,
    pub category: Category,
    pub severity: Severity,
}

impl LexiconEntry {
    pub fn new(pattern: &str, alternatives: &[&str], category: Category, severity: Severity) -> Self {
        Self {
            pattern: pattern.to_string(),
            alternatives: alternatives.iter().map(|a| a.to_string()).collect(),
            category,
            severity,
        }
    }

    /// Number of whitespace-separated words in the pattern
    pub fn word_count(&self) -> usize {
        self.pattern.split_whitespace().count()
    }

    pub fn is_phrase(&self) -> bool {
        self.word_count() > 1
    }
}

// ============================================================================
// Detection types
// ============================================================================

/// A located lexicon match. Offsets are byte offsets into the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub matched_text: String, // Exact original casing
    pub pattern: String,
    pub category: Category,
    pub severity: Severity,
    pub confidence: f64, // Per-match weight taken from severity
    pub paragraph: usize, // Zero-based paragraph index
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Per-category breakdown of a detection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub total_patterns: usize,
    pub category_breakdown: BTreeMap<Category, usize>,
    pub most_common_category: Option<Category>,
}

/// Sentence-shape and vocabulary signals measured alongside lexicon matches.
///
/// These feed suggestions only; `confidence_score` stays a function of
/// match density.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleMetrics {
    pub sentence_count: usize,
    pub average_sentence_length: f64,
    pub sentence_length_variance: f64, // Population variance, words per sentence
    pub passive_count: usize,
    pub passive_ratio: f64,        // Passive constructions per sentence
    pub complex_word_ratio: f64,   // Share of words longer than six letters
    pub latin_phrases: Vec<String>, // Distinct, lowercase, in listing order
    pub sentence_starters: usize,  // Distinct stock openers found
    pub repetitive_uses: usize,    // Uses of quantifiers seen more than twice
    pub structure_score: f64,
    pub complexity_score: f64,
}

/// Full detection result for one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub source_text: String,
    pub spans: Vec<Span>, // Ordered by start offset
    pub confidence_score: f64,
    pub match_count: usize,
    pub unique_word_count: usize, // Distinct matched texts, case-folded
    pub word_count: usize,
    pub density: f64,
    pub paragraph_count: usize,
    pub highlighted_text: String,
    pub summary: DetectionSummary,
    pub style: StyleMetrics,
}

impl DetectionResult {
    /// Result for empty or whitespace-only input
    pub fn empty(source_text: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            spans: Vec::new(),
            confidence_score: 0.0,
            match_count: 0,
            unique_word_count: 0,
            word_count: 0,
            density: 0.0,
            paragraph_count: 0,
            highlighted_text: String::new(),
            summary: DetectionSummary::default(),
            style: StyleMetrics::default(),
        }
    }

    pub fn has_matches(&self) -> bool {
        !self.spans.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    WordReplacement,
    PhraseSimplification,
    Formality,
    Variety,
    Structure,
    LowSignal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Human-readable advice derived from a detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub message: String,
    pub priority: Priority,
}

// ============================================================================
// Rewrite types
// ============================================================================

/// One lexicon replacement performed by the rewriter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub original_span: Span,
    pub replacement_text: String,
    pub position: usize, // Byte offset of the replacement in the lexicon-pass output
}

/// Edits made by the secondary passes. Not part of `replacement_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub fillers_removed: usize,
    pub contractions: usize,
    pub sentences_split: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteResult {
    pub rewritten_text: String,
    pub changes: Vec<Change>,
    pub replacement_count: usize,
    pub normalization: NormalizationStats,
}

impl RewriteResult {
    pub fn empty() -> Self {
        Self {
            rewritten_text: String::new(),
            changes: Vec::new(),
            replacement_count: 0,
            normalization: NormalizationStats::default(),
        }
    }
}

// ============================================================================
// Comparison types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    WordReplacement,
    PhraseReplacement,
}

/// A change re-derived by the comparator from before/after text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonChange {
    pub kind: ChangeKind,
    pub original: String,
    pub rewritten: String,
    pub position: usize, // Token index (words) or char offset in the joined original (phrases)
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonStats {
    pub total_words: usize,
    pub rewritten_words: usize,
    pub changed_words: usize,
    pub changed_phrases: usize,
    pub added_words: usize,
    pub removed_words: usize,
    pub change_percentage: u32,
    pub total_changes: usize,
    pub original_sentences: usize,
    pub rewritten_sentences: usize,
    pub improvement_score: u32,      // Drop in distinct matched words, percent
    pub readability_improvement: f64, // Drop in average sentence length, scaled to 0-100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HunkKind {
    Replace,
    Insert,
    Delete,
}

/// A maximal run of non-matching tokens in the aligned diff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffHunk {
    pub kind: HunkKind,
    pub original_index: usize,
    pub rewritten_index: usize,
    pub original: String,
    pub rewritten: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub original: String,
    pub rewritten: String,
    pub changes: Vec<ComparisonChange>,
    pub stats: ComparisonStats,
    pub highlighted_original: String,
    pub highlighted_rewritten: String,
    pub aligned_hunks: Option<Vec<DiffHunk>>,
}

/// Operation in a word alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignOp {
    Match(usize, usize),
    Substitute(usize, usize),
    Delete(usize), // Token only in the original
    Insert(usize), // Token only in the rewritten text
}

/// Result of a global word alignment
#[derive(Debug, Clone)]
pub struct WordAlignment {
    pub ops: Vec<AlignOp>,
    pub score: i32,
    pub matches: u32,
    pub substitutions: u32,
    pub gaps: u32,
}

// ============================================================================
// Parameters
// ============================================================================

/// How an alternative is picked when an entry lists several
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Always the first listed alternative
    #[default]
    First,
    /// Cycle through alternatives per occurrence of the same pattern
    Rotate,
}

/// Which part of the lexicon is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strategy {
    pub categories: Vec<Category>, // Empty = all categories
    pub min_severity: Severity,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::all()
    }
}

impl Strategy {
    pub fn all() -> Self {
        Self {
            categories: Vec::new(),
            min_severity: Severity::Low,
        }
    }

    /// Medium and high severity patterns only
    pub fn conservative() -> Self {
        Self {
            categories: Vec::new(),
            min_severity: Severity::Medium,
        }
    }

    pub fn only(categories: &[Category]) -> Self {
        Self {
            categories: categories.to_vec(),
            min_severity: Severity::Low,
        }
    }

    pub fn allows(&self, entry: &LexiconEntry) -> bool {
        entry.severity >= self.min_severity
            && (self.categories.is_empty() || self.categories.contains(&entry.category))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteOptions {
    pub selection: Selection,
    pub remove_fillers: bool,
    pub contractions: bool,
    pub split_long_sentences: bool,
    pub max_sentence_words: usize,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            selection: Selection::First,
            remove_fillers: true,
            contractions: true,
            split_long_sentences: false,
            max_sentence_words: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    pub aligned_diff: bool,
    pub max_alignment_cells: usize, // Skip the aligned diff above n*m cells
    pub match_score: i32,
    pub mismatch_penalty: i32,
    pub gap_penalty: i32,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            aligned_diff: true,
            max_alignment_cells: 4_000_000,
            match_score: 2,
            mismatch_penalty: -1,
            gap_penalty: -1,
        }
    }
}

/// Everything an engine needs besides the lexicon itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    pub strategy: Strategy,
    pub rewrite: RewriteOptions,
    pub compare: CompareOptions,
}

// ============================================================================
// Batch types
// ============================================================================

/// A named input document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub text: String,
}

/// Per-document outcome of a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub name: String,
    pub confidence_score: f64,
    pub match_count: usize,
    pub word_count: usize,
    pub replacement_count: usize,
    pub normalization: NormalizationStats,
    pub rewritten_text: String,
    pub stats: ComparisonStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub document_count: usize,
    pub total_words: usize,
    pub total_matches: usize,
    pub total_replacements: usize,
    pub avg_confidence: f64,
    pub avg_change_percentage: f64,
}

/// Full batch result
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResult {
    pub version: String,
    pub parameters: EngineParams,
    pub summary: BatchSummary,
    pub documents: Vec<DocumentReport>,
}

/// Counts describing a lexicon
#[derive(Debug, Clone, Default, Serialize)]
pub struct LexiconStats {
    pub total_entries: usize,
    pub phrase_entries: usize,
    pub word_entries: usize,
    pub total_alternatives: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
}
