//! The engine: one lexicon plus the parameters every stage runs with.

use crate::compare::Comparator;
use crate::detect::{suggestions, Detector};
use crate::lexicon::Lexicon;
use crate::models::{
    ComparisonReport, DetectionResult, EngineParams, RewriteResult, Suggestion,
};
use crate::rewrite::Rewriter;
use once_cell::sync::Lazy;
use tracing::debug;

static DEFAULT_ENGINE: Lazy<Engine> = Lazy::new(Engine::builtin);

/// Built-in lexicon with default parameters, built on first use.
pub fn default_engine() -> &'static Engine {
    &DEFAULT_ENGINE
}

/// Detector, rewriter and comparator sharing one lexicon.
///
/// The lexicon is narrowed to `params.strategy` once, at construction.
#[derive(Debug, Clone)]
pub struct Engine {
    lexicon: Lexicon,
    params: EngineParams,
}

impl Engine {
    pub fn new(lexicon: Lexicon, params: EngineParams) -> Self {
        let full = lexicon.len();
        let lexicon = lexicon.subset(&params.strategy);
        debug!(
            entries = lexicon.len(),
            filtered = full - lexicon.len(),
            "engine ready"
        );
        Self { lexicon, params }
    }

    /// Built-in lexicon with custom parameters.
    pub fn with_params(params: EngineParams) -> Self {
        Self::new(Lexicon::builtin(), params)
    }

    pub fn builtin() -> Self {
        Self::with_params(EngineParams::default())
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn detect(&self, text: &str) -> DetectionResult {
        Detector::new(&self.lexicon).detect(text)
    }

    pub fn suggestions(&self, detection: &DetectionResult) -> Vec<Suggestion> {
        suggestions(detection)
    }

    /// Rewrite `text`; `prior` is reused when it was detected on the same text.
    pub fn rewrite(&self, text: &str, prior: Option<&DetectionResult>) -> RewriteResult {
        Rewriter::new(&self.lexicon, self.params.rewrite.clone()).rewrite(text, prior)
    }

    pub fn compare(&self, original: &str, rewritten: &str) -> ComparisonReport {
        Comparator::new(&self.lexicon, self.params.compare.clone()).compare(original, rewritten)
    }

    /// Detect, rewrite and compare in one go.
    pub fn process(&self, text: &str) -> (DetectionResult, RewriteResult, ComparisonReport) {
        let detection = self.detect(text);
        let rewrite = self.rewrite(text, Some(&detection));
        let report = self.compare(text, &rewrite.rewritten_text);
        (detection, rewrite, report)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::builtin()
    }
}
