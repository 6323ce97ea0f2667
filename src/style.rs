//! Sentence-shape and vocabulary analysis.
//!
//! Independent of the lexicon: measures rhythm, passive voice, word length,
//! Latin phrases, stock sentence openers and overused quantifiers across the
//! whole text.

use crate::models::StyleMetrics;
use once_cell::sync::Lazy;
use regex::Regex;

/// Below this variance in words per sentence the rhythm reads as uniform.
const UNIFORM_VARIANCE: f64 = 20.0;
/// Uniformity only counts with more sentences than this.
const UNIFORM_MIN_SENTENCES: usize = 3;
const UNIFORM_WEIGHT: f64 = 0.3;
const PASSIVE_RATIO_LIMIT: f64 = 0.3;
const PASSIVE_WEIGHT: f64 = 0.4;
/// Words with more letters than this count as complex.
const COMPLEX_WORD_LEN: usize = 6;
const COMPLEX_RATIO_LIMIT: f64 = 0.3;
const COMPLEX_WEIGHT: f64 = 0.3;
const LATIN_WEIGHT: f64 = 0.2;
/// A quantifier is overused once it appears more often than this.
const REPETITION_LIMIT: usize = 2;

static LATIN_PHRASES: &[&str] = &[
    "ad hoc",
    "per se",
    "vis-à-vis",
    "de facto",
    "prima facie",
    "inter alia",
    "circa",
    "versus",
    "ergo",
    "ipso facto",
];

static SENTENCE_STARTERS: &[&str] = &[
    "it is important to understand",
    "it should be noted that",
    "it is worth considering",
    "one must consider",
    "it is essential to",
    "it is crucial to",
    "it is vital to",
    "it is necessary to",
    "when considering",
    "in order to",
    "for the purpose of",
    "with regard to",
    "in relation to",
    "concerning the matter of",
    "with respect to",
    "it cannot be denied that",
    "it goes without saying that",
    "needless to say",
    "it stands to reason that",
    "it is widely acknowledged that",
    "it is generally accepted that",
    "there is no doubt that",
    "it is undeniable that",
    "it is universally recognized that",
    "it is commonly understood that",
];

static QUANTIFIERS: &[&str] = &[
    "various",
    "numerous",
    "multiple",
    "diverse",
    "range of",
    "variety of",
    "array of",
    "multitude of",
    "plethora of",
    "myriad of",
    "abundance of",
    "wealth of",
    "host of",
    "spectrum of",
    "gamut of",
];

static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

static PASSIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:is|are|was|were|been)\s+\w+ed\b").unwrap());

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

fn bounded(phrases: &[&str]) -> Vec<Regex> {
    phrases
        .iter()
        .map(|p| {
            let words: Vec<String> = p.split_whitespace().map(regex::escape).collect();
            Regex::new(&format!(r"(?i)\b{}\b", words.join(r"\s+"))).unwrap()
        })
        .collect()
}

static LATIN_RES: Lazy<Vec<Regex>> = Lazy::new(|| bounded(LATIN_PHRASES));
static STARTER_RES: Lazy<Vec<Regex>> = Lazy::new(|| bounded(SENTENCE_STARTERS));
static QUANTIFIER_RES: Lazy<Vec<Regex>> = Lazy::new(|| bounded(QUANTIFIERS));

/// Measure every style signal of `text`.
pub fn analyze(text: &str) -> StyleMetrics {
    if text.trim().is_empty() {
        return StyleMetrics::default();
    }

    let lengths = sentence_lengths(text);
    let sentence_count = lengths.len();
    let (average_sentence_length, sentence_length_variance) = mean_and_variance(&lengths);

    let passive_count = PASSIVE.find_iter(text).count();
    let passive_ratio = ratio(passive_count, sentence_count);

    let complex_word_ratio = complex_word_ratio(text);
    let latin_phrases: Vec<String> = LATIN_PHRASES
        .iter()
        .zip(LATIN_RES.iter())
        .filter(|(_, re)| re.is_match(text))
        .map(|(phrase, _)| phrase.to_string())
        .collect();

    let sentence_starters = STARTER_RES.iter().filter(|re| re.is_match(text)).count();
    let repetitive_uses = QUANTIFIER_RES
        .iter()
        .map(|re| re.find_iter(text).count())
        .filter(|&uses| uses > REPETITION_LIMIT)
        .sum();

    let mut structure_score = 0.0;
    if sentence_count > UNIFORM_MIN_SENTENCES && sentence_length_variance < UNIFORM_VARIANCE {
        structure_score += UNIFORM_WEIGHT;
    }
    if passive_ratio > PASSIVE_RATIO_LIMIT {
        structure_score += PASSIVE_WEIGHT;
    }

    let mut complexity_score = LATIN_WEIGHT * latin_phrases.len() as f64;
    if complex_word_ratio > COMPLEX_RATIO_LIMIT {
        complexity_score += COMPLEX_WEIGHT;
    }

    StyleMetrics {
        sentence_count,
        average_sentence_length,
        sentence_length_variance,
        passive_count,
        passive_ratio,
        complex_word_ratio,
        latin_phrases,
        sentence_starters,
        repetitive_uses,
        structure_score,
        complexity_score,
    }
}

/// Words per sentence, splitting on runs of terminal punctuation.
fn sentence_lengths(text: &str) -> Vec<f64> {
    SENTENCE_BREAK
        .split(text)
        .map(|s| s.split_whitespace().count())
        .filter(|&words| words > 0)
        .map(|words| words as f64)
        .collect()
}

fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}

fn complex_word_ratio(text: &str) -> f64 {
    let mut words = 0usize;
    let mut complex = 0usize;
    for m in WORD.find_iter(text) {
        words += 1;
        if m.as_str().chars().count() > COMPLEX_WORD_LEN {
            complex += 1;
        }
    }
    ratio(complex, words)
}

#[inline]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
