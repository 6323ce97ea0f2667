//! The pattern lexicon: AI-associated words and phrases with plainer alternatives.
//!
//! Entries are kept in phrase-before-word order so that a multi-word pattern is
//! always tried before any of its component words. Each entry carries one
//! compiled, case-insensitive, whole-word matcher.

use crate::models::{Category as C, LexiconEntry, LexiconStats, Severity as S, Strategy};
use crate::tokenize::is_word_char;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("Lexicon entry has an empty pattern")]
    EmptyPattern,
    #[error("Pattern has no usable alternatives: {0}")]
    NoAlternatives(String),
    #[error("Duplicate pattern: {0}")]
    DuplicatePattern(String),
    #[error("Cannot compile matcher for {pattern:?}: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Letter-casing style of a matched span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStyle {
    /// Every letter uppercase ("UTILIZE")
    Upper,
    /// Leading word capitalized, rest of it lowercase ("Utilize", "A myriad")
    Title,
    /// Anything else; alternatives keep their listed form
    Lower,
}

impl CaseStyle {
    /// Classify the casing of `text`.
    pub fn of(text: &str) -> CaseStyle {
        let has_letters = text.chars().any(char::is_alphabetic);
        if has_letters && !text.chars().any(char::is_lowercase) {
            return CaseStyle::Upper;
        }

        // Only the first run of letters decides, so "A multitude" is Title
        let mut letters = text
            .chars()
            .skip_while(|c| !c.is_alphabetic())
            .take_while(|c| c.is_alphabetic());
        match letters.next() {
            Some(first) if first.is_uppercase() && letters.all(char::is_lowercase) => {
                CaseStyle::Title
            }
            _ => CaseStyle::Lower,
        }
    }

    /// Reformat `text` into this style.
    pub fn apply(&self, text: &str) -> String {
        match self {
            CaseStyle::Upper => text.to_uppercase(),
            CaseStyle::Title => capitalize_first(&text.to_lowercase()),
            CaseStyle::Lower => text.to_string(),
        }
    }
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Compile the whole-word matcher for a pattern.
///
/// Word boundaries are only asserted on sides where the pattern begins or ends
/// with a word character; internal spaces match any run of whitespace.
fn build_matcher(pattern: &str) -> Result<Regex, regex::Error> {
    let body = pattern
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    let starts_word = pattern.chars().next().map_or(false, is_word_char);
    let ends_word = pattern.chars().last().map_or(false, is_word_char);

    let mut source = String::with_capacity(body.len() + 10);
    source.push_str("(?i)");
    if starts_word {
        source.push_str(r"\b");
    }
    source.push_str(&body);
    if ends_word {
        source.push_str(r"\b");
    }

    Regex::new(&source)
}

/// Immutable, ordered pattern table
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
    matchers: Vec<Regex>, // Parallel to entries
    index: HashMap<String, usize>,
}

impl Lexicon {
    /// Build a lexicon from raw entries.
    ///
    /// Patterns and alternatives are trimmed, empty alternatives dropped, and the
    /// table reordered phrase-first (more words first, then longer patterns,
    /// otherwise input order).
    pub fn new(entries: Vec<LexiconEntry>) -> Result<Self, LexiconError> {
        let mut cleaned = Vec::with_capacity(entries.len());
        let mut seen: HashMap<String, ()> = HashMap::with_capacity(entries.len());

        for entry in entries {
            let pattern = entry.pattern.split_whitespace().collect::<Vec<_>>().join(" ");
            if pattern.is_empty() {
                return Err(LexiconError::EmptyPattern);
            }

            let alternatives: Vec<String> = entry
                .alternatives
                .iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect();
            if alternatives.is_empty() {
                return Err(LexiconError::NoAlternatives(pattern));
            }

            if seen.insert(pattern.to_lowercase(), ()).is_some() {
                return Err(LexiconError::DuplicatePattern(pattern));
            }

            cleaned.push(LexiconEntry {
                pattern,
                alternatives,
                category: entry.category,
                severity: entry.severity,
            });
        }

        cleaned.sort_by_key(|e| (Reverse(e.word_count()), Reverse(e.pattern.chars().count())));

        let matchers = cleaned
            .iter()
            .map(|e| {
                build_matcher(&e.pattern).map_err(|source| LexiconError::Regex {
                    pattern: e.pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_parts(cleaned, matchers))
    }

    fn from_parts(entries: Vec<LexiconEntry>, matchers: Vec<Regex>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.pattern.to_lowercase(), i))
            .collect();
        Self {
            entries,
            matchers,
            index,
        }
    }

    /// The built-in table.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// All entries, phrase-first.
    pub fn all_entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    /// Entries paired with their compiled matchers, phrase-first.
    pub fn entries_with_matchers(&self) -> impl Iterator<Item = (&LexiconEntry, &Regex)> {
        self.entries.iter().zip(self.matchers.iter())
    }

    /// Single-word entries (hyphenated words count as one word).
    pub fn word_entries(&self) -> impl Iterator<Item = &LexiconEntry> {
        self.entries.iter().filter(|e| !e.is_phrase())
    }

    pub fn phrase_entries(&self) -> impl Iterator<Item = &LexiconEntry> {
        self.entries.iter().filter(|e| e.is_phrase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup by pattern.
    pub fn get(&self, pattern: &str) -> Option<&LexiconEntry> {
        let key = pattern.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        self.index.get(&key).map(|&i| &self.entries[i])
    }

    /// The `n`th alternative (wrapping) for a pattern, reformatted to `style`.
    pub fn alternative_at(&self, pattern: &str, n: usize, style: CaseStyle) -> Option<String> {
        let entry = self.get(pattern)?;
        let alternative = &entry.alternatives[n % entry.alternatives.len()];
        Some(style.apply(alternative))
    }

    /// First alternative for a pattern in the given case style.
    ///
    /// Unknown patterns come back unchanged; this runs in the middle of
    /// rewriting and must not interrupt output.
    pub fn alternative_for(&self, pattern: &str, style: CaseStyle) -> String {
        self.alternative_at(pattern, 0, style)
            .unwrap_or_else(|| pattern.to_string())
    }

    /// Copy restricted to the entries a strategy allows.
    pub fn subset(&self, strategy: &Strategy) -> Lexicon {
        let (entries, matchers): (Vec<_>, Vec<_>) = self
            .entries_with_matchers()
            .filter(|(e, _)| strategy.allows(e))
            .map(|(e, m)| (e.clone(), m.clone()))
            .unzip();
        Self::from_parts(entries, matchers)
    }

    pub fn stats(&self) -> LexiconStats {
        let mut stats = LexiconStats {
            total_entries: self.entries.len(),
            ..Default::default()
        };

        for entry in &self.entries {
            if entry.is_phrase() {
                stats.phrase_entries += 1;
            } else {
                stats.word_entries += 1;
            }
            stats.total_alternatives += entry.alternatives.len();
            *stats.by_category.entry(entry.category).or_default() += 1;
            *stats.by_severity.entry(entry.severity).or_default() += 1;
        }

        stats
    }

    /// Load a lexicon from a JSON array of entries.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, LexiconError> {
        let entries: Vec<LexiconEntry> = serde_json::from_reader(reader)?;
        Self::new(entries)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, LexiconError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    /// Write the entries as a JSON array.
    pub fn to_json_writer<W: Write>(&self, writer: &mut W) -> Result<(), LexiconError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        writer.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn to_json_file(&self, path: &Path) -> Result<(), LexiconError> {
        let mut file = std::fs::File::create(path)?;
        self.to_json_writer(&mut file)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

static BUILTIN: Lazy<Lexicon> = Lazy::new(|| {
    let entries = BUILTIN_TABLE
        .iter()
        .map(|(pattern, alternatives, category, severity)| {
            LexiconEntry::new(pattern, alternatives, *category, *severity)
        })
        .collect();
    Lexicon::new(entries).expect("built-in lexicon is valid")
});

type RawEntry = (&'static str, &'static [&'static str], C, S);

// No alternative below may itself be matched by any pattern in this table.
static BUILTIN_TABLE: &[RawEntry] = &[
    // Stock phrases
    ("it is important to note that", &["note that"], C::Phrase, S::High),
    ("it is important to note", &["note that"], C::Phrase, S::High),
    ("it should be noted that", &["note that"], C::Phrase, S::High),
    ("it should be noted", &["importantly"], C::Phrase, S::High),
    ("it is worth mentioning", &["worth noting"], C::Phrase, S::High),
    ("it is essential to understand", &["understand that"], C::Phrase, S::High),
    ("it is crucial to recognize", &["recognize that"], C::Phrase, S::High),
    ("it is vital to consider", &["consider that"], C::Phrase, S::High),
    ("delve into", &["explore", "dig into"], C::Phrase, S::High),
    ("in conclusion", &["finally", "to wrap up"], C::Phrase, S::Medium),
    ("to summarize", &["in short"], C::Phrase, S::Medium),
    ("in summary", &["in short"], C::Phrase, S::Medium),
    ("to conclude", &["finally"], C::Phrase, S::Medium),
    ("first and foremost", &["first"], C::Phrase, S::Medium),
    ("last but not least", &["finally"], C::Phrase, S::Medium),
    ("on the other hand", &["however"], C::Phrase, S::Low),
    ("in the realm of", &["in"], C::Phrase, S::Medium),
    ("in the context of", &["in"], C::Phrase, S::Low),
    ("with regard to", &["about"], C::Phrase, S::Medium),
    ("with respect to", &["about"], C::Phrase, S::Low),
    ("in relation to", &["about"], C::Phrase, S::Low),
    ("in terms of", &["for"], C::Phrase, S::Low),
    ("as a result of", &["because of"], C::Phrase, S::Low),
    ("due to the fact that", &["because"], C::Phrase, S::Medium),
    ("despite the fact that", &["although"], C::Phrase, S::Medium),
    ("in the event that", &["if"], C::Phrase, S::Medium),
    ("for the purpose of", &["for"], C::Phrase, S::Medium),
    ("for the reason that", &["because"], C::Phrase, S::Medium),
    ("in order to", &["to"], C::Phrase, S::Low),
    ("in light of", &["because of"], C::Phrase, S::Low),
    ("by virtue of", &["because of"], C::Phrase, S::Low),
    ("on the basis of", &["based on"], C::Phrase, S::Low),
    ("all things considered", &["overall"], C::Phrase, S::Medium),
    ("taking everything into account", &["overall"], C::Phrase, S::Medium),
    ("after careful consideration", &["after thinking about it"], C::Phrase, S::Medium),
    ("upon reflection", &["thinking about it"], C::Phrase, S::Medium),
    ("in the final analysis", &["in the end"], C::Phrase, S::Medium),
    ("when all is said and done", &["in the end"], C::Phrase, S::Medium),
    ("a plethora of", &["plenty of"], C::Phrase, S::Medium),
    ("a myriad of", &["many"], C::Phrase, S::Medium),
    ("a multitude of", &["many"], C::Phrase, S::Medium),
    ("paradigm shift", &["big change"], C::Buzzword, S::High),
    // Transitions
    ("furthermore", &["also", "plus", "what's more"], C::Transition, S::High),
    ("moreover", &["plus", "also", "on top of that"], C::Transition, S::High),
    ("additionally", &["also", "besides"], C::Transition, S::Medium),
    ("consequently", &["so", "as a result"], C::Transition, S::Medium),
    ("subsequently", &["then", "later", "after that"], C::Transition, S::Medium),
    ("nevertheless", &["still", "even so"], C::Transition, S::Medium),
    ("nonetheless", &["still", "even so"], C::Transition, S::Medium),
    ("accordingly", &["so"], C::Transition, S::Medium),
    ("therefore", &["so"], C::Transition, S::Low),
    ("thereby", &["thus"], C::Transition, S::Medium),
    ("wherein", &["where"], C::Transition, S::Medium),
    ("whereas", &["while"], C::Transition, S::Low),
    ("whereby", &["by which"], C::Transition, S::Medium),
    ("henceforth", &["from now on"], C::Transition, S::Medium),
    ("heretofore", &["until now"], C::Transition, S::Medium),
    ("hitherto", &["until now"], C::Transition, S::Medium),
    ("notwithstanding", &["despite"], C::Transition, S::Medium),
    ("albeit", &["although"], C::Transition, S::Medium),
    ("inasmuch", &["since"], C::Transition, S::Low),
    ("insofar", &["to the extent"], C::Transition, S::Low),
    // Corporate jargon
    ("utilize", &["use", "employ"], C::Corporate, S::High),
    ("utilization", &["use"], C::Corporate, S::High),
    ("leverage", &["use", "draw on"], C::Corporate, S::High),
    ("facilitate", &["help", "ease"], C::Corporate, S::High),
    ("comprehensive", &["complete", "thorough"], C::Corporate, S::Medium),
    ("optimize", &["improve", "tune"], C::Corporate, S::Medium),
    ("enhance", &["improve", "boost"], C::Corporate, S::Medium),
    ("implement", &["use", "carry out", "put in place"], C::Corporate, S::Medium),
    ("demonstrate", &["show"], C::Corporate, S::Medium),
    ("establish", &["create", "set up"], C::Corporate, S::Low),
    ("maintain", &["keep"], C::Corporate, S::Low),
    ("ensure", &["make sure"], C::Corporate, S::Low),
    ("holistic", &["whole", "complete"], C::Corporate, S::Medium),
    ("synergistic", &["combined"], C::Corporate, S::High),
    ("synergy", &["teamwork"], C::Corporate, S::High),
    ("paradigm", &["model"], C::Corporate, S::Medium),
    ("methodology", &["method"], C::Corporate, S::Medium),
    ("streamline", &["simplify"], C::Corporate, S::Medium),
    ("expedite", &["speed up"], C::Corporate, S::Medium),
    ("consolidate", &["combine"], C::Corporate, S::Low),
    ("strategize", &["plan"], C::Corporate, S::Medium),
    ("prioritize", &["focus on"], C::Corporate, S::Low),
    ("maximize", &["increase"], C::Corporate, S::Low),
    ("minimize", &["reduce"], C::Corporate, S::Low),
    ("stakeholders", &["people involved"], C::Corporate, S::Low),
    ("actionable", &["practical"], C::Corporate, S::Medium),
    ("deliverables", &["results"], C::Corporate, S::Medium),
    // Academic register
    ("specifically", &["exactly"], C::Academic, S::Low),
    ("particularly", &["especially"], C::Academic, S::Low),
    ("significantly", &["greatly", "a lot"], C::Academic, S::Medium),
    ("substantially", &["largely"], C::Academic, S::Medium),
    ("essentially", &["basically"], C::Academic, S::Low),
    ("fundamentally", &["basically"], C::Academic, S::Medium),
    ("primarily", &["mainly"], C::Academic, S::Low),
    ("predominantly", &["mostly"], C::Academic, S::Medium),
    ("ultimately", &["finally", "in the end"], C::Academic, S::Medium),
    ("alternatively", &["instead"], C::Academic, S::Low),
    ("undeniably", &["clearly"], C::Academic, S::Medium),
    ("unequivocally", &["clearly"], C::Academic, S::High),
    ("indubitably", &["certainly"], C::Academic, S::High),
    ("invariably", &["always"], C::Academic, S::Medium),
    ("perpetually", &["always"], C::Academic, S::Medium),
    ("consistently", &["regularly"], C::Academic, S::Low),
    ("meticulously", &["carefully"], C::Academic, S::High),
    ("systematically", &["step by step"], C::Academic, S::Medium),
    ("comprehensively", &["completely"], C::Academic, S::Medium),
    ("extensively", &["widely"], C::Academic, S::Low),
    ("commence", &["start", "begin"], C::Academic, S::Medium),
    ("ascertain", &["find out"], C::Academic, S::Medium),
    ("endeavor", &["try"], C::Academic, S::Medium),
    ("aforementioned", &["mentioned earlier"], C::Academic, S::Medium),
    ("sufficient", &["enough"], C::Academic, S::Low),
    ("numerous", &["many"], C::Academic, S::Low),
    ("myriad", &["many"], C::Academic, S::Medium),
    ("plethora", &["plenty"], C::Academic, S::Medium),
    // Buzzwords
    ("cutting-edge", &["advanced"], C::Buzzword, S::High),
    ("state-of-the-art", &["modern"], C::Buzzword, S::High),
    ("next-generation", &["new"], C::Buzzword, S::Medium),
    ("game-changing", &["important"], C::Buzzword, S::High),
    ("world-class", &["excellent"], C::Buzzword, S::Medium),
    ("industry-leading", &["leading"], C::Buzzword, S::Medium),
    ("innovative", &["new", "fresh"], C::Buzzword, S::Medium),
    ("revolutionary", &["new"], C::Buzzword, S::Medium),
    ("groundbreaking", &["new", "original"], C::Buzzword, S::High),
    ("unprecedented", &["unique"], C::Buzzword, S::Medium),
    ("transformative", &["changing"], C::Buzzword, S::Medium),
    ("disruptive", &["changing"], C::Buzzword, S::Medium),
    ("pioneering", &["leading"], C::Buzzword, S::Medium),
    ("robust", &["strong"], C::Buzzword, S::Medium),
    ("seamless", &["smooth"], C::Buzzword, S::Medium),
    ("scalable", &["expandable"], C::Buzzword, S::Low),
    ("versatile", &["flexible"], C::Buzzword, S::Low),
    ("optimal", &["best"], C::Buzzword, S::Low),
    ("sophisticated", &["complex"], C::Buzzword, S::Low),
    ("ecosystem", &["environment"], C::Buzzword, S::Low),
    // Descriptors
    ("remarkable", &["notable"], C::Descriptor, S::Low),
    ("extraordinary", &["unusual"], C::Descriptor, S::Low),
    ("exceptional", &["great"], C::Descriptor, S::Low),
    ("outstanding", &["great"], C::Descriptor, S::Low),
    ("noteworthy", &["interesting"], C::Descriptor, S::Low),
    ("impressive", &["solid"], C::Descriptor, S::Low),
    ("invaluable", &["very useful"], C::Descriptor, S::Medium),
    ("pivotal", &["key"], C::Descriptor, S::High),
    ("paramount", &["most important"], C::Descriptor, S::High),
    ("crucial", &["key"], C::Descriptor, S::Medium),
    ("multifaceted", &["complex"], C::Descriptor, S::Medium),
    ("meticulous", &["careful"], C::Descriptor, S::Medium),
    ("tapestry", &["mix"], C::Descriptor, S::High),
    ("testament", &["proof"], C::Descriptor, S::Medium),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Severity};

    #[test]
    fn test_builtin_is_phrase_first() {
        let lexicon = Lexicon::builtin();
        let entries = lexicon.all_entries();

        let first_word = entries.iter().position(|e| !e.is_phrase()).unwrap();
        assert!(entries[..first_word].iter().all(|e| e.is_phrase()));
        assert!(entries[first_word..].iter().all(|e| !e.is_phrase()));

        // Longer phrases come before the phrases they contain
        let long = entries
            .iter()
            .position(|e| e.pattern == "it is important to note that")
            .unwrap();
        let short = entries
            .iter()
            .position(|e| e.pattern == "it is important to note")
            .unwrap();
        assert!(long < short);
    }

    #[test]
    fn test_builtin_covers_all_categories() {
        let stats = Lexicon::builtin().stats();
        for category in Category::ALL {
            assert!(
                stats.by_category.get(&category).copied().unwrap_or(0) > 0,
                "no entries for {}",
                category
            );
        }
        assert!(stats.total_entries >= 100);
        assert_eq!(stats.total_entries, stats.phrase_entries + stats.word_entries);
    }

    #[test]
    fn test_builtin_alternatives_never_rematch() {
        let lexicon = Lexicon::builtin();
        for entry in lexicon.all_entries() {
            for alternative in &entry.alternatives {
                for (other, matcher) in lexicon.entries_with_matchers() {
                    assert!(
                        !matcher.is_match(alternative),
                        "alternative {:?} of {:?} matches pattern {:?}",
                        alternative,
                        entry.pattern,
                        other.pattern
                    );
                }
            }
        }
    }

    #[test]
    fn test_case_style_detection() {
        assert_eq!(CaseStyle::of("UTILIZE"), CaseStyle::Upper);
        assert_eq!(CaseStyle::of("Utilize"), CaseStyle::Title);
        assert_eq!(CaseStyle::of("utilize"), CaseStyle::Lower);
        assert_eq!(CaseStyle::of("uTILIZE"), CaseStyle::Lower);
        assert_eq!(CaseStyle::of("A"), CaseStyle::Upper);
        assert_eq!(CaseStyle::of("It is important to note"), CaseStyle::Title);
        assert_eq!(CaseStyle::of("123"), CaseStyle::Lower);
        assert_eq!(CaseStyle::of("A multitude of"), CaseStyle::Title);
        assert_eq!(CaseStyle::of("A plethora of"), CaseStyle::Title);
        assert_eq!(CaseStyle::of("Cutting-edge"), CaseStyle::Title);
        assert_eq!(CaseStyle::of("McKinsey"), CaseStyle::Lower);
        assert_eq!(CaseStyle::of("a Myriad of"), CaseStyle::Lower);
    }

    #[test]
    fn test_case_style_apply() {
        assert_eq!(CaseStyle::Upper.apply("make sure"), "MAKE SURE");
        assert_eq!(CaseStyle::Title.apply("make SURE"), "Make sure");
        assert_eq!(CaseStyle::Lower.apply("what's more"), "what's more");
    }

    #[test]
    fn test_alternative_for_preserves_case_for_all_entries() {
        let lexicon = Lexicon::builtin();
        for entry in lexicon.all_entries() {
            let upper = lexicon.alternative_for(&entry.pattern, CaseStyle::of(&entry.pattern.to_uppercase()));
            assert_eq!(upper, upper.to_uppercase(), "pattern {:?}", entry.pattern);

            let title = lexicon.alternative_for(&entry.pattern, CaseStyle::Title);
            let first = title.chars().next().unwrap();
            assert!(first.is_uppercase(), "pattern {:?} gave {:?}", entry.pattern, title);
        }
    }

    #[test]
    fn test_alternative_for_unknown_pattern() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.alternative_for("frobnicate", CaseStyle::Upper), "frobnicate");
        assert!(lexicon.alternative_at("frobnicate", 0, CaseStyle::Lower).is_none());
    }

    #[test]
    fn test_alternative_at_wraps() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.alternative_at("utilize", 0, CaseStyle::Lower).unwrap(), "use");
        assert_eq!(lexicon.alternative_at("utilize", 1, CaseStyle::Lower).unwrap(), "employ");
        assert_eq!(lexicon.alternative_at("utilize", 2, CaseStyle::Lower).unwrap(), "use");
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let lexicon = Lexicon::builtin();
        assert!(lexicon.get("UTILIZE").is_some());
        assert!(lexicon.get("In  Order To").is_some());
        assert!(lexicon.get("utilise").is_none());
    }

    #[test]
    fn test_matcher_whole_word_only() {
        let lexicon = Lexicon::builtin();
        let (_, matcher) = lexicon
            .entries_with_matchers()
            .find(|(e, _)| e.pattern == "enhance")
            .unwrap();

        assert!(matcher.is_match("we enhance it"));
        assert!(matcher.is_match("Enhance, then ship."));
        assert!(!matcher.is_match("enhancement"));
        assert!(!matcher.is_match("reenhance"));
    }

    #[test]
    fn test_phrase_matcher_spans_whitespace() {
        let lexicon = Lexicon::builtin();
        let (_, matcher) = lexicon
            .entries_with_matchers()
            .find(|(e, _)| e.pattern == "in order to")
            .unwrap();
        assert!(matcher.is_match("in  order\tto"));
    }

    #[test]
    fn test_new_rejects_invalid_entries() {
        let empty = LexiconEntry::new("  ", &["x"], Category::Phrase, Severity::Low);
        assert!(matches!(Lexicon::new(vec![empty]), Err(LexiconError::EmptyPattern)));

        let no_alt = LexiconEntry::new("foo", &[" "], Category::Phrase, Severity::Low);
        assert!(matches!(
            Lexicon::new(vec![no_alt]),
            Err(LexiconError::NoAlternatives(_))
        ));

        let a = LexiconEntry::new("Foo", &["bar"], Category::Phrase, Severity::Low);
        let b = LexiconEntry::new("foo", &["baz"], Category::Phrase, Severity::Low);
        assert!(matches!(
            Lexicon::new(vec![a, b]),
            Err(LexiconError::DuplicatePattern(_))
        ));
    }

    #[test]
    fn test_subset_by_strategy() {
        let lexicon = Lexicon::builtin();

        let transitions = lexicon.subset(&Strategy::only(&[Category::Transition]));
        assert!(!transitions.is_empty());
        assert!(transitions
            .all_entries()
            .iter()
            .all(|e| e.category == Category::Transition));
        assert!(transitions.get("furthermore").is_some());
        assert!(transitions.get("utilize").is_none());

        let conservative = lexicon.subset(&Strategy::conservative());
        assert!(conservative
            .all_entries()
            .iter()
            .all(|e| e.severity >= Severity::Medium));
        assert!(conservative.len() < lexicon.len());
    }

    #[test]
    fn test_json_round_trip() {
        let lexicon = Lexicon::builtin();
        let mut buffer = Vec::new();
        lexicon.to_json_writer(&mut buffer).unwrap();

        let loaded = Lexicon::from_json_reader(buffer.as_slice()).unwrap();
        assert_eq!(loaded.all_entries(), lexicon.all_entries());
    }
}
