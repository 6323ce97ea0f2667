//! Secondary rewrite passes run after lexicon splicing.
//!
//! Each pass works one paragraph at a time and rejoins with the original
//! separators, so blank-line structure is never touched. Edits made here are
//! counted in [`NormalizationStats`], not as lexicon replacements.

use crate::lexicon::{capitalize_first, CaseStyle};
use crate::models::{NormalizationStats, RewriteOptions};
use crate::tokenize::{is_word_char, paragraph_layout, sentence_ranges, word_count};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

const HORIZONTAL: [char; 2] = [' ', '\t'];

/// Redundant framing phrases deleted outright
static FILLER_PHRASES: &[&str] = &[
    "it goes without saying that",
    "it is widely acknowledged that",
    "it is generally accepted that",
    "it is important to note that",
    "it cannot be denied that",
    "it stands to reason that",
    "it should be noted that",
    "there is no doubt that",
    "it is undeniable that",
    "it is obvious that",
    "it is evident that",
    "it is clear that",
    "needless to say",
];

static CONTRACTION_PAIRS: &[(&str, &str)] = &[
    ("do not", "don't"),
    ("does not", "doesn't"),
    ("did not", "didn't"),
    ("will not", "won't"),
    ("would not", "wouldn't"),
    ("could not", "couldn't"),
    ("should not", "shouldn't"),
    ("cannot", "can't"),
    ("is not", "isn't"),
    ("are not", "aren't"),
    ("was not", "wasn't"),
    ("were not", "weren't"),
    ("have not", "haven't"),
    ("has not", "hasn't"),
    ("had not", "hadn't"),
    ("it is", "it's"),
    ("that is", "that's"),
    ("there is", "there's"),
    ("here is", "here's"),
    ("what is", "what's"),
    ("who is", "who's"),
    ("they are", "they're"),
    ("we are", "we're"),
    ("you are", "you're"),
    ("i am", "I'm"),
    ("he is", "he's"),
    ("she is", "she's"),
    ("i will", "I'll"),
    ("you will", "you'll"),
    ("we will", "we'll"),
    ("they will", "they'll"),
    ("i would", "I'd"),
    ("you would", "you'd"),
    ("we would", "we'd"),
    ("they would", "they'd"),
];

/// Clause boundaries where a long sentence may be broken
static BREAK_WORDS: &[&str] = &[
    ", and",
    ", but",
    ", or",
    ", so",
    ", yet",
    ", however",
    ", therefore",
    ", consequently",
    ", furthermore",
    ", moreover",
    ", additionally",
    "; however",
    "; therefore",
    "; consequently",
];

/// Minimum distance in bytes between a break point and either sentence end
const MIN_CLAUSE_LEN: usize = 10;

fn alternation(phrases: impl Iterator<Item = &'static str>) -> String {
    phrases
        .map(|p| {
            p.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"[ \t]+")
        })
        .collect::<Vec<_>>()
        .join("|")
}

static FILLERS: Lazy<Regex> = Lazy::new(|| {
    let source = format!(
        r"(?i)\b(?:{})\b,?[ \t]*",
        alternation(FILLER_PHRASES.iter().copied())
    );
    Regex::new(&source).unwrap()
});

static CONTRACTIONS: Lazy<Regex> = Lazy::new(|| {
    let source = format!(
        r"(?i)\b(?:{})\b",
        alternation(CONTRACTION_PAIRS.iter().map(|(formal, _)| *formal))
    );
    Regex::new(&source).unwrap()
});

static CONTRACTION_LOOKUP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| CONTRACTION_PAIRS.iter().copied().collect());

/// Apply `f` to every paragraph and rejoin with the original separators.
fn map_paragraphs<F>(text: &str, mut f: F) -> (String, usize)
where
    F: FnMut(&str) -> (String, usize),
{
    let mut out = String::with_capacity(text.len());
    let mut total = 0usize;

    for paragraph in paragraph_layout(text) {
        let (rewritten, count) = f(paragraph.text);
        out.push_str(&rewritten);
        out.push_str(paragraph.separator);
        total += count;
    }

    (out, total)
}

/// Run the enabled passes in order: fillers, contractions, sentence splits.
pub fn normalize(text: &str, options: &RewriteOptions) -> (String, NormalizationStats) {
    let mut stats = NormalizationStats::default();
    let mut current = text.to_string();

    if options.remove_fillers {
        let (next, removed) = remove_fillers(&current);
        current = next;
        stats.fillers_removed = removed;
    }

    if options.contractions {
        let (next, contracted) = collapse_contractions(&current);
        current = next;
        stats.contractions = contracted;
    }

    if options.split_long_sentences {
        let (next, splits) = split_long_sentences(&current, options.max_sentence_words);
        current = next;
        stats.sentences_split = splits;
    }

    (current, stats)
}

// ============================================================================
// Fillers
// ============================================================================

/// Delete redundant framing phrases together with a trailing comma.
///
/// Returns the new text and the number of phrases removed.
pub fn remove_fillers(text: &str) -> (String, usize) {
    map_paragraphs(text, remove_fillers_in_paragraph)
}

fn remove_fillers_in_paragraph(paragraph: &str) -> (String, usize) {
    let mut out = String::with_capacity(paragraph.len());
    let mut cursor = 0usize;
    let mut removed = 0usize;
    let mut capitalize_next = false;

    for m in FILLERS.find_iter(paragraph) {
        push_segment(&mut out, &paragraph[cursor..m.start()], &mut capitalize_next);

        let head = out.trim_end_matches(HORIZONTAL);
        let at_sentence_start =
            head.is_empty() || head.ends_with(['.', '!', '?', '\n', '\r']);

        // Filler closing a clause: drop the dangling comma and space before it
        let rest = &paragraph[m.end()..];
        let line_rest = rest.trim_start_matches(HORIZONTAL);
        let mut end = m.end();
        if rest.starts_with(['.', '!', '?', ';', ':', ',']) {
            let keep = head.trim_end_matches(',').len();
            out.truncate(keep);
        } else if line_rest.is_empty() || line_rest.starts_with(['\n', '\r']) {
            // Filler ends the line: no trailing blanks left behind
            let keep = head.len();
            out.truncate(keep);
            end += rest.len() - line_rest.len();
        }

        capitalize_next = at_sentence_start;
        removed += 1;
        cursor = end;
    }

    if removed == 0 {
        return (paragraph.to_string(), 0);
    }

    push_segment(&mut out, &paragraph[cursor..], &mut capitalize_next);
    (out, removed)
}

fn push_segment(out: &mut String, segment: &str, capitalize_next: &mut bool) {
    if segment.is_empty() {
        return;
    }

    let segment = if out.ends_with(HORIZONTAL) {
        segment.trim_start_matches(HORIZONTAL)
    } else {
        segment
    };

    if *capitalize_next && segment.starts_with(char::is_lowercase) {
        out.push_str(&capitalize_first(segment));
    } else {
        out.push_str(segment);
    }
    *capitalize_next = false;
}

// ============================================================================
// Contractions
// ============================================================================

/// Collapse formal pairs ("do not") into contractions ("don't").
pub fn collapse_contractions(text: &str) -> (String, usize) {
    map_paragraphs(text, |paragraph| {
        let mut count = 0usize;
        let rewritten = CONTRACTIONS.replace_all(paragraph, |caps: &regex::Captures<'_>| {
            let matched = &caps[0];
            let key = matched
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            match CONTRACTION_LOOKUP.get(key.as_str()) {
                Some(contraction) => {
                    count += 1;
                    match_contraction_case(matched, contraction)
                }
                None => matched.to_string(),
            }
        });
        (rewritten.into_owned(), count)
    })
}

fn match_contraction_case(matched: &str, contraction: &str) -> String {
    match CaseStyle::of(matched) {
        CaseStyle::Upper => contraction.to_uppercase(),
        _ if matched.starts_with(char::is_uppercase) => capitalize_first(contraction),
        _ => contraction.to_string(),
    }
}

// ============================================================================
// Long sentences
// ============================================================================

/// Break sentences longer than `max_words` at their first clause boundary.
///
/// A sentence produced by a split may still be too long; running the pass
/// again splits it further.
pub fn split_long_sentences(text: &str, max_words: usize) -> (String, usize) {
    map_paragraphs(text, |paragraph| {
        let mut out = String::with_capacity(paragraph.len() + 8);
        let mut cursor = 0usize;
        let mut splits = 0usize;

        for (start, end) in sentence_ranges(paragraph) {
            let sentence = &paragraph[start..end];
            if word_count(sentence) <= max_words {
                continue;
            }
            if let Some(split) = split_sentence(sentence) {
                out.push_str(&paragraph[cursor..start]);
                out.push_str(&split);
                cursor = end;
                splits += 1;
            }
        }

        out.push_str(&paragraph[cursor..]);
        (out, splits)
    })
}

/// Split one sentence at its earliest usable clause boundary.
///
/// The punctuation at the boundary becomes a full stop and the conjunction
/// opens the next sentence.
fn split_sentence(sentence: &str) -> Option<String> {
    let lower = sentence.to_ascii_lowercase();
    let body_start = sentence.len() - sentence.trim_start().len();
    let body_end = sentence.trim_end().len();
    if body_end <= body_start {
        return None;
    }
    let body = &lower[body_start..body_end];

    let at = BREAK_WORDS
        .iter()
        .flat_map(|word| {
            body.match_indices(word).filter_map(move |(rel, _)| {
                let after = rel + word.len();
                let on_boundary = body[after..].chars().next().map_or(true, |c| !is_word_char(c));
                let clear_of_ends = rel >= MIN_CLAUSE_LEN && after + MIN_CLAUSE_LEN <= body.len();
                (on_boundary && clear_of_ends).then_some(body_start + rel)
            })
        })
        .min()?;

    let head = &sentence[..at];
    let tail = &sentence[at + 1..];
    let rest = tail.trim_start();
    let gap = &tail[..tail.len() - rest.len()];

    Some(format!("{}.{}{}", head, gap, capitalize_first(rest)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_filler_at_sentence_start() {
        let (out, removed) = remove_fillers("Needless to say, we won. It is clear that they lost.");
        assert_eq!(out, "We won. They lost.");
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_remove_filler_mid_sentence() {
        let (out, removed) = remove_fillers("We know it is clear that you won.");
        assert_eq!(out, "We know you won.");
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_remove_filler_before_punctuation() {
        let (out, _) = remove_fillers("It works, needless to say.");
        assert_eq!(out, "It works.");
    }

    #[test]
    fn test_remove_filler_keeps_paragraphs() {
        let text = "Needless to say, yes.\n\n  Plain   spacing here.";
        let (out, removed) = remove_fillers(text);
        assert_eq!(out, "Yes.\n\n  Plain   spacing here.");
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_remove_filler_at_paragraph_end() {
        let (out, removed) = remove_fillers("We won needless to say\n\nNext.");
        assert_eq!(out, "We won\n\nNext.");
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_remove_filler_at_line_end() {
        let (out, removed) = remove_fillers("We won needless to say  \nthen left.");
        assert_eq!(out, "We won\nthen left.");
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_remove_fillers_noop() {
        let text = "Nothing  to   remove.\n";
        assert_eq!(remove_fillers(text), (text.to_string(), 0));
    }

    #[test]
    fn test_contractions() {
        let (out, count) = collapse_contractions("We do not know. It is late. THEY ARE here.");
        assert_eq!(out, "We don't know. It's late. THEY'RE here.");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_contractions_pronoun_i() {
        let (out, _) = collapse_contractions("I am sure i will go.");
        assert_eq!(out, "I'm sure I'll go.");
    }

    #[test]
    fn test_contractions_whole_words_only() {
        let (out, count) = collapse_contractions("Visit is nothing; the editor is not here.");
        assert_eq!(out, "Visit is nothing; the editor isn't here.");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_contractions_do_not_cross_lines() {
        let text = "we do\nnot stop";
        assert_eq!(collapse_contractions(text), (text.to_string(), 0));
    }

    #[test]
    fn test_split_long_sentence() {
        let sentence = "The first clause of this sentence rambles on for quite a while, \
                        and the second clause keeps going with even more words until the end.";
        let (out, splits) = split_long_sentences(sentence, 10);

        assert_eq!(splits, 1);
        assert_eq!(
            out,
            "The first clause of this sentence rambles on for quite a while. \
             And the second clause keeps going with even more words until the end."
        );
    }

    #[test]
    fn test_split_skips_early_boundary() {
        let sentence = "Cats, and dogs were all running around the wide green park in the warm \
                        sun today, and then the owners called them back home for a late dinner.";
        let (out, splits) = split_long_sentences(sentence, 25);

        assert_eq!(splits, 1);
        assert_eq!(
            out,
            "Cats, and dogs were all running around the wide green park in the warm sun today. \
             And then the owners called them back home for a late dinner."
        );
    }

    #[test]
    fn test_short_sentence_not_split() {
        let text = "Short, and sweet.";
        assert_eq!(split_long_sentences(text, 2), (text.to_string(), 0));
    }

    #[test]
    fn test_split_needs_word_boundary() {
        let text = "Someone bought a phone, android based, with many extra words in this line.";
        assert_eq!(split_long_sentences(text, 5), (text.to_string(), 0));
    }

    #[test]
    fn test_normalize_order_and_stats() {
        let options = RewriteOptions::default();
        let (out, stats) = normalize("It is clear that we do not care.", &options);

        assert_eq!(out, "We don't care.");
        assert_eq!(stats.fillers_removed, 1);
        assert_eq!(stats.contractions, 1);
        assert_eq!(stats.sentences_split, 0);
    }

    #[test]
    fn test_normalize_disabled() {
        let options = RewriteOptions {
            remove_fillers: false,
            contractions: false,
            split_long_sentences: false,
            ..Default::default()
        };
        let text = "It is clear that we do not care.";
        let (out, stats) = normalize(text, &options);
        assert_eq!(out, text);
        assert_eq!(stats, NormalizationStats::default());
    }
}
