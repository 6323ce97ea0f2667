//! Paragraph layout, word tokens and sentences.
//!
//! Everything here is a pure function over borrowed text. Offsets are byte
//! offsets into the input.

use once_cell::sync::Lazy;
use regex::Regex;

/// Blank-line paragraph separator: newline, optional whitespace, newline.
static PARAGRAPH_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

static SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+(?:[.!?]+|$)").unwrap());

/// A paragraph and the separator that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paragraph<'a> {
    pub index: usize,
    pub offset: usize, // Byte offset of `text` in the source
    pub text: &'a str,
    pub separator: &'a str, // Empty for the last paragraph
}

impl<'a> Paragraph<'a> {
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// A maximal run of non-whitespace characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
}

impl<'a> Token<'a> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split text into paragraphs with their exact separators.
///
/// Concatenating every `text` followed by its `separator` gives back the input
/// byte for byte. A leading or trailing separator yields an empty paragraph.
pub fn paragraph_layout(text: &str) -> Vec<Paragraph<'_>> {
    let mut paragraphs = Vec::new();
    let mut cursor = 0usize;

    for sep in PARAGRAPH_SEPARATOR.find_iter(text) {
        paragraphs.push(Paragraph {
            index: paragraphs.len(),
            offset: cursor,
            text: &text[cursor..sep.start()],
            separator: sep.as_str(),
        });
        cursor = sep.end();
    }

    paragraphs.push(Paragraph {
        index: paragraphs.len(),
        offset: cursor,
        text: &text[cursor..],
        separator: "",
    });

    paragraphs
}

/// Paragraph texts only, untrimmed.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    paragraph_layout(text).into_iter().map(|p| p.text).collect()
}

/// Number of paragraphs with any non-whitespace content.
pub fn paragraph_count(text: &str) -> usize {
    paragraph_layout(text)
        .iter()
        .filter(|p| !p.text.trim().is_empty())
        .count()
}

/// Whitespace-delimited tokens with punctuation left attached.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    TOKEN
        .find_iter(text)
        .map(|m| Token {
            text: m.as_str(),
            start: m.start(),
        })
        .collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercased token with everything except word characters stripped.
pub fn clean_word(token: &str) -> String {
    token
        .chars()
        .filter(|&c| is_word_char(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Raw byte ranges of sentences, each running up to and including its
/// terminal punctuation. Leading whitespace belongs to the sentence.
pub fn sentence_ranges(text: &str) -> Vec<(usize, usize)> {
    SENTENCE
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Sentences, trimmed, terminal punctuation kept.
pub fn split_sentences(text: &str) -> Vec<&str> {
    sentence_ranges(text)
        .into_iter()
        .map(|(start, end)| text[start..end].trim())
        .filter(|s| s.chars().any(|c| !matches!(c, '.' | '!' | '?')))
        .collect()
}

pub fn sentence_count(text: &str) -> usize {
    split_sentences(text).len()
}

/// Mean words per sentence, 0 for text without sentences.
pub fn average_sentence_length(text: &str) -> f64 {
    let sentences = sentence_count(text);
    if sentences == 0 {
        return 0.0;
    }
    word_count(text) as f64 / sentences as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rebuild(text: &str) -> String {
        paragraph_layout(text)
            .iter()
            .map(|p| format!("{}{}", p.text, p.separator))
            .collect()
    }

    #[test]
    fn test_single_paragraph() {
        let layout = paragraph_layout("Just one line.");
        assert_eq!(layout.len(), 1);
        assert_eq!(layout[0].text, "Just one line.");
        assert_eq!(layout[0].separator, "");
        assert_eq!(layout[0].offset, 0);
    }

    #[test]
    fn test_blank_line_separators() {
        let text = "First.\n\nSecond.\n  \n\nThird.";
        let layout = paragraph_layout(text);

        assert_eq!(split_paragraphs(text), vec!["First.", "Second.", "Third."]);
        assert_eq!(layout[0].separator, "\n\n");
        assert_eq!(layout[1].separator, "\n  \n\n");
        assert_eq!(layout[2].offset, text.find("Third").unwrap());
    }

    #[test]
    fn test_single_newline_is_not_a_separator() {
        assert_eq!(split_paragraphs("line one\nline two"), vec!["line one\nline two"]);
    }

    #[test]
    fn test_leading_and_trailing_separators() {
        let text = "\n\nBody\n\n";
        assert_eq!(split_paragraphs(text), vec!["", "Body", ""]);
        assert_eq!(paragraph_count(text), 1);
    }

    #[test]
    fn test_layout_round_trip() {
        for text in [
            "",
            "a",
            "a\n\nb",
            "\n\n\n",
            "x\r\n\r\ny",
            "  lead\n \t\n trail  \n\n",
            "one\n\n\n\ntwo\n\nthree",
        ] {
            assert_eq!(rebuild(text), text, "layout of {:?}", text);
        }
    }

    #[test]
    fn test_paragraph_end() {
        let layout = paragraph_layout("ab\n\ncd");
        assert_eq!(layout[0].end(), 2);
        assert_eq!(layout[1].end(), 6);
    }

    #[test]
    fn test_tokenize_keeps_punctuation() {
        let tokens = tokenize("We  utilize, then\tstop.");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["We", "utilize,", "then", "stop."]);
        assert_eq!(tokens[1].start, 4);
        assert_eq!(tokens[1].end(), 12);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t").is_empty());
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("one two\n\nthree"), 3);
    }

    #[test]
    fn test_clean_word() {
        assert_eq!(clean_word("Utilize,"), "utilize");
        assert_eq!(clean_word("\"State-of-the-art\""), "stateoftheart");
        assert_eq!(clean_word("don't"), "dont");
        assert_eq!(clean_word("..."), "");
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("First one. Second?! third without end");
        assert_eq!(sentences, vec!["First one.", "Second?!", "third without end"]);
        assert_eq!(sentence_count("..."), 0);
        assert_eq!(sentence_count(""), 0);
    }

    #[test]
    fn test_sentence_ranges() {
        let text = "One. Two words!";
        assert_eq!(sentence_ranges(text), vec![(0, 4), (4, 15)]);
    }

    #[test]
    fn test_average_sentence_length() {
        assert_eq!(average_sentence_length(""), 0.0);
        assert_eq!(average_sentence_length("One two. Three four five six."), 3.0);
    }
}
