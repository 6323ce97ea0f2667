//! HTML highlight renderings of detections and comparisons.
//!
//! Marked ranges are wrapped in `<span>` elements; every other byte of the
//! source is HTML-escaped and emitted in place, so paragraph separators and
//! spacing survive unchanged.

use crate::models::Span;

/// A byte range to wrap in a highlight element
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub start: usize,
    pub end: usize,
    pub class: String,
    pub title: String,
    pub attrs: Vec<(&'static str, String)>,
}

impl Mark {
    pub fn new(start: usize, end: usize, class: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            start,
            end,
            class: class.into(),
            title: title.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render `text` with the given marks.
///
/// Marks are applied in start order; a mark overlapping an earlier one, or one
/// not on a char boundary, is ignored.
pub fn render(text: &str, mut marks: Vec<Mark>) -> String {
    marks.sort_by_key(|m| (m.start, std::cmp::Reverse(m.end)));

    let mut out = String::with_capacity(text.len() * 2);
    let mut cursor = 0usize;

    for mark in marks {
        if mark.start < cursor
            || mark.start >= mark.end
            || mark.end > text.len()
            || !text.is_char_boundary(mark.start)
            || !text.is_char_boundary(mark.end)
        {
            continue;
        }

        out.push_str(&escape_html(&text[cursor..mark.start]));
        out.push_str("<span class=\"");
        out.push_str(&escape_html(&mark.class));
        out.push('"');
        for (name, value) in &mark.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        out.push_str(" title=\"");
        out.push_str(&escape_html(&mark.title));
        out.push_str("\">");
        out.push_str(&escape_html(&text[mark.start..mark.end]));
        out.push_str("</span>");

        cursor = mark.end;
    }

    out.push_str(&escape_html(&text[cursor..]));
    out
}

/// Highlight detected spans with their category as metadata.
pub fn highlight_spans(text: &str, spans: &[Span]) -> String {
    let marks = spans
        .iter()
        .map(|span| {
            Mark::new(
                span.start,
                span.end,
                format!("ai-highlight ai-{}", span.category),
                format!("AI pattern: {}", span.pattern),
            )
            .with_attr("data-original", span.matched_text.clone())
            .with_attr("data-category", span.category.as_str())
        })
        .collect();

    render(text, marks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Severity};

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_html("it's"), "it&#39;s");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_render_without_marks_escapes_everything() {
        assert_eq!(render("<b>\n\nx", Vec::new()), "&lt;b&gt;\n\nx");
    }

    #[test]
    fn test_render_skips_overlapping_marks() {
        let marks = vec![
            Mark::new(0, 5, "a", "first"),
            Mark::new(3, 8, "b", "second"),
        ];
        let html = render("abcdefgh", marks);
        assert_eq!(html, "<span class=\"a\" title=\"first\">abcde</span>fgh");
    }

    #[test]
    fn test_render_ignores_out_of_range_marks() {
        let html = render("abc", vec![Mark::new(2, 10, "x", "y")]);
        assert_eq!(html, "abc");
    }

    #[test]
    fn test_highlight_spans() {
        let text = "We <must> utilize it.";
        let start = text.find("utilize").unwrap();
        let span = Span {
            start,
            end: start + "utilize".len(),
            matched_text: "utilize".to_string(),
            pattern: "utilize".to_string(),
            category: Category::Corporate,
            severity: Severity::High,
            confidence: Severity::High.weight(),
            paragraph: 0,
        };

        let html = highlight_spans(text, &[span]);
        assert_eq!(
            html,
            "We &lt;must&gt; <span class=\"ai-highlight ai-corporate\" \
             data-original=\"utilize\" data-category=\"corporate\" \
             title=\"AI pattern: utilize\">utilize</span> it."
        );
    }
}
