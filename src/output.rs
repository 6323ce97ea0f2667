//! Output formatting for results (JSON, CSV, console summaries, HTML viewer).

use crate::markup::escape_html;
use crate::models::{
    BatchResult, ChangeKind, ComparisonChange, ComparisonReport, DetectionResult, DiffHunk,
    DocumentReport, HunkKind, LexiconStats, RewriteResult, Suggestion,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write any result as pretty JSON.
pub fn write_json<T: Serialize + ?Sized, W: Write>(value: &T, writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(value)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Write any result as pretty JSON to a file.
pub fn write_json_file<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_json(value, &mut file)
}

// ============================================================================
// CSV
// ============================================================================

/// Quote a CSV field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn change_kind_str(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::WordReplacement => "word_replacement",
        ChangeKind::PhraseReplacement => "phrase_replacement",
    }
}

/// Write per-document batch rows as CSV.
pub fn write_documents_csv<W: Write>(documents: &[DocumentReport], writer: &mut W) -> Result<(), OutputError> {
    writeln!(
        writer,
        "name,word_count,match_count,confidence_score,replacement_count,\
         fillers_removed,contractions,sentences_split,\
         changed_words,changed_phrases,change_percentage,improvement_score,readability_improvement"
    )?;

    for doc in documents {
        writeln!(
            writer,
            "{},{},{},{:.4},{},{},{},{},{},{},{},{},{:.1}",
            csv_field(&doc.name),
            doc.word_count,
            doc.match_count,
            doc.confidence_score,
            doc.replacement_count,
            doc.normalization.fillers_removed,
            doc.normalization.contractions,
            doc.normalization.sentences_split,
            doc.stats.changed_words,
            doc.stats.changed_phrases,
            doc.stats.change_percentage,
            doc.stats.improvement_score,
            doc.stats.readability_improvement
        )?;
    }

    Ok(())
}

pub fn write_documents_csv_file(documents: &[DocumentReport], path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_documents_csv(documents, &mut file)
}

/// Write the changes of a comparison as CSV.
pub fn write_changes_csv<W: Write>(changes: &[ComparisonChange], writer: &mut W) -> Result<(), OutputError> {
    writeln!(writer, "kind,position,original,rewritten,category")?;

    for change in changes {
        writeln!(
            writer,
            "{},{},{},{},{}",
            change_kind_str(change.kind),
            change.position,
            csv_field(&change.original),
            csv_field(&change.rewritten),
            change.category.map(|c| c.as_str()).unwrap_or("")
        )?;
    }

    Ok(())
}

pub fn write_changes_csv_file(changes: &[ComparisonChange], path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_changes_csv(changes, &mut file)
}

// ============================================================================
// Console output
// ============================================================================

/// Truncate text to a maximum length in chars, adding ellipsis if needed.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Format a comparison change as a single line.
pub fn format_change(change: &ComparisonChange) -> String {
    let category = change
        .category
        .map(|c| format!(" [{}]", c))
        .unwrap_or_default();
    let location = match change.kind {
        ChangeKind::WordReplacement => format!("word {}", change.position),
        ChangeKind::PhraseReplacement => format!("char {}", change.position),
    };
    format!(
        "{}: \"{}\" -> \"{}\"{}",
        location,
        truncate_text(&change.original, 60),
        truncate_text(&change.rewritten, 60),
        category
    )
}

/// Format an aligned-diff hunk as a single line.
pub fn format_hunk(hunk: &DiffHunk) -> String {
    match hunk.kind {
        HunkKind::Replace => format!(
            "~ {}:{} \"{}\" -> \"{}\"",
            hunk.original_index,
            hunk.rewritten_index,
            truncate_text(&hunk.original, 60),
            truncate_text(&hunk.rewritten, 60)
        ),
        HunkKind::Delete => format!(
            "- {}:{} \"{}\"",
            hunk.original_index,
            hunk.rewritten_index,
            truncate_text(&hunk.original, 60)
        ),
        HunkKind::Insert => format!(
            "+ {}:{} \"{}\"",
            hunk.original_index,
            hunk.rewritten_index,
            truncate_text(&hunk.rewritten, 60)
        ),
    }
}

pub fn print_detection_summary(result: &DetectionResult, suggestions: &[Suggestion]) {
    println!("\n=== Detection Summary ===");
    println!("Words: {}", result.word_count);
    println!("Paragraphs: {}", result.paragraph_count);
    println!("Matches: {} ({} distinct)", result.match_count, result.unique_word_count);
    println!("Density: {:.1}%", result.density * 100.0);
    println!("AI confidence: {:.1}%", result.confidence_score * 100.0);

    let style = &result.style;
    println!();
    println!("Style:");
    println!(
        "  Sentences: {} (avg {:.1} words, variance {:.1})",
        style.sentence_count, style.average_sentence_length, style.sentence_length_variance
    );
    println!("  Passive: {} ({:.0}% of sentences)", style.passive_count, style.passive_ratio * 100.0);
    println!("  Complex words: {:.1}%", style.complex_word_ratio * 100.0);
    if !style.latin_phrases.is_empty() {
        println!("  Latin phrases: {}", style.latin_phrases.join(", "));
    }
    println!("  Stock openers: {}", style.sentence_starters);
    println!("  Repeated quantifiers: {}", style.repetitive_uses);
    println!(
        "  Structure score: {:.2}, complexity score: {:.2}",
        style.structure_score, style.complexity_score
    );

    if !result.summary.category_breakdown.is_empty() {
        println!();
        println!("By category:");
        for (category, count) in &result.summary.category_breakdown {
            println!("  {}: {}", category, count);
        }
        if let Some(category) = result.summary.most_common_category {
            println!("  Most common: {}", category);
        }
    }

    if !result.spans.is_empty() {
        println!();
        println!("Matches:");
        for span in &result.spans {
            println!(
                "  [{}..{}] \"{}\" ({}, {}, {:.2})",
                span.start, span.end, span.matched_text, span.category, span.severity, span.confidence
            );
        }
    }

    if !suggestions.is_empty() {
        println!();
        println!("Suggestions:");
        for suggestion in suggestions {
            println!("  - {}", suggestion.message);
        }
    }
}

pub fn print_rewrite_summary(result: &RewriteResult) {
    println!("\n=== Rewrite Summary ===");
    println!("Replacements: {}", result.replacement_count);
    println!("Fillers removed: {}", result.normalization.fillers_removed);
    println!("Contractions: {}", result.normalization.contractions);
    println!("Sentences split: {}", result.normalization.sentences_split);

    if !result.changes.is_empty() {
        println!();
        println!("Changes:");
        for change in &result.changes {
            println!(
                "  \"{}\" -> \"{}\"",
                change.original_span.matched_text, change.replacement_text
            );
        }
    }

    println!();
    println!("{}", result.rewritten_text);
}

pub fn print_comparison_summary(report: &ComparisonReport, limit: Option<usize>) {
    let stats = &report.stats;
    println!("\n=== Comparison Summary ===");
    println!("Words: {} -> {}", stats.total_words, stats.rewritten_words);
    println!("Sentences: {} -> {}", stats.original_sentences, stats.rewritten_sentences);
    println!("Added words: {}", stats.added_words);
    println!("Removed words: {}", stats.removed_words);
    println!("Changed words: {} ({}%)", stats.changed_words, stats.change_percentage);
    println!("Changed phrases: {}", stats.changed_phrases);
    println!("Improvement score: {}%", stats.improvement_score);
    println!("Readability improvement: {:.1}", stats.readability_improvement);

    let to_print = match limit {
        Some(n) => &report.changes[..n.min(report.changes.len())],
        None => &report.changes[..],
    };
    if !to_print.is_empty() {
        println!();
        println!("Changes:");
        for change in to_print {
            println!("  {}", format_change(change));
        }
        if report.changes.len() > to_print.len() {
            println!("  ... and {} more changes", report.changes.len() - to_print.len());
        }
    }

    match &report.aligned_hunks {
        Some(hunks) if !hunks.is_empty() => {
            println!();
            println!("Aligned diff ({} hunks):", hunks.len());
            for hunk in hunks {
                println!("  {}", format_hunk(hunk));
            }
        }
        Some(_) => {}
        None => {
            println!();
            println!("Aligned diff: skipped");
        }
    }
}

pub fn print_batch_summary(result: &BatchResult) {
    let summary = &result.summary;
    println!("\n=== Batch Summary ===");
    println!("Version: {}", result.version);
    println!();
    println!("Parameters:");
    println!("  Categories: {}", if result.parameters.strategy.categories.is_empty() {
        "all".to_string()
    } else {
        result
            .parameters
            .strategy
            .categories
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    });
    println!("  Min severity: {}", result.parameters.strategy.min_severity);
    println!("  Selection: {:?}", result.parameters.rewrite.selection);
    println!();
    println!("Results:");
    println!("  Documents: {}", summary.document_count);
    println!("  Total words: {}", summary.total_words);
    println!("  Total matches: {}", summary.total_matches);
    println!("  Total replacements: {}", summary.total_replacements);
    println!("  Average confidence: {:.1}%", summary.avg_confidence * 100.0);
    println!("  Average change: {:.1}%", summary.avg_change_percentage);
}

pub fn print_lexicon_stats(stats: &LexiconStats) {
    println!("\n=== Lexicon ===");
    println!("Entries: {}", stats.total_entries);
    println!("  Phrases: {}", stats.phrase_entries);
    println!("  Words: {}", stats.word_entries);
    println!("Alternatives: {}", stats.total_alternatives);
    println!();
    println!("By category:");
    for (category, count) in &stats.by_category {
        println!("  {}: {}", category, count);
    }
    println!("By severity:");
    for (severity, count) in &stats.by_severity {
        println!("  {}: {}", severity, count);
    }
}

// ============================================================================
// HTML Viewer generation
// ============================================================================

/// Generate a self-contained side-by-side HTML viewer for one comparison.
///
/// The highlighted panels are already escaped by the comparator; everything
/// else is escaped here.
pub fn generate_viewer_html(report: &ComparisonReport, title: &str) -> String {
    let data_json = serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string());

    // A literal </script> in the texts would end the data block early
    let escaped_json = data_json.replace("</", "<\\/");

    let stats = &report.stats;
    let stats_html = format!(
        "<dl class=\"stats\">\
         <dt>Words</dt><dd>{} &rarr; {}</dd>\
         <dt>Changed words</dt><dd>{} ({}%)</dd>\
         <dt>Changed phrases</dt><dd>{}</dd>\
         <dt>Improvement</dt><dd>{}%</dd>\
         <dt>Readability</dt><dd>{:.1}</dd>\
         </dl>",
        stats.total_words,
        stats.rewritten_words,
        stats.changed_words,
        stats.change_percentage,
        stats.changed_phrases,
        stats.improvement_score,
        stats.readability_improvement,
    );

    let hunk_rows: String = report
        .aligned_hunks
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|h| {
            format!(
                "<tr class=\"hunk-{kind}\"><td>{kind}</td><td>{oi}</td><td>{o}</td><td>{ri}</td><td>{r}</td></tr>\n",
                kind = match h.kind {
                    HunkKind::Replace => "replace",
                    HunkKind::Insert => "insert",
                    HunkKind::Delete => "delete",
                },
                oi = h.original_index,
                o = escape_html(&h.original),
                ri = h.rewritten_index,
                r = escape_html(&h.rewritten),
            )
        })
        .collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Plainspoken - {title}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 0; background: #f9fafb; color: #111827; }}
        header {{ background: #fff; border-bottom: 1px solid #e5e7eb; padding: 12px 16px; }}
        h1 {{ font-size: 1.25rem; margin: 0; }}
        .stats {{ display: flex; flex-wrap: wrap; gap: 4px 16px; margin: 8px 0 0; font-size: 0.875rem; }}
        .stats dt {{ color: #6b7280; }}
        .stats dd {{ margin: 0 12px 0 0; font-weight: 600; }}
        main {{ display: grid; grid-template-columns: 1fr 1fr; gap: 16px; padding: 16px; }}
        section {{ background: #fff; border: 1px solid #e5e7eb; border-radius: 6px; padding: 12px; }}
        .text {{ white-space: pre-wrap; line-height: 1.7; }}
        .original-highlight, .original-phrase-highlight {{ background: #fee2e2; border-radius: 3px; }}
        .rewritten-highlight, .rewritten-phrase-highlight {{ background: #dcfce7; border-radius: 3px; }}
        .original-phrase-highlight, .rewritten-phrase-highlight {{ text-decoration: underline dotted; }}
        table {{ border-collapse: collapse; width: 100%; font-size: 0.875rem; }}
        td, th {{ border-bottom: 1px solid #e5e7eb; padding: 4px 8px; text-align: left; }}
        .hunk-delete td {{ color: #b91c1c; }}
        .hunk-insert td {{ color: #15803d; }}
        #hunks {{ margin: 0 16px 16px; }}
    </style>
</head>
<body>
    <header>
        <h1>{title}</h1>
        {stats}
    </header>
    <main>
        <section>
            <h2>Original</h2>
            <div class="text">{original}</div>
        </section>
        <section>
            <h2>Rewritten</h2>
            <div class="text">{rewritten}</div>
        </section>
    </main>
    <section id="hunks">
        <h2>Aligned diff</h2>
        <table>
            <thead><tr><th>Kind</th><th>Original at</th><th>Original</th><th>Rewritten at</th><th>Rewritten</th></tr></thead>
            <tbody>
{hunks}            </tbody>
        </table>
    </section>

    <script type="application/json" id="comparison-data">{data_json}</script>
</body>
</html>"##,
        title = escape_html(title),
        stats = stats_html,
        original = report.highlighted_original,
        rewritten = report.highlighted_rewritten,
        hunks = hunk_rows,
        data_json = escaped_json,
    )
}

/// Write viewer HTML to a file.
pub fn write_viewer_html_file(report: &ComparisonReport, title: &str, path: &Path) -> Result<(), OutputError> {
    let html = generate_viewer_html(report, title);
    std::fs::write(path, html)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ComparisonStats, NormalizationStats};

    fn create_test_report() -> ComparisonReport {
        ComparisonReport {
            original: "We utilize <tools>.".to_string(),
            rewritten: "We use <tools>.".to_string(),
            changes: vec![ComparisonChange {
                kind: ChangeKind::WordReplacement,
                original: "utilize".to_string(),
                rewritten: "use".to_string(),
                position: 1,
                category: Some(Category::Corporate),
            }],
            stats: ComparisonStats {
                total_words: 3,
                rewritten_words: 3,
                changed_words: 1,
                change_percentage: 33,
                total_changes: 1,
                improvement_score: 100,
                ..Default::default()
            },
            highlighted_original: "We <span class=\"original-highlight\">utilize</span> &lt;tools&gt;."
                .to_string(),
            highlighted_rewritten: "We <span class=\"rewritten-highlight\">use</span> &lt;tools&gt;."
                .to_string(),
            aligned_hunks: Some(vec![DiffHunk {
                kind: HunkKind::Replace,
                original_index: 1,
                rewritten_index: 1,
                original: "utilize".to_string(),
                rewritten: "use".to_string(),
            }]),
        }
    }

    fn create_test_document(name: &str) -> DocumentReport {
        DocumentReport {
            name: name.to_string(),
            confidence_score: 0.5,
            match_count: 2,
            word_count: 10,
            replacement_count: 2,
            normalization: NormalizationStats {
                fillers_removed: 1,
                contractions: 0,
                sentences_split: 0,
            },
            rewritten_text: "text".to_string(),
            stats: ComparisonStats::default(),
        }
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghij", 8), "abcde...");
        assert_eq!(truncate_text("ééééé", 4), "é...");
    }

    #[test]
    fn test_format_change() {
        let report = create_test_report();
        let formatted = format_change(&report.changes[0]);
        assert_eq!(formatted, "word 1: \"utilize\" -> \"use\" [corporate]");
    }

    #[test]
    fn test_format_hunk() {
        let report = create_test_report();
        let hunks = report.aligned_hunks.unwrap();
        assert_eq!(format_hunk(&hunks[0]), "~ 1:1 \"utilize\" -> \"use\"");
    }

    #[test]
    fn test_write_json() {
        let report = create_test_report();
        let mut output = Vec::new();
        write_json(&report, &mut output).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["stats"]["changed_words"], 1);
        assert_eq!(value["changes"][0]["kind"], "word_replacement");
        assert_eq!(value["aligned_hunks"][0]["kind"], "replace");
    }

    #[test]
    fn test_write_changes_csv() {
        let report = create_test_report();
        let mut output = Vec::new();
        write_changes_csv(&report.changes, &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        assert!(csv.starts_with("kind,position,original,rewritten,category"));
        assert!(csv.contains("word_replacement,1,utilize,use,corporate"));
    }

    #[test]
    fn test_write_documents_csv_quotes_names() {
        let documents = vec![create_test_document("a, \"b\".txt")];
        let mut output = Vec::new();
        write_documents_csv(&documents, &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("\"a, \"\"b\"\".txt\",10,2,0.5000,2,1,0,0"));
    }

    #[test]
    fn test_write_documents_csv_empty() {
        let mut output = Vec::new();
        write_documents_csv(&[], &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        assert!(csv.starts_with("name,word_count"));
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_viewer_html() {
        let report = create_test_report();
        let html = generate_viewer_html(&report, "Draft <1>");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Plainspoken - Draft &lt;1&gt;</title>"));
        assert!(html.contains(&report.highlighted_original));
        assert!(html.contains(&report.highlighted_rewritten));
        assert!(html.contains("<tr class=\"hunk-replace\">"));
        assert!(html.contains("id=\"comparison-data\""));
    }

    #[test]
    fn test_viewer_html_escapes_script_close() {
        let mut report = create_test_report();
        report.original = "bad </script> text".to_string();
        let html = generate_viewer_html(&report, "x");
        assert_eq!(html.matches("</script>").count(), 1);
    }
}
