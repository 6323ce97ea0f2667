//! Batch processing: detect, rewrite and compare many documents in parallel.

use crate::engine::Engine;
use crate::models::{BatchResult, BatchSummary, Document, DocumentReport};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No input documents")]
    NoInputs,
}

/// File extensions picked up when an input is a directory
const TEXT_EXTENSIONS: [&str; 3] = ["txt", "md", "text"];

/// Expand inputs into a sorted list of files.
///
/// Files are taken as given; directories contribute their text files
/// (not recursive).
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, PipelineError> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let entries = std::fs::read_dir(input).map_err(|source| PipelineError::Io {
                path: input.clone(),
                source,
            })?;
            let mut found: Vec<PathBuf> = entries
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && has_text_extension(p))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }

    if files.is_empty() {
        return Err(PipelineError::NoInputs);
    }
    Ok(files)
}

fn has_text_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| TEXT_EXTENSIONS.iter().any(|t| t.eq_ignore_ascii_case(e)))
}

/// Read every path into a named document.
pub fn read_documents(paths: &[PathBuf]) -> Result<Vec<Document>, PipelineError> {
    paths
        .iter()
        .map(|path| {
            let text = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
                path: path.clone(),
                source,
            })?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(Document { name, text })
        })
        .collect()
}

/// Run one document through detect, rewrite and compare.
pub fn process_document(engine: &Engine, document: &Document) -> DocumentReport {
    let (detection, rewrite, report) = engine.process(&document.text);
    debug!(
        name = %document.name,
        matches = detection.match_count,
        replacements = rewrite.replacement_count,
        "document processed"
    );

    DocumentReport {
        name: document.name.clone(),
        confidence_score: detection.confidence_score,
        match_count: detection.match_count,
        word_count: detection.word_count,
        replacement_count: rewrite.replacement_count,
        normalization: rewrite.normalization,
        rewritten_text: rewrite.rewritten_text,
        stats: report.stats,
    }
}

/// Process documents in parallel. Reports come back in input order.
pub fn process_documents(engine: &Engine, documents: &[Document], show_progress: bool) -> BatchResult {
    if show_progress {
        info!("Processing {} documents", documents.len());
    }

    let progress = if show_progress {
        let pb = ProgressBar::new(documents.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    } else {
        None
    };

    let reports: Vec<DocumentReport> = documents
        .par_iter()
        .map(|document| {
            let report = process_document(engine, document);
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
            report
        })
        .collect();

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let summary = summarize(&reports);
    info!(
        documents = summary.document_count,
        matches = summary.total_matches,
        replacements = summary.total_replacements,
        "batch complete"
    );

    BatchResult {
        version: env!("CARGO_PKG_VERSION").to_string(),
        parameters: engine.params().clone(),
        summary,
        documents: reports,
    }
}

/// Totals and per-document averages.
pub fn summarize(reports: &[DocumentReport]) -> BatchSummary {
    let document_count = reports.len();
    if document_count == 0 {
        return BatchSummary::default();
    }

    let n = document_count as f64;
    BatchSummary {
        document_count,
        total_words: reports.iter().map(|r| r.word_count).sum(),
        total_matches: reports.iter().map(|r| r.match_count).sum(),
        total_replacements: reports.iter().map(|r| r.replacement_count).sum(),
        avg_confidence: reports.iter().map(|r| r.confidence_score).sum::<f64>() / n,
        avg_change_percentage: reports
            .iter()
            .map(|r| r.stats.change_percentage as f64)
            .sum::<f64>()
            / n,
    }
}
