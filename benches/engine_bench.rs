//! Criterion benchmarks for detection, rewriting and comparison.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use plainspoken::align::align_words;
use plainspoken::models::CompareOptions;
use plainspoken::Engine;

const SAMPLE: &str = "Furthermore, it is important to note that we must utilize a \
    comprehensive approach. In order to leverage cutting-edge tools, the team will delve into \
    the data. The results were plain and the plan was simple.";

/// Text of `words` words built by cycling the sample, with a paragraph break
/// every 120 words.
fn make_text(words: usize) -> String {
    let sample: Vec<&str> = SAMPLE.split_whitespace().collect();
    let mut text = String::new();
    for (i, word) in sample.iter().cycle().take(words).enumerate() {
        if i > 0 {
            text.push_str(if i % 120 == 0 { "\n\n" } else { " " });
        }
        text.push_str(word);
    }
    text
}

fn bench_detect(c: &mut Criterion) {
    let engine = Engine::builtin();
    let mut group = c.benchmark_group("detect");

    for words in [100, 1000, 5000] {
        let text = make_text(words);
        group.bench_with_input(BenchmarkId::from_parameter(words), &text, |b, text| {
            b.iter(|| engine.detect(black_box(text)))
        });
    }

    group.finish();
}

fn bench_rewrite(c: &mut Criterion) {
    let engine = Engine::builtin();
    let mut group = c.benchmark_group("rewrite");

    for words in [100, 1000, 5000] {
        let text = make_text(words);
        let detection = engine.detect(&text);

        group.bench_with_input(BenchmarkId::new("with_prior", words), &text, |b, text| {
            b.iter(|| engine.rewrite(black_box(text), Some(&detection)))
        });
        group.bench_with_input(BenchmarkId::new("detect_again", words), &text, |b, text| {
            b.iter(|| engine.rewrite(black_box(text), None))
        });
    }

    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let engine = Engine::builtin();
    let mut group = c.benchmark_group("compare");

    for words in [100, 1000] {
        let text = make_text(words);
        let rewritten = engine.rewrite(&text, None).rewritten_text;

        group.bench_with_input(BenchmarkId::from_parameter(words), &words, |b, _| {
            b.iter(|| engine.compare(black_box(&text), black_box(&rewritten)))
        });
    }

    group.finish();
}

fn bench_alignment(c: &mut Criterion) {
    let options = CompareOptions::default();
    let mut group = c.benchmark_group("align_words");

    for size in [100u32, 500, 1000] {
        let seq: Vec<u32> = (0..size).collect();
        // 70% match
        let seq_partial: Vec<u32> = (0..size)
            .map(|i| if i % 10 < 7 { i } else { i + 10000 })
            .collect();

        group.bench_with_input(BenchmarkId::new("identical", size), &size, |b, _| {
            b.iter(|| align_words(black_box(&seq), black_box(&seq), &options))
        });
        group.bench_with_input(BenchmarkId::new("70pct_match", size), &size, |b, _| {
            b.iter(|| align_words(black_box(&seq), black_box(&seq_partial), &options))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detect, bench_rewrite, bench_compare, bench_alignment);
criterion_main!(benches);
