//! Benchmarks for fragment scanning and decoration rebuilds.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use templight_buffer::TextBuffer;
use templight_core::{Config, Scanner, ViewController, ViewUpdate};

/// Generates a note with one fragment every few lines.
fn generate_note(lines: usize) -> String {
    (0..lines)
        .map(|i| match i % 8 {
            0 => "<%*\n".to_string(),
            1 => format!("const items = tp.file.find({}).filter((f) => f.size > 0);\n", i),
            2 => "%>\n".to_string(),
            5 => format!("Line {} was written on <% tp.date.now(\"YYYY-MM-DD\") %>.\n", i),
            _ => format!("Line {}: plain prose without any template code.\n", i),
        })
        .collect()
}

/// Benchmarks region detection alone.
fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    let scanner = Scanner::default();

    for size in [100, 1000, 10000].iter() {
        let document = TextBuffer::from(generate_note(*size));

        group.bench_with_input(BenchmarkId::new("lines", size), &document, |b, document| {
            b.iter(|| black_box(scanner.scan(black_box(document))))
        });
    }

    group.finish();
}

/// Benchmarks full rebuilds, with and without fragment memoization.
fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");

    for memoize in [false, true] {
        let mut config = Config::default();
        config.highlight.memoize_regions = memoize;
        let label = if memoize { "memoized" } else { "plain" };

        for size in [100, 1000].iter() {
            let document = TextBuffer::from(generate_note(*size));
            let mut view = ViewController::from_config(&config, &document)
                .expect("default config builds a controller");

            group.bench_with_input(BenchmarkId::new(label, size), &document, |b, document| {
                b.iter(|| black_box(view.update(document, ViewUpdate::doc_changed())))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_scan, bench_rebuild);
criterion_main!(benches);
