//! Near-duplicate scan benchmarks.
//!
//! The scan is quadratic in the number of clippings and in text length, so
//! sizes stay small.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use marginalia::dedup::{longest_common_run, SimilarityScanner};
use marginalia::ClippingId;

const WORDS: [&str; 12] = [
    "spice", "desert", "water", "memory", "garden", "letter", "silence", "winter", "harbor",
    "lantern", "marble", "thread",
];

/// Deterministic pseudo-prose of roughly `words` words.
fn generate_text(seed: usize, words: usize) -> String {
    (0..words)
        .map(|i| WORDS[(seed * 31 + i * 7 + i / 3) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_common_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("longest_common_run");

    for words in [20, 60, 150].iter() {
        let first = generate_text(1, *words);
        let second = format!("{} {}", generate_text(2, *words / 2), &first[first.len() / 2..]);

        group.bench_with_input(
            BenchmarkId::new("words", words),
            &(first, second),
            |b, (first, second)| b.iter(|| black_box(longest_common_run(first, second, 40))),
        );
    }

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.sample_size(10);

    for clippings in [25, 100].iter() {
        let texts: Vec<String> = (0..*clippings).map(|i| generate_text(i, 40)).collect();
        let items: Vec<(ClippingId, &str)> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| (ClippingId(i as u64), t.as_str()))
            .collect();

        group.bench_with_input(BenchmarkId::new("clippings", clippings), &items, |b, items| {
            let scanner = SimilarityScanner::default();
            b.iter(|| black_box(scanner.scan(items)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_common_run, bench_scan);
criterion_main!(benches);
