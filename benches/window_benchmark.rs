//! Window benchmarks: visible-range lookup, prepend and full height sync.
//!
//! Lookups should stay O(log n) as the store grows.
//!
//! Run with: cargo bench --bench window_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use logwindow::model::{LogStore, Row};
use logwindow::source::SyntheticFetcher;
use logwindow::view_state::height_estimator::{CalibrationSample, HeightCache};
use logwindow::view_state::{ViewportDimensions, WindowIndex};
use std::time::Duration;

/// Cache for an 80-column container, one unit per line.
fn cache() -> HeightCache {
    let samples = (1..=20)
        .map(|k| CalibrationSample {
            char_length: k * 80,
            height: k,
        })
        .collect();
    match HeightCache::from_samples(samples, 1.0, 80) {
        Ok(cache) => cache,
        Err(err) => panic!("calibration samples rejected: {err}"),
    }
}

fn generate_rows(count: usize) -> Vec<Row> {
    SyntheticFetcher::seeded(Duration::ZERO, 7).generate(count)
}

fn synced_window(rows: &[Row], cache: &HeightCache) -> WindowIndex {
    let mut window = WindowIndex::new(ViewportDimensions::new(80, 50), 5);
    window.sync(rows.len(), |index| cache.estimate(&rows[index]));
    window
}

/// Visible-range lookup at several positions, across store sizes.
fn benchmark_visible_range_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible_range_scaling");
    let cache = cache();

    for num_rows in [1_000, 10_000, 100_000] {
        let rows = generate_rows(num_rows);
        let window = synced_window(&rows, &cache);
        let total_height = window.total_height();

        group.bench_with_input(BenchmarkId::new("lookup", num_rows), &window, |b, window| {
            b.iter(|| {
                for offset in [
                    0,
                    total_height / 4,
                    total_height / 2,
                    total_height * 3 / 4,
                    total_height.saturating_sub(1),
                ] {
                    black_box(window.visible_range(black_box(offset)));
                }
            });
        });
    }

    group.finish();
}

/// Prepend a page of older rows and re-memoize heights, as a completed
/// older fetch does.
fn benchmark_prepend(c: &mut Criterion) {
    let cache = cache();
    let base = generate_rows(10_000);
    let page = generate_rows(300);

    c.bench_function("prepend_300_into_10k", |b| {
        b.iter_batched(
            || (LogStore::from_rows(base.clone()), synced_window(&base, &cache)),
            |(mut store, mut window)| {
                store.insert_at_head(page.clone());
                window.invalidate_from(0);
                window.sync(store.len(), |index| {
                    store.get(index).map(|row| cache.estimate(row)).unwrap_or(1)
                });
                black_box(window.scroll_to_index(300, logwindow::view_state::Align::Start).ok());
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(std::time::Duration::from_secs(5));
    targets = benchmark_visible_range_scaling, benchmark_prepend
}
criterion_main!(benches);
