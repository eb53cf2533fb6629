use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use oracle_bench::{ComparisonEngine, PriceSample, ReferenceIndex, Series};

/// A 90-day feed at 15-minute spacing
fn synthetic(label: &str, phase: f64) -> Series {
    let samples = (0..90 * 96)
        .map(|i| {
            let t = Utc.timestamp_opt(1_700_000_000 + i as i64 * 900, 0).unwrap();
            let price = 1.0 + 0.01 * ((i as f64) / 50.0 + phase).sin();
            PriceSample::new(t, Some(i as u64), price)
        })
        .collect();
    Series::new(label, samples)
}

fn bench_compare(c: &mut Criterion) {
    let primary = synthetic("sd", 0.0);
    let reference = synthetic("curve", 0.3);
    let engine = ComparisonEngine::default();

    c.bench_function("reference_index", |b| {
        b.iter(|| ReferenceIndex::from_series(black_box(&reference)))
    });

    let index = ReferenceIndex::from_series(&reference);
    c.bench_function("compare_90d", |b| {
        b.iter(|| engine.compare(black_box(&primary), black_box(&index)))
    });
}

criterion_group!(benches, bench_compare);
criterion_main!(benches);
