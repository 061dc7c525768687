//! Benchmarks for the estimation core: full-sample fit and the complete
//! prediction pipeline (fit + metrics + cross-validation + forecast).

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trendcast::{Predictor, Sample, SampleSet, TrendModel};

fn synthetic_set(n: usize) -> SampleSet {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let samples: Vec<Sample> = (0..n)
        .map(|i| {
            // Rising trend with a deterministic wobble
            let value = i as f64 * 0.5 + (i as f64 * 0.7).sin() * 3.0;
            Sample::new(start + Duration::hours(i as i64), value).unwrap()
        })
        .collect();
    SampleSet::new(samples).unwrap()
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");
    for n in [100, 1_000, 10_000] {
        let set = synthetic_set(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &set, |b, set| {
            b.iter(|| TrendModel::fit(black_box(set)).unwrap());
        });
    }
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");
    let predictor = Predictor::builder().threshold(10_000.0).build();
    for n in [100, 1_000, 10_000] {
        let set = synthetic_set(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &set, |b, set| {
            b.iter(|| predictor.predict(black_box(set)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fit, bench_predict);
criterion_main!(benches);
