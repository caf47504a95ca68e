//! Criterion benchmarks for the decomposition hot paths.
//!
//! Benchmarks:
//! 1. Point decomposition over a full daily history
//! 2. Rolling decomposition (the O(window × n) loop) at several window sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use aplab_core::{
    decompose_pairs, rolling_decomposition, simulate_momentum_dca, MomentumParams, PricePoint,
    PriceSeries,
};

fn make_prices(n: usize) -> PriceSeries {
    let start = chrono::NaiveDate::from_ymd_opt(2015, 1, 2).unwrap();
    let points = (0..n)
        .map(|i| PricePoint {
            date: start + chrono::Duration::days(i as i64),
            close: 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.01,
        })
        .collect();
    PriceSeries::new("BENCH", points).unwrap()
}

fn bench_point_decomposition(c: &mut Criterion) {
    let prices = make_prices(2520);
    let traj = simulate_momentum_dca(&prices, &MomentumParams::default());
    let weights = traj.weights().unwrap();
    let returns = traj.daily_returns();

    c.bench_function("decompose_pairs_10y", |b| {
        b.iter(|| decompose_pairs(black_box(&weights), black_box(&returns)))
    });
}

fn bench_rolling_decomposition(c: &mut Criterion) {
    let prices = make_prices(2520);
    let traj = simulate_momentum_dca(&prices, &MomentumParams::default());

    let mut group = c.benchmark_group("rolling_decomposition");
    for window in [60, 252] {
        group.bench_with_input(BenchmarkId::from_parameter(window), &window, |b, &w| {
            b.iter(|| rolling_decomposition(black_box(&traj), w).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_point_decomposition,
    bench_rolling_decomposition
);
criterion_main!(benches);
