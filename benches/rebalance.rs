//! Engine benchmarks: weighting, capping, invest, and predict.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use cryptodex::{
    AssetMetadata, Holding, HoldingState, InvestOptions, NullReporter, Symbol, clamp_and_redistribute,
    compute_allocation, compute_drift, compute_sqrt_weights, invest, predict,
};

/// Generate a ledger of `n` Active holdings with deterministic pseudo-random
/// caps, prices, and amounts.
fn generate_ledger(n: usize) -> Vec<Holding> {
    // Simple deterministic PRNG (xorshift32)
    let mut rng_state: u32 = 42;
    let mut next = move || {
        rng_state ^= rng_state << 13;
        rng_state ^= rng_state >> 17;
        rng_state ^= rng_state << 5;
        rng_state
    };

    let mut hs: Vec<Holding> = (0..n)
        .map(|i| {
            let cap = 1e6 * (1 + next() % 100_000) as f64;
            let price = (1 + next() % 50_000) as f64 / 100.0;
            let amount = (next() % 10_000) as f64 / 10.0;
            Holding::new(Symbol::new(&format!("a{i:03}")), format!("Asset {i}"), cap, HoldingState::Active)
                .with_amount(amount)
                .with_metadata(AssetMetadata {
                    price,
                    fee: 0.26,
                    minimum_order: 0.001,
                    exchange_data: Default::default(),
                })
        })
        .collect();
    compute_sqrt_weights(&mut hs);
    compute_allocation(&mut hs);
    compute_drift(&mut hs);
    hs
}

fn bench_invest(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/invest");

    for n in [10, 50, 250] {
        let ledger = generate_ledger(n);
        group.bench_with_input(BenchmarkId::new("rebalance", n), &ledger, |b, hs| {
            b.iter(|| {
                black_box(invest(
                    black_box(hs),
                    "eur",
                    1_000.0,
                    InvestOptions::default(),
                    &mut NullReporter,
                ))
            });
        });
    }

    group.finish();
}

fn bench_clamp(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/clamp");

    for n in [10, 50, 250] {
        let ledger = generate_ledger(n);
        let weights: Vec<(usize, f64)> = ledger.iter().map(|h| h.target).enumerate().collect();
        // Tight enough to clamp several values, loose enough to converge.
        let cap = 150.0 / n as f64;
        group.bench_with_input(BenchmarkId::from_parameter(n), &weights, |b, w| {
            b.iter(|| black_box(clamp_and_redistribute(black_box(w), cap, 0.0)));
        });
    }

    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let ledger = generate_ledger(50);
    let orders = invest(&ledger, "eur", 1_000.0, InvestOptions::default(), &mut NullReporter);

    c.bench_function("engine/predict/50", |b| {
        b.iter(|| black_box(predict(black_box(&ledger), black_box(&orders))));
    });
}

criterion_group!(benches, bench_invest, bench_clamp, bench_predict);
criterion_main!(benches);
