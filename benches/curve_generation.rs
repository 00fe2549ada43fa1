//! Curve and bank generation benchmarks
//!
//! Run with: cargo bench --bench curve_generation

use cellbench::cell::CellType;
use cellbench::curve::{charge_curve, discharge_curve};
use cellbench::experiment::Experiment;
use cellbench::export::{rows_for, to_csv};
use cellbench::summary::summarize;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Benchmark a single 100-sample curve in each direction
fn bench_curves(c: &mut Criterion) {
    let mut group = c.benchmark_group("curve");
    let mut rng = StdRng::seed_from_u64(42);

    group.bench_function("charge", |b| {
        b.iter(|| {
            charge_curve(
                black_box(3.0),
                black_box(3.4),
                black_box(3000.0),
                black_box(1.5),
                &mut rng,
            )
        });
    });

    group.bench_function("discharge", |b| {
        b.iter(|| {
            discharge_curve(
                black_box(4.0),
                black_box(3.2),
                black_box(3300.0),
                black_box(2.5),
                &mut rng,
            )
        });
    });

    group.finish();
}

/// Benchmark generating, summarizing and exporting banks of increasing size
fn bench_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("bank");

    for cells in [1usize, 8, 24] {
        group.bench_with_input(BenchmarkId::new("generate", cells), &cells, |b, &n| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| {
                Experiment::builder("bench")
                    .primary_cell_type(CellType::Nmc)
                    .with_cells(black_box(n), &mut rng)
                    .build()
            });
        });

        let mut rng = StdRng::seed_from_u64(7);
        let experiment = Experiment::builder("bench")
            .with_cells(cells, &mut rng)
            .build();

        group.bench_with_input(
            BenchmarkId::new("summarize", cells),
            &experiment,
            |b, exp| b.iter(|| summarize(black_box(exp.cells()))),
        );

        group.bench_with_input(
            BenchmarkId::new("export_csv", cells),
            &experiment,
            |b, exp| b.iter(|| to_csv(&rows_for(black_box(exp.cells())))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_curves, bench_bank);
criterion_main!(benches);
