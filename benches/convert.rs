//! Throughput of lookup-table conversion and sweep planning.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use permtune::lut::convert_source;
use permtune::sweep::{plan, SweepConfig};

/// Build a synthetic best_instances.txt with `n` lines, every tenth malformed.
fn synthetic_instances(n: usize) -> String {
    let mut out = String::with_capacity(n * 48);
    for i in 0..n {
        let ty = if i % 2 == 0 { "F32" } else { "F16" };
        if i % 10 == 9 {
            out.push_str(&format!("{}_{}_16_0_1.txt:2_256_bad\n", ty, 16 << (i % 8)));
        } else {
            out.push_str(&format!(
                "{}_{}_16_0_1.txt:2_256_64_64_4_4_0_1_{}_{}\n",
                ty,
                16 << (i % 8),
                1 << (i % 5),
                1 << (i % 5)
            ));
        }
    }
    out
}

fn bench_convert(c: &mut Criterion) {
    let small = synthetic_instances(100);
    let large = synthetic_instances(10_000);

    let mut group = c.benchmark_group("convert");
    group.bench_function("100_lines", |b| b.iter(|| convert_source(black_box(&small))));
    group.bench_function("10k_lines", |b| b.iter(|| convert_source(black_box(&large))));
    group.finish();
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_plan");
    for rank in [2usize, 3, 4] {
        let config = SweepConfig::preset(rank).unwrap();
        group.bench_function(format!("rank_{}", rank), |b| {
            b.iter(|| plan(black_box(&config)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_convert, bench_plan);
criterion_main!(benches);
