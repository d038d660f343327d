use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tblview::fixfmt::{choose_formatter, NumberFormatter, Scale};
use tblview::model::Values;

/// Floats with a spread of magnitudes and fractional digits.
fn create_floats(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (i as f64 * 37.123_456).sin() * 10f64.powi((i % 7) as i32))
        .collect()
}

/// Benchmark formatting single values with exact decimal rounding.
fn bench_number_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("number_format");
    let values = create_floats(1_000);

    for precision in [0, 3, 8] {
        let fmt = NumberFormatter::new(8, Some(precision)).unwrap();
        group.bench_with_input(BenchmarkId::new("precision", precision), &fmt, |b, fmt| {
            b.iter(|| {
                for v in &values {
                    black_box(fmt.format(black_box(*v)));
                }
            });
        });
    }

    let percent = NumberFormatter::new(6, Some(2))
        .unwrap()
        .with_scale(Scale::percent());
    group.bench_function("percent", |b| {
        b.iter(|| {
            for v in &values {
                black_box(percent.format(black_box(*v)));
            }
        });
    });

    let ints = NumberFormatter::new(12, None).unwrap();
    group.bench_function("int", |b| {
        b.iter(|| {
            for i in 0..1_000i64 {
                black_box(ints.format_int(black_box(i * 7919)));
            }
        });
    });

    group.finish();
}

/// Benchmark automatic formatter selection (scans every value).
fn bench_choose_formatter(c: &mut Criterion) {
    let mut group = c.benchmark_group("choose_formatter");

    for num_rows in [1_000, 10_000, 100_000] {
        let floats = Values::Float(create_floats(num_rows));
        group.bench_with_input(BenchmarkId::new("float", num_rows), &floats, |b, values| {
            b.iter(|| black_box(choose_formatter(black_box(values))));
        });

        let strings = Values::strings((0..num_rows).map(|i| format!("value_{}", i % 500)));
        group.bench_with_input(BenchmarkId::new("str", num_rows), &strings, |b, values| {
            b.iter(|| black_box(choose_formatter(black_box(values))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_number_format, bench_choose_formatter);
criterion_main!(benches);
