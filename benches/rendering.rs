use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tblview::layout;
use tblview::model::{Table, Values};
use tblview::render;
use tblview::view::ViewState;

/// Create a table of alternating int, float and string columns.
fn create_test_table(num_rows: usize, num_cols: usize) -> Table {
    let mut table = Table::new();
    for col in 0..num_cols {
        let values = match col % 3 {
            0 => Values::Int((0..num_rows as i64).map(|r| r * 31 + col as i64).collect()),
            1 => Values::Float((0..num_rows).map(|r| r as f64 / 7.0).collect()),
            _ => Values::strings((0..num_rows).map(|r| format!("val_{}_{}", r, col))),
        };
        table
            .add_column(values, format!("col_{}", col), None)
            .unwrap();
    }
    table
}

/// Benchmark layout computation as column count grows.
fn bench_compute_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_layout");

    for num_cols in [10, 50, 200] {
        let table = create_test_table(100, num_cols);
        let view = ViewState::new(&table);
        group.bench_with_input(BenchmarkId::new("cols", num_cols), &view, |b, view| {
            b.iter(|| black_box(layout::compute_layout(black_box(view), 100)));
        });
    }

    group.finish();
}

/// Benchmark the full projection of one screen. Cost should depend on the
/// viewport, not the table size.
fn bench_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");

    for num_rows in [1_000, 10_000, 100_000] {
        let table = create_test_table(num_rows, 10);
        let mut view = ViewState::new(&table).with_size(200, 50);
        view.move_cursor_to(Some(5), Some(num_rows / 2));

        group.bench_with_input(BenchmarkId::new("rows", num_rows), &view, |b, view| {
            b.iter(|| black_box(render::project(black_box(view), &table)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_layout, bench_project);
criterion_main!(benches);
