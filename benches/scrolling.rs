use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tblview::model::{Table, Values};
use tblview::view::ViewState;

/// Create a wide table so horizontal scrolling has room to move.
fn create_test_table(num_rows: usize, num_cols: usize) -> Table {
    let mut table = Table::new();
    for col in 0..num_cols {
        let values = (0..num_rows as i64).map(|r| r * 1_000 + col as i64).collect();
        table
            .add_column(Values::Int(values), format!("col_{}", col), None)
            .unwrap();
    }
    table
}

/// Benchmark cursor movement, which keeps the cursor cell in view.
fn bench_cursor_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor_moves");

    for num_cols in [10, 100] {
        let table = create_test_table(10_000, num_cols);
        let view = ViewState::new(&table).with_size(120, 40);

        group.bench_with_input(BenchmarkId::new("right_down", num_cols), &view, |b, view| {
            b.iter(|| {
                let mut view = view.clone();
                for _ in 0..50 {
                    view.move_cursor_column(1);
                    view.move_cursor_row(1);
                }
                black_box(view.cursor())
            });
        });

        group.bench_with_input(BenchmarkId::new("page_down", num_cols), &view, |b, view| {
            b.iter(|| {
                let mut view = view.clone();
                for _ in 0..50 {
                    view.move_cursor_page(1);
                }
                black_box(view.cursor())
            });
        });
    }

    group.finish();
}

/// Benchmark scrolling, which clamps and pulls the cursor into the window.
fn bench_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll");

    for num_cols in [10, 100] {
        let table = create_test_table(10_000, num_cols);
        let view = ViewState::new(&table).with_size(120, 40);

        group.bench_with_input(BenchmarkId::new("scroll_by", num_cols), &view, |b, view| {
            b.iter(|| {
                let mut view = view.clone();
                for _ in 0..50 {
                    view.scroll_by(black_box(3), black_box(5));
                }
                black_box(view.scroll())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cursor_moves, bench_scroll);
criterion_main!(benches);
