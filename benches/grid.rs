use chrono::{Duration, NaiveDate};
use commitgrid::heat::{render_html, render_terminal, GridAggregate};
use commitgrid::model::CommitRecord;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_records(count: usize) -> Vec<CommitRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let sources = ["alpha", "beta", "gamma"];
    (0..count)
        .map(|i| {
            CommitRecord::new(
                start + Duration::days((i % 90) as i64),
                ((i * 7) % 24) as u8,
                sources[i % sources.len()],
            )
        })
        .collect()
}

fn bench_grid(c: &mut Criterion) {
    let records = synthetic_records(20_000);
    let grid = GridAggregate::from_records(&records);

    c.bench_function("aggregate_20k", |b| {
        b.iter(|| GridAggregate::from_records(black_box(&records)))
    });
    c.bench_function("render_terminal_color", |b| {
        b.iter(|| render_terminal(black_box(&grid), true))
    });
    c.bench_function("render_html", |b| b.iter(|| render_html(black_box(&grid))));
}

criterion_group!(benches, bench_grid);
criterion_main!(benches);
