#![allow(missing_docs)]

use std::collections::BTreeSet;

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ponpon_core::{DateKey, HabitRecord, compute_streak, load, project_month};

fn build_completions(days: i64, every: i64) -> (BTreeSet<DateKey>, DateKey) {
    let today = DateKey::from_calendar(2024, 12, 31).unwrap_or_else(|err| panic!("valid date: {err}"));
    let keys = (0..days)
        .filter(|offset| offset % every == 0)
        .filter_map(|offset| today.offset(-offset).ok())
        .collect();
    (keys, today)
}

fn streak_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_streak");
    for &days in &[30_i64, 365, 3_650] {
        group.bench_with_input(BenchmarkId::from_parameter(days), &days, |b, &days| {
            b.iter_batched(
                || build_completions(days, 1),
                |(keys, today)| {
                    black_box(compute_streak(&keys, today));
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn projection_benchmark(c: &mut Criterion) {
    let (keys, today) = build_completions(3_650, 2);
    let blob = serde_json::json!({
        "dailyCompletions": keys,
        "weeklyCompletions": keys,
        "monthlyCompletions": keys,
    })
    .to_string();
    let record: HabitRecord = load(Some(blob.as_str()));

    c.bench_function("project_month", |b| {
        b.iter(|| black_box(project_month(2024, 12, &record, today)));
    });
}

criterion_group!(benches, streak_benchmark, projection_benchmark);
criterion_main!(benches);
