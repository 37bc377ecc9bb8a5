use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use d1orm::{QueryBuilder, table};

/// SELECT c0, c1, ... FROM t WHERE c0 = ? AND c1 = ? ... with `n` bound values.
fn build_select(n: usize) -> QueryBuilder {
    let columns: Vec<String> = (0..n).map(|i| format!("c{i}")).collect();
    let refs: Vec<&str> = columns.iter().map(String::as_str).collect();
    let mut qb = table("t").select(&refs);
    for (i, column) in columns.iter().enumerate() {
        qb = qb.and_where(column, "=", i as i64);
    }
    qb
}

fn bench_to_statement(c: &mut Criterion) {
    let mut group = c.benchmark_group("qb/to_statement");

    for n in [1, 5, 10, 50, 100] {
        let qb = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &qb, |b, qb| {
            b.iter(|| black_box(qb.to_statement()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("qb/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(n).to_statement()));
        });
    }

    group.finish();
}

fn bench_where_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("qb/where_in");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let qb = table("t").where_in("id", values.iter().copied());
                black_box(qb.to_statement())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_to_statement, bench_build_and_render, bench_where_in);
criterion_main!(benches);
