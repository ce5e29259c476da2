use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgplan::prelude::*;
use postgres::Row;
use postgres::types::ToSql;

struct Event {
    id: i64,
    kind: String,
    weight: i64,
}

impl TableMeta for Event {
    fn table_name() -> &'static str {
        "event"
    }

    fn columns() -> &'static [ColumnMeta] {
        const COLUMNS: &[ColumnMeta] = &[
            ColumnMeta::new("id", "id"),
            ColumnMeta::new("kind", "kind"),
            ColumnMeta::new("weight", "weight"),
        ];
        COLUMNS
    }
}

impl FieldSet for Event {
    fn collect_fields(&self, out: &mut Vec<FieldAddr>) {
        out.push(FieldAddr::new("id", &self.id));
        out.push(FieldAddr::new("kind", &self.kind));
        out.push(FieldAddr::new("weight", &self.weight));
    }
}

struct NoopExecutor;

impl StatementExecutor for NoopExecutor {
    fn execute(&mut self, _sql: &str, _params: &[&(dyn ToSql + Sync)]) -> PlanResult<u64> {
        Ok(0)
    }

    fn query(&mut self, _sql: &str, _params: &[&(dyn ToSql + Sync)]) -> PlanResult<Vec<Row>> {
        Ok(Vec::new())
    }
}

fn event() -> Event {
    Event {
        id: 0,
        kind: String::new(),
        weight: 0,
    }
}

/// Render a SELECT with `n` ANDed comparison filters.
fn bench_select_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_render/select");

    for n in [1usize, 5, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let ev = event();
                let mut exec = NoopExecutor;
                let mut plan = query(&ev, &mut exec).where_clause();
                for i in 0..n {
                    plan = plan.gt(&ev.weight, i as i64);
                }
                black_box(plan.build_select().unwrap());
            });
        });
    }

    group.finish();
}

/// Render an UPDATE with `n` assignments and one filter.
fn bench_update_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_render/update");

    for n in [1usize, 5, 10] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let ev = event();
                let mut exec = NoopExecutor;
                let mut plan = query(&ev, &mut exec).set(&ev.kind, "bench");
                for i in 0..n {
                    plan = plan.set(&ev.weight, i as i64);
                }
                black_box(plan.where_clause().eq(&ev.id, 1i64).build_update().unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select_render, bench_update_render);
criterion_main!(benches);
