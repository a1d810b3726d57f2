use blockmark_engine::editing::marks::{active_marks, has_mark, toggle_mark};
use blockmark_engine::models::MarkType;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
mod common;

fn bench_toggle_mark(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggle_mark");
    group.sample_size(10);

    for marks in [0, 10, 100] {
        let block = common::generate_marked_block(200, marks);
        let len = block.len();

        group.bench_with_input(BenchmarkId::new("add_em", marks), &block, |b, block| {
            b.iter(|| {
                std::hint::black_box(toggle_mark(
                    std::hint::black_box(block),
                    MarkType::Em,
                    0..len,
                    None,
                ))
            });
        });

        group.bench_with_input(BenchmarkId::new("has_strong", marks), &block, |b, block| {
            b.iter(|| std::hint::black_box(has_mark(block, MarkType::Strong, &(1..len / 2))));
        });
    }

    group.finish();
}

fn bench_active_marks(c: &mut Criterion) {
    let mut group = c.benchmark_group("active_marks");
    group.sample_size(10);

    let block = common::generate_marked_block(500, 200);
    let len = block.len();

    group.bench_function("whole_block", |b| {
        b.iter(|| std::hint::black_box(active_marks(&block, &(0..len))));
    });

    group.finish();
}

criterion_group!(benches, bench_toggle_mark, bench_active_marks);
criterion_main!(benches);
