use criterion::{Criterion, criterion_group, criterion_main};
use mdsync_engine::{ParseOptions, compute_context, parse, to_tree_location};
mod common;

fn bench_cursor_context(c: &mut Criterion) {
    let mut group = c.benchmark_group("context");

    let content = common::generate_markdown_content(500);
    let middle = content.len() / 2;
    let caret = (middle..content.len())
        .find(|&i| content.is_char_boundary(i))
        .unwrap_or(0);

    group.bench_function("compute_context_large_doc", |b| {
        b.iter(|| std::hint::black_box(compute_context(&content, std::hint::black_box(caret))));
    });

    let doc = parse(&content, &ParseOptions::default());
    group.bench_function("to_tree_location_large_doc", |b| {
        b.iter(|| std::hint::black_box(to_tree_location(std::hint::black_box(caret), &doc)));
    });

    group.finish();
}

criterion_group!(benches, bench_cursor_context);
criterion_main!(benches);
