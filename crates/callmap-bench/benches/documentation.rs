use callmap_bench::util;
use callmap_core::FunctionRecord;
use callmap_graph::{DetailContent, parse_documentation};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_parse_documentation(c: &mut Criterion) {
    let doc = util::generate_documentation(7, 3);
    c.bench_function("parse_documentation", |b| {
        b.iter(|| black_box(parse_documentation(black_box(&doc))))
    });

    let calls: Vec<String> = (0..200).map(|i| format!("callee_{}", i % 40)).collect();
    let record = FunctionRecord::with_calls(calls).documented(doc);
    c.bench_function("detail_content_from_record", |b| {
        b.iter(|| black_box(DetailContent::from_record("handler", black_box(&record))))
    });
}

criterion_group!(benches, bench_parse_documentation);
criterion_main!(benches);
