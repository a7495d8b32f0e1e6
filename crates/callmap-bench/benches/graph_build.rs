use callmap_bench::util;
use callmap_core::EntityMapping;
use callmap_graph::{CallIndex, MenuTree, build_graph};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_build_graph_5000_functions(c: &mut Criterion) {
    let mapping = util::generate_synthetic_mapping(250, 20);

    c.bench_function("build_graph_5000_functions", |b| {
        b.iter(|| black_box(build_graph(black_box(&mapping))))
    });
    c.bench_function("build_menu_5000_functions", |b| {
        b.iter(|| black_box(MenuTree::build(black_box(&mapping))))
    });
    c.bench_function("filter_menu_5000_functions", |b| {
        let mut menu = MenuTree::build(&mapping);
        b.iter(|| {
            menu.apply_filter(black_box("fn_12"));
            black_box(menu.visible_labels().len())
        })
    });
    c.bench_function("call_index_reachable_5000_functions", |b| {
        let index = CallIndex::build(&mapping);
        b.iter(|| black_box(index.reachable_from(black_box("fn_249_0")).len()))
    });
}

fn bench_load_mapping_from_disk(c: &mut Criterion) {
    let mapping = util::generate_synthetic_mapping(250, 20);
    let temp_dir = util::write_mapping(&mapping).unwrap();
    let path = temp_dir.path().join("functions.json");

    c.bench_function("load_mapping_5000_functions", |b| {
        b.iter(|| black_box(EntityMapping::from_path(&path).unwrap()))
    });
}

criterion_group!(benches, bench_build_graph_5000_functions, bench_load_mapping_from_disk);
criterion_main!(benches);
