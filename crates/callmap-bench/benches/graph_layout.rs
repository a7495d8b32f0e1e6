use callmap_bench::util;
use callmap_graph::{ForceConfig, ForceSimulation, Vec2, build_graph};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_force_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("force_tick");
    for (folders, per_folder) in [(20, 10), (100, 20), (250, 20)] {
        let graph = build_graph(&util::generate_synthetic_mapping(folders, per_folder));
        let name = format!("{}_nodes", graph.node_count());
        group.bench_function(name, |b| {
            b.iter_batched(
                || ForceSimulation::new(&graph, ForceConfig::default(), Vec2::new(640.0, 360.0)),
                |mut simulation| {
                    for _ in 0..10 {
                        simulation.tick();
                    }
                    black_box(simulation.positions().len())
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_full_layout_1000_nodes(c: &mut Criterion) {
    let graph = build_graph(&util::generate_synthetic_mapping(50, 20));

    c.bench_function("force_layout_to_rest_1000_nodes", |b| {
        b.iter(|| {
            let mut simulation =
                ForceSimulation::new(&graph, ForceConfig::default(), Vec2::ZERO);
            while !simulation.is_settled() {
                simulation.tick();
            }
            black_box(simulation.ticks())
        })
    });
}

criterion_group!(benches, bench_force_tick, bench_full_layout_1000_nodes);
criterion_main!(benches);
