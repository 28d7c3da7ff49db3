//! Benchmark for world validation.
//!
//! Run with: cargo bench --package obby_physics --bench validation_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use obby_core::ThemeId;
use obby_physics::PhysicsValidator;
use obby_procedural::{GeneratorConfig, WorldGenerator, WorldSeed};

fn benchmark_validate_world(c: &mut Criterion) {
    let world = WorldGenerator::new(GeneratorConfig {
        seed: WorldSeed::new(42),
        max_stages_per_section: 12,
        ..GeneratorConfig::default()
    })
    .generate(96, &ThemeId::DEFAULT_SEQUENCE, &[]);
    let validator = PhysicsValidator::default();

    let mut group = c.benchmark_group("validation");
    group.throughput(Throughput::Elements(world.primitives.len() as u64));
    group.bench_function("96_stage_world", |b| {
        b.iter(|| black_box(validator.validate(&world.primitives, &world.stages, &world.sections)));
    });
    group.finish();
}

criterion_group!(benches, benchmark_validate_world);
criterion_main!(benches);
