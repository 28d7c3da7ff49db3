//! Benchmark for scene serialization.
//!
//! Run with: cargo bench --package obby_scene --bench serialization_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use obby_core::ThemeId;
use obby_procedural::{GeneratorConfig, WorldGenerator, WorldSeed};
use obby_scene::{encode_attributes, to_xml_bytes, AttributeMap, SceneSerializer};

fn benchmark_serialize_world(c: &mut Criterion) {
    let world = WorldGenerator::new(GeneratorConfig {
        seed: WorldSeed::new(42),
        ..GeneratorConfig::default()
    })
    .generate(30, &ThemeId::DEFAULT_SEQUENCE, &[]);
    let serializer = SceneSerializer::default();

    let mut group = c.benchmark_group("serialization");
    group.throughput(Throughput::Elements(world.primitives.len() as u64));
    group.bench_function("build_document", |b| {
        b.iter(|| black_box(serializer.serialize_world(&world, &[])));
    });
    let doc = serializer.serialize_world(&world, &[]).unwrap();
    group.bench_function("render_xml", |b| {
        b.iter(|| black_box(to_xml_bytes(&doc)));
    });
    group.finish();
}

fn benchmark_attribute_block(c: &mut Criterion) {
    let mut map = AttributeMap::new();
    map.insert("MoveAxis", "x");
    map.insert("MoveDistance", 10.0);
    map.insert("MoveSpeed", 4.0);
    map.insert("Stage", 3);
    map.insert("IsKillBrick", true);

    c.bench_function("encode_attribute_block", |b| {
        b.iter(|| black_box(encode_attributes(black_box(&map))));
    });
}

criterion_group!(benches, benchmark_serialize_world, benchmark_attribute_block);
criterion_main!(benches);
