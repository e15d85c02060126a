//! Benchmarks for the per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use treemorph::prelude::*;
use treemorph::{compose, ParticleSet};

fn needles(count: usize) -> ParticleSet {
    let palette = Palette::from_hex(Role::Needles.default_palette()).unwrap();
    ParticleSet::build(count, Role::Needles, &palette, &LayoutParams::default(), 42).unwrap()
}

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    let motion = MotionParams::default();

    for count in [350, 2500, 20_000] {
        let set = needles(count);
        let mut buffer = InstanceBuffer::new(set.particles());

        // Mid-transition exercises the wobble path
        group.bench_with_input(BenchmarkId::new("forming", count), &count, |b, _| {
            b.iter(|| {
                compose(set.particles(), black_box(0.4), black_box(1.5), &motion, &mut buffer);
            })
        });

        group.bench_with_input(BenchmarkId::new("settled", count), &count, |b, _| {
            b.iter(|| {
                compose(set.particles(), black_box(1.0), black_box(1.5), &motion, &mut buffer);
            })
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for count in [350, 2500] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| black_box(needles(count)))
        });
    }

    group.finish();
}

fn bench_scene_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_update");
    let config = SceneConfig {
        seed: Some(7),
        initial_state: TreeState::Tree,
        ..SceneConfig::default()
    };

    group.bench_function("sequential", |b| {
        let mut scene = Scene::from_config(&config).unwrap();
        let mut elapsed = 0.0;
        b.iter(|| {
            elapsed += 1.0 / 60.0;
            scene.update(black_box(elapsed), 1.0 / 60.0);
        })
    });

    group.bench_function("parallel", |b| {
        let mut scene = Scene::from_config(&config).unwrap();
        let mut elapsed = 0.0;
        b.iter(|| {
            elapsed += 1.0 / 60.0;
            scene.update_parallel(black_box(elapsed), 1.0 / 60.0);
        })
    });

    group.finish();
}

criterion_group!(benches, bench_compose, bench_build, bench_scene_update);
criterion_main!(benches);
