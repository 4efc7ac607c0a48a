use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skirmish_core::{Aabb, Vec3};
use skirmish_nav::NavGrid;

fn scattered_obstacles() -> Vec<Aabb> {
    // Deterministic pseudo-random scatter; no RNG dependency in benches.
    let mut out = Vec::new();
    let mut state = 0x9E3779B97F4A7C15u64;
    for _ in 0..40 {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let x = ((state >> 16) % 56) as f32 + 4.0;
        let z = ((state >> 40) % 56) as f32 + 4.0;
        out.push(Aabb::new(
            Vec3::new(x, 0.0, z),
            Vec3::new(1.0, 1.0, 1.0),
        ));
    }
    out
}

fn bench_find_path(c: &mut Criterion) {
    let bounds = Aabb::new(Vec3::new(32.0, 0.0, 32.0), Vec3::new(32.0, 2.0, 32.0));
    let grid = NavGrid::build(bounds, 1.0, &scattered_obstacles());
    let from = Vec3::new(1.5, 0.0, 1.5);
    let to = Vec3::new(62.5, 0.0, 62.5);

    c.bench_function("find_path_64x64_scattered", |b| {
        b.iter(|| black_box(grid.find_path(black_box(from), black_box(to))))
    });
}

fn bench_rebuild(c: &mut Criterion) {
    let bounds = Aabb::new(Vec3::new(32.0, 0.0, 32.0), Vec3::new(32.0, 2.0, 32.0));
    let obstacles = scattered_obstacles();

    c.bench_function("rasterize_64x64", |b| {
        b.iter(|| black_box(NavGrid::build(bounds, 1.0, black_box(&obstacles))))
    });
}

criterion_group!(benches, bench_find_path, bench_rebuild);
criterion_main!(benches);
