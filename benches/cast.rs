use criterion::{Criterion, black_box, criterion_group, criterion_main};
use raycaster::{GridMap, Player, Shading, TextureSet, cast_frame, cast_ray, sample_column};

fn bench_cast_ray(c: &mut Criterion) {
    let map = GridMap::demo();

    c.bench_function("cast_ray_demo", |b| {
        b.iter(|| cast_ray(black_box(&map), black_box([1.5, 1.5]), black_box(0.7), 0.7))
    });
}

fn bench_cast_frame(c: &mut Criterion) {
    let map = GridMap::demo();
    let player = Player::new([10.5, 4.5], 2.0, 0.08, 0.04);

    c.bench_function("cast_frame_320", |b| {
        b.iter(|| cast_frame(black_box(&map), black_box(&player), 0.87, 320))
    });
    c.bench_function("cast_frame_1280", |b| {
        b.iter(|| cast_frame(black_box(&map), black_box(&player), 0.87, 1280))
    });
}

fn bench_sample_column(c: &mut Criterion) {
    let map = GridMap::demo();
    let textures = TextureSet::procedural(6, 64);
    let shading = Shading::default();
    let hit = cast_ray(&map, [1.5, 1.5], 0.7, 0.7).unwrap();

    c.bench_function("sample_column_64", |b| {
        b.iter(|| sample_column(black_box(&hit), Some(&textures), &shading))
    });
}

criterion_group!(benches, bench_cast_ray, bench_cast_frame, bench_sample_column);
criterion_main!(benches);
