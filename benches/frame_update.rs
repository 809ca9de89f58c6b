use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use loop_cubes::noise;
use loop_cubes::palettes;
use loop_cubes::types::InstanceRaw;
use loop_cubes::{AnimationDriver, Random, SceneBuilder, SketchSettings, Variant};

fn bench_driver_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("driver_update");
    let catalog = palettes::catalog().unwrap();

    for variant in [Variant::Flat, Variant::Shader] {
        let settings = SketchSettings {
            variant,
            ..Default::default()
        };
        let mut random = Random::with_seed(42);
        let palette = random.pick_palette(&catalog).unwrap();
        let mut scene = SceneBuilder::new(variant).build(&palette, &mut random);
        let driver = AnimationDriver::new(settings.easing());

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", variant)),
            &variant,
            |b, _| {
                let mut frame = 0u32;
                b.iter(|| {
                    let playhead = (frame % 192) as f32 / 192.0;
                    driver.update(&mut scene, black_box(playhead), frame as f32 / 24.0);
                    frame = frame.wrapping_add(1);
                })
            },
        );
    }

    group.finish();
}

fn bench_instance_upload(c: &mut Criterion) {
    let catalog = palettes::catalog().unwrap();
    let mut random = Random::with_seed(7);
    let palette = random.pick_palette(&catalog).unwrap();
    let scene = SceneBuilder::new(Variant::Shader).build(&palette, &mut random);

    c.bench_function("instance_raw_40", |b| {
        b.iter(|| {
            scene
                .instances()
                .iter()
                .map(|i| {
                    InstanceRaw::new(
                        scene.model_matrix(i),
                        i.material().color().to_array(),
                        i.material().time().unwrap_or(0.0),
                    )
                })
                .collect::<Vec<_>>()
        })
    });
}

fn bench_displace(c: &mut Criterion) {
    let mut group = c.benchmark_group("noise_displace");

    // One cube's worth of vertices, and a dense sample
    for count in [24usize, 4096] {
        let points: Vec<Vec3> = (0..count)
            .map(|i| {
                let t = i as f32 / count as f32;
                Vec3::new(t * 2.0 - 1.0, (t * 13.0).sin(), (t * 7.0).cos())
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |b, points| {
            b.iter(|| {
                points
                    .iter()
                    .map(|&p| noise::displace(black_box(p), 3.25))
                    .fold(Vec3::ZERO, |acc, d| acc + d)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_driver_update, bench_instance_upload, bench_displace);
criterion_main!(benches);
