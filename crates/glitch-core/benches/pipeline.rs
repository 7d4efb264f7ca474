use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use glitch_core::effects::{
    BoxBlur, CameraShake, GaussianBlur, GaussianNoise, MotionBlur, MotionDistortion, ZoomMotion,
};
use glitch_core::{Effect, EffectSpec, Image8, Pipeline};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn test_image(w: u32, h: u32) -> Image8 {
    let data = (0..w * h * 3).map(|i| (i % 251) as u8).collect();
    Image8::from_data(w, h, 3, data).unwrap()
}

fn bench_single_effects(c: &mut Criterion) {
    let img = test_image(500, 375);
    let pipeline = Pipeline::new();

    let cases = [
        ("gaussian_noise", Effect::GaussianNoise(GaussianNoise::default())),
        ("gaussian_blur", Effect::GaussianBlur(GaussianBlur::default())),
        ("motion_blur", Effect::MotionBlur(MotionBlur::default())),
        ("box_blur", Effect::BoxBlur(BoxBlur::default())),
        ("camera_shake", Effect::CameraShake(CameraShake::default())),
        ("motion_distortion", Effect::MotionDistortion(MotionDistortion::default())),
        ("zoom_motion", Effect::ZoomMotion(ZoomMotion::default())),
    ];

    for (name, effect) in cases {
        let spec = EffectSpec::default().with(effect);
        c.bench_function(&format!("preview_500/{name}"), |b| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| pipeline.apply(black_box(&img), &spec, &mut rng).unwrap())
        });
    }
}

fn bench_full_chain(c: &mut Criterion) {
    let img = test_image(800, 600);
    let pipeline = Pipeline::new();
    let mut spec = EffectSpec::default();
    for kind in glitch_core::EffectKind::EXECUTION_ORDER {
        let effect = spec.effect(kind);
        spec.set(effect, true);
    }

    c.bench_function("preview_800/all_effects", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| pipeline.apply(black_box(&img), &spec, &mut rng).unwrap())
    });
}

criterion_group!(benches, bench_single_effects, bench_full_chain);
criterion_main!(benches);
