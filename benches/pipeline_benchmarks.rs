//! Benchmarks for the per-tick hot path that runs without hardware

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gesture_mouse::classifier::GestureClassifier;
use gesture_mouse::constants::NUM_HAND_LANDMARKS;
use gesture_mouse::detector::{HandObservation, Handedness};
use gesture_mouse::utils::interp;

fn synthetic_hand(seed: f32) -> HandObservation {
    let landmarks: Vec<(f32, f32)> = (0..NUM_HAND_LANDMARKS)
        .map(|i| {
            let t = seed + i as f32 * 0.31;
            (0.4 + 0.2 * t.sin(), 0.45 + 0.2 * t.cos())
        })
        .collect();
    HandObservation::from_landmarks(landmarks, Handedness::Right, 640, 480)
}

fn benchmark_feature_extraction(c: &mut Criterion) {
    let hands: Vec<HandObservation> = (0..16).map(|i| synthetic_hand(i as f32 * 0.7)).collect();

    c.bench_function("features_single_hand", |b| {
        b.iter(|| black_box(GestureClassifier::features(black_box(&hands[0]))));
    });

    c.bench_function("features_16_hands", |b| {
        b.iter(|| {
            for hand in &hands {
                black_box(GestureClassifier::features(black_box(hand)));
            }
        });
    });
}

fn benchmark_coordinate_mapping(c: &mut Criterion) {
    c.bench_function("interp_remap", |b| {
        b.iter(|| {
            for px in 0..640 {
                black_box(interp(
                    black_box(f64::from(px)),
                    (150.0, 490.0),
                    (0.0, 1920.0),
                ));
            }
        });
    });
}

criterion_group!(benches, benchmark_feature_extraction, benchmark_coordinate_mapping);
criterion_main!(benches);
