//! Feature extraction and label table behavior

use gesture_mouse::classifier::{GestureClassifier, LabelTable};
use gesture_mouse::constants::{FEATURE_VECTOR_LEN, NUM_HAND_LANDMARKS};
use gesture_mouse::detector::{HandObservation, Handedness};

fn observation(landmarks: Vec<(f32, f32)>) -> HandObservation {
    HandObservation::from_landmarks(landmarks, Handedness::Left, 640, 480)
}

#[test]
fn test_feature_vector_length() {
    let landmarks = vec![(0.5, 0.5); NUM_HAND_LANDMARKS];
    let features = GestureClassifier::features(&observation(landmarks));
    assert_eq!(features.len(), FEATURE_VECTOR_LEN);
}

#[test]
fn test_translation_invariance_exact_shift() {
    let landmarks: Vec<(f32, f32)> = (0..NUM_HAND_LANDMARKS)
        .map(|i| {
            let t = i as f32 * 0.05;
            (0.3 + t * 0.01, 0.4 + (t * 1.7).fract() * 0.1)
        })
        .collect();

    // Shift by an exactly representable offset so features match bit for bit
    let (dx, dy) = (0.125f32, 0.0625f32);
    let translated: Vec<(f32, f32)> = landmarks.iter().map(|&(x, y)| (x + dx, y + dy)).collect();

    let base = GestureClassifier::features(&observation(landmarks));
    let shifted = GestureClassifier::features(&observation(translated));

    for (a, b) in base.iter().zip(shifted.iter()) {
        assert!((a - b).abs() < 1e-6, "feature drifted: {a} vs {b}");
    }
}

#[test]
fn test_features_ignore_handedness_and_frame_size() {
    let landmarks = vec![(0.25, 0.75); NUM_HAND_LANDMARKS];

    let small = HandObservation::from_landmarks(landmarks.clone(), Handedness::Left, 320, 240);
    let large = HandObservation::from_landmarks(landmarks, Handedness::Right, 1920, 1080);

    assert_eq!(
        GestureClassifier::features(&small),
        GestureClassifier::features(&large)
    );
}

#[test]
fn test_label_table_tolerates_extra_whitespace() {
    let table = LabelTable::parse("  0   open palm  \n\n 1\tpointer\n").unwrap();
    assert_eq!(table.get(0), Some("open palm"));
    assert_eq!(table.get(1), Some("pointer"));
    assert_eq!(table.len(), 2);
}

#[test]
fn test_label_table_last_duplicate_wins() {
    let table = LabelTable::parse("1 first\n1 second\n").unwrap();
    assert_eq!(table.get(1), Some("second"));
    assert_eq!(table.len(), 1);
}
