//! Detector rebuild and full-pipeline tests.
//!
//! These need the ONNX artifacts (and for the pipeline cases a camera and
//! an X11 display), so they are ignored by default:
//! `cargo test -- --ignored` with assets in place runs them.

use gesture_mouse::config::Config;
use gesture_mouse::detector::{DetectorModelPaths, LandmarkDetector, ModelComplexity, ModelSettings};
use gesture_mouse::pipeline::Pipeline;
use std::path::PathBuf;

fn default_paths() -> DetectorModelPaths {
    DetectorModelPaths {
        palm: PathBuf::from("assets/palm_detector.onnx"),
        landmark_lite: PathBuf::from("assets/hand_landmarks_lite.onnx"),
        landmark_full: PathBuf::from("assets/hand_landmarks_full.onnx"),
    }
}

#[test]
#[ignore] // Requires model assets
fn test_setter_rebuilds_before_next_detect() {
    let mut detector = LandmarkDetector::new(default_paths(), ModelSettings::default()).unwrap();
    assert_eq!(detector.generation(), 0);

    detector.set_detection_confidence(0.5).unwrap();
    assert_eq!(detector.generation(), 1);
    assert_eq!(detector.settings().detection_confidence, 0.5);

    detector.set_complexity(ModelComplexity::Full).unwrap();
    assert_eq!(detector.generation(), 2);

    // Unchanged settings skip the rebuild
    detector.set_complexity(ModelComplexity::Full).unwrap();
    assert_eq!(detector.generation(), 2);
}

#[test]
#[ignore] // Requires model assets
fn test_invalid_setter_leaves_detector_unchanged() {
    let mut detector = LandmarkDetector::new(default_paths(), ModelSettings::default()).unwrap();
    let before = detector.settings();

    assert!(detector.set_detection_confidence(1.5).is_err());
    assert!(detector.set_max_hands(0).is_err());
    assert_eq!(detector.settings(), before);
    assert_eq!(detector.generation(), 0);
}

#[test]
#[ignore] // Requires model assets
fn test_reset_restores_construction_settings() {
    let initial = ModelSettings {
        detection_confidence: 0.6,
        ..ModelSettings::default()
    };
    let mut detector = LandmarkDetector::new(default_paths(), initial).unwrap();

    detector.set_detection_confidence(0.9).unwrap();
    detector.set_max_hands(2).unwrap();
    detector.reset().unwrap();
    assert_eq!(detector.settings(), initial);
}

#[test]
#[ignore] // Requires model assets, a camera and an X11 display
fn test_pipeline_tick_produces_data_uri() {
    let pipeline = Pipeline::from_config(&Config::default()).unwrap();
    let uri = pipeline.tick_data_uri().unwrap();
    assert!(uri.starts_with("data:image/jpg;base64,"));
}

#[test]
#[ignore] // Requires model assets, a camera and an X11 display
fn test_pipeline_settings_survive_between_ticks() {
    let pipeline = Pipeline::from_config(&Config::default()).unwrap();

    pipeline.tick().unwrap();
    pipeline.set_frame_reduction(100).unwrap();
    pipeline.set_overlay_landmarks(false).unwrap();
    pipeline.tick().unwrap();

    assert_eq!(pipeline.control_settings().unwrap().frame_reduction, 100);
    assert!(!pipeline.display_settings().unwrap().landmarks);

    pipeline.reset_controls().unwrap();
    pipeline.reset_display().unwrap();
    assert!(pipeline.display_settings().unwrap().landmarks);
}
