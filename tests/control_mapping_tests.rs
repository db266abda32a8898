//! Control mapping tests with a recording pointer backend

use gesture_mouse::classifier::Gesture;
use gesture_mouse::constants::{INDEX_FINGER_TIP, NUM_HAND_LANDMARKS};
use gesture_mouse::control::{ControlMapper, ControlSettings};
use gesture_mouse::detector::{HandObservation, Handedness};
use gesture_mouse::pointer::PointerDevice;
use gesture_mouse::Result;
use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::prelude::*;
use std::sync::{Arc, Mutex};

/// Recording pointer backend standing in for the X11 implementation
#[derive(Debug, Default)]
struct PointerLog {
    moves: Vec<(i16, i16)>,
    clicks: usize,
}

struct MockPointer {
    screen: (u16, u16),
    log: Arc<Mutex<PointerLog>>,
}

impl PointerDevice for MockPointer {
    fn screen_size(&self) -> (u16, u16) {
        self.screen
    }

    fn move_to(&mut self, x: i16, y: i16) -> Result<()> {
        self.log.lock().unwrap().moves.push((x, y));
        Ok(())
    }

    fn click(&mut self) -> Result<()> {
        self.log.lock().unwrap().clicks += 1;
        Ok(())
    }
}

fn mapper_with_log(settings: ControlSettings) -> (ControlMapper, Arc<Mutex<PointerLog>>) {
    let log = Arc::new(Mutex::new(PointerLog::default()));
    let pointer = MockPointer {
        screen: (1920, 1080),
        log: Arc::clone(&log),
    };
    (ControlMapper::new(Box::new(pointer), settings).unwrap(), log)
}

fn test_frame() -> Mat {
    Mat::new_rows_cols_with_default(480, 640, CV_8UC3, Scalar::all(0.0)).unwrap()
}

/// A hand whose index fingertip sits at the given normalized position
fn hand_at(tip: (f32, f32)) -> HandObservation {
    let mut landmarks = vec![(tip.0 - 0.05, tip.1 - 0.05); NUM_HAND_LANDMARKS];
    landmarks[INDEX_FINGER_TIP] = tip;
    HandObservation::from_landmarks(landmarks, Handedness::Right, 640, 480)
}

fn gesture(id: i64) -> Gesture {
    Gesture {
        id,
        name: format!("gesture-{id}"),
    }
}

#[test]
fn test_center_fingertip_maps_to_screen_center() {
    let settings = ControlSettings {
        activated: true,
        frame_reduction: 150,
        ..ControlSettings::default()
    };
    let (mut mapper, log) = mapper_with_log(settings);

    let mut frame = test_frame();
    let hands = vec![(hand_at((0.5, 0.5)), gesture(settings.move_class))];
    mapper.apply(&mut frame, &hands, false).unwrap();

    // Fingertip (0.5, 0.5) -> pixel (320, 240); x maps over [150, 490] to
    // 960 and mirrors to 1920 - 960 = 960; y maps over [150, 330] to 540
    let moves = log.lock().unwrap().moves.clone();
    assert_eq!(moves, vec![(960, 540)]);
}

#[test]
fn test_off_center_fingertip_mirrors_x() {
    let settings = ControlSettings {
        activated: true,
        frame_reduction: 150,
        ..ControlSettings::default()
    };

    // Fingertip at pixel (405, 240): x maps to (405-150)/340*1920 = 1440
    let (mut mapper, log) = mapper_with_log(settings);
    let mut frame = test_frame();
    let tip = (405.0 / 640.0, 0.5);
    mapper
        .apply(&mut frame, &[(hand_at(tip), gesture(settings.move_class))], false)
        .unwrap();
    assert_eq!(log.lock().unwrap().moves, vec![(1920 - 1440, 540)]);

    // With capture flip active the mapped x is used directly
    let (mut mapper, log) = mapper_with_log(settings);
    let mut frame = test_frame();
    mapper
        .apply(&mut frame, &[(hand_at(tip), gesture(settings.move_class))], true)
        .unwrap();
    assert_eq!(log.lock().unwrap().moves, vec![(1440, 540)]);
}

#[test]
fn test_fingertip_in_margin_pins_to_screen_edge() {
    let settings = ControlSettings {
        activated: true,
        frame_reduction: 150,
        ..ControlSettings::default()
    };
    let (mut mapper, log) = mapper_with_log(settings);

    let mut frame = test_frame();
    // Fingertip at pixel (40, 40), inside the margin on both axes
    let hands = vec![(hand_at((40.0 / 640.0, 40.0 / 480.0)), gesture(settings.move_class))];
    mapper.apply(&mut frame, &hands, false).unwrap();

    // x clamps to 0 and mirrors to the right edge; y clamps to the top
    assert_eq!(log.lock().unwrap().moves, vec![(1920, 0)]);
}

#[test]
fn test_click_gesture_clicks_every_detecting_tick() {
    let settings = ControlSettings {
        activated: true,
        ..ControlSettings::default()
    };
    let (mut mapper, log) = mapper_with_log(settings);

    let mut frame = test_frame();
    let hands = vec![(hand_at((0.5, 0.5)), gesture(settings.click_class))];
    for _ in 0..5 {
        mapper.apply(&mut frame, &hands, false).unwrap();
    }

    // Held click gestures fire once per tick: five ticks, five clicks
    let log = log.lock().unwrap();
    assert_eq!(log.clicks, 5);
    assert!(log.moves.is_empty());
}

#[test]
fn test_unrelated_gesture_issues_no_commands() {
    let settings = ControlSettings {
        activated: true,
        ..ControlSettings::default()
    };
    let (mut mapper, log) = mapper_with_log(settings);

    let mut frame = test_frame();
    let hands = vec![(hand_at((0.5, 0.5)), gesture(99))];
    mapper.apply(&mut frame, &hands, false).unwrap();

    let log = log.lock().unwrap();
    assert!(log.moves.is_empty());
    assert_eq!(log.clicks, 0);
}

#[test]
fn test_deactivated_mapper_leaves_frame_and_pointer_untouched() {
    let settings = ControlSettings::default();
    assert!(!settings.activated);
    let (mut mapper, log) = mapper_with_log(settings);

    let mut frame = test_frame();
    let before = frame.data_bytes().unwrap().to_vec();

    let hands = vec![
        (hand_at((0.5, 0.5)), gesture(settings.move_class)),
        (hand_at((0.3, 0.3)), gesture(settings.click_class)),
    ];
    mapper.apply(&mut frame, &hands, false).unwrap();

    assert_eq!(frame.data_bytes().unwrap(), before.as_slice());
    let log = log.lock().unwrap();
    assert!(log.moves.is_empty());
    assert_eq!(log.clicks, 0);
}

#[test]
fn test_move_gesture_annotates_frame() {
    let settings = ControlSettings {
        activated: true,
        frame_reduction: 150,
        ..ControlSettings::default()
    };
    let (mut mapper, _log) = mapper_with_log(settings);

    let mut frame = test_frame();
    let before = frame.data_bytes().unwrap().to_vec();
    let hands = vec![(hand_at((0.5, 0.5)), gesture(settings.move_class))];
    mapper.apply(&mut frame, &hands, false).unwrap();

    // Fingertip marker and active-region rectangle were drawn
    assert_ne!(frame.data_bytes().unwrap(), before.as_slice());
}

#[test]
fn test_first_move_hand_wins() {
    let settings = ControlSettings {
        activated: true,
        frame_reduction: 150,
        ..ControlSettings::default()
    };
    let (mut mapper, log) = mapper_with_log(settings);

    let mut frame = test_frame();
    let hands = vec![
        (hand_at((0.5, 0.5)), gesture(settings.move_class)),
        (hand_at((0.25, 0.25)), gesture(settings.move_class)),
    ];
    mapper.apply(&mut frame, &hands, false).unwrap();

    // Exactly one move per tick, from the first matching hand
    assert_eq!(log.lock().unwrap().moves, vec![(960, 540)]);
}

#[test]
fn test_reset_restores_construction_settings() {
    let settings = ControlSettings {
        activated: false,
        frame_reduction: 120,
        ..ControlSettings::default()
    };
    let (mut mapper, _log) = mapper_with_log(settings);

    mapper.set_activated(true);
    mapper.set_frame_reduction(40).unwrap();
    assert!(mapper.settings().activated);
    assert_eq!(mapper.settings().frame_reduction, 40);

    mapper.reset();
    assert_eq!(mapper.settings(), settings);
}

#[test]
fn test_invalid_frame_reduction_is_rejected_atomically() {
    let settings = ControlSettings {
        frame_reduction: 120,
        ..ControlSettings::default()
    };
    let (mut mapper, _log) = mapper_with_log(settings);

    assert!(mapper.set_frame_reduction(-10).is_err());
    assert_eq!(mapper.settings().frame_reduction, 120);
}
