//! Constants used throughout the application

/// Number of landmarks reported per hand
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Length of a flattened per-hand feature vector (x, y per landmark)
pub const FEATURE_VECTOR_LEN: usize = NUM_HAND_LANDMARKS * 2;

/// Landmark index of the wrist
pub const WRIST: usize = 0;

/// Landmark index of the index fingertip
pub const INDEX_FINGER_TIP: usize = 8;

/// Skeleton topology: pairs of landmark indices joined by overlay lines
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4), // thumb
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8), // index finger
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12), // middle finger
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16), // ring finger
    (13, 17),
    (17, 18),
    (18, 19),
    (19, 20), // little finger
    (0, 17), // palm edge
];

/// Default palm detection score threshold
pub const DEFAULT_DETECTION_CONFIDENCE: f32 = 0.7;

/// Default landmark presence threshold
pub const DEFAULT_TRACKING_CONFIDENCE: f32 = 0.7;

/// Default number of hands tracked per frame
pub const DEFAULT_MAX_HANDS: usize = 1;

/// Palm detector input edge length in pixels
pub const PALM_INPUT_SIZE: i32 = 192;

/// Landmark model input edge length in pixels
pub const LANDMARK_INPUT_SIZE: i32 = 224;

/// IOU threshold for palm box suppression
pub const PALM_NMS_THRESHOLD: f32 = 0.3;

/// Expansion factor from palm box to hand crop
pub const HAND_REGION_SHIFT: f32 = 0.3;

/// Image normalization constants for the palm detector
pub const IMAGE_NORMALIZATION_OFFSET: f32 = 127.5;
pub const IMAGE_NORMALIZATION_SCALE: f32 = 127.5;

/// Default pixel margin of the active cursor control sub-rectangle
pub const DEFAULT_FRAME_REDUCTION: i32 = 150;

/// Default class ids driving the cursor
pub const DEFAULT_MOVE_CLASS_ID: i64 = 1;
pub const DEFAULT_CLICK_CLASS_ID: i64 = 3;

/// Nominal interval between pipeline ticks in milliseconds
pub const TICK_INTERVAL_MS: u64 = 50;

/// Default overlay stroke geometry
pub const DEFAULT_POINT_RADIUS: i32 = 2;
pub const DEFAULT_POINT_THICKNESS: i32 = 2;
pub const DEFAULT_LINE_THICKNESS: i32 = 2;
pub const DEFAULT_REGION_THICKNESS: i32 = 2;

/// Pixel margin between a hand's bounding box and its region overlay
pub const REGION_OFFSET: i32 = 30;

/// Pixel offset of handedness and gesture labels from the hand region
pub const LABEL_OFFSET: i32 = 50;

/// Overlay colors in BGR order
pub const POINT_COLOR: (f64, f64, f64) = (46.0, 38.0, 35.0);
pub const LINE_COLOR: (f64, f64, f64) = (174.0, 204.0, 0.0);
pub const REGION_COLOR: (f64, f64, f64) = (174.0, 204.0, 0.0);
pub const LABEL_COLOR: (f64, f64, f64) = (174.0, 204.0, 0.0);
pub const FINGERTIP_COLOR: (f64, f64, f64) = (255.0, 0.0, 255.0);
pub const ACTIVE_REGION_COLOR: (f64, f64, f64) = (255.0, 0.0, 255.0);
