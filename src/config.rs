//! Configuration management for the gesture control application

use crate::constants::{
    DEFAULT_CLICK_CLASS_ID, DEFAULT_DETECTION_CONFIDENCE, DEFAULT_FRAME_REDUCTION,
    DEFAULT_LINE_THICKNESS, DEFAULT_MAX_HANDS, DEFAULT_MOVE_CLASS_ID, DEFAULT_POINT_RADIUS,
    DEFAULT_POINT_THICKNESS, DEFAULT_REGION_THICKNESS, DEFAULT_TRACKING_CONFIDENCE, TICK_INTERVAL_MS,
};
use crate::control::ControlSettings;
use crate::detector::{DetectorModelPaths, ModelComplexity, ModelSettings};
use crate::display::DisplaySettings;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Camera configuration
    pub camera: CameraConfig,

    /// Model artifact paths
    pub models: ModelConfig,

    /// Hand tracking parameters
    pub tracking: TrackingConfig,

    /// Overlay configuration
    pub display: OverlayConfig,

    /// Cursor control configuration
    pub control: ControlConfig,
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Capture device index
    pub index: i32,

    /// Mirror captured frames horizontally
    pub flip: bool,

    /// Interval between pipeline ticks in milliseconds
    pub tick_interval_ms: u64,
}

/// Model artifact paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the palm detection ONNX model
    pub palm_detector: PathBuf,

    /// Path to the lite hand landmark ONNX model
    pub hand_landmarks_lite: PathBuf,

    /// Path to the full hand landmark ONNX model
    pub hand_landmarks_full: PathBuf,

    /// Path to the gesture classification ONNX model
    pub gesture_classifier: PathBuf,

    /// Path to the `"<int> <label>"` gesture label file
    pub gesture_labels: PathBuf,
}

/// Hand tracking parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Palm detection score threshold (0.0-1.0)
    pub detection_confidence: f32,

    /// Landmark presence threshold (0.0-1.0)
    pub tracking_confidence: f32,

    /// Landmark model complexity (0 = lite, 1 = full)
    pub complexity: u8,

    /// Maximum number of hands per frame
    pub max_hands: usize,
}

/// Overlay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Draw landmark points and skeleton lines
    pub landmarks: bool,

    /// Draw the hand-region box
    pub region: bool,

    /// Draw the handedness label
    pub handedness: bool,

    /// Draw the gesture label
    pub gesture: bool,

    /// Landmark point radius
    pub point_radius: i32,

    /// Landmark point stroke width
    pub point_thickness: i32,

    /// Skeleton line stroke width
    pub line_thickness: i32,

    /// Hand-region box stroke width
    pub region_thickness: i32,
}

/// Cursor control configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Start with cursor control active
    pub activated: bool,

    /// Pixel margin of the active control sub-rectangle
    pub frame_reduction: i32,

    /// Class id that steers the cursor
    pub move_class: i64,

    /// Class id that fires a click
    pub click_class: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            models: ModelConfig::default(),
            tracking: TrackingConfig::default(),
            display: OverlayConfig::default(),
            control: ControlConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            flip: false,
            tick_interval_ms: TICK_INTERVAL_MS,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            palm_detector: PathBuf::from("assets/palm_detector.onnx"),
            hand_landmarks_lite: PathBuf::from("assets/hand_landmarks_lite.onnx"),
            hand_landmarks_full: PathBuf::from("assets/hand_landmarks_full.onnx"),
            gesture_classifier: PathBuf::from("assets/gesture_classifier.onnx"),
            gesture_labels: PathBuf::from("assets/labels.txt"),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            detection_confidence: DEFAULT_DETECTION_CONFIDENCE,
            tracking_confidence: DEFAULT_TRACKING_CONFIDENCE,
            complexity: 0,
            max_hands: DEFAULT_MAX_HANDS,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            landmarks: true,
            region: true,
            handedness: true,
            gesture: true,
            point_radius: DEFAULT_POINT_RADIUS,
            point_thickness: DEFAULT_POINT_THICKNESS,
            line_thickness: DEFAULT_LINE_THICKNESS,
            region_thickness: DEFAULT_REGION_THICKNESS,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            activated: false,
            frame_reduction: DEFAULT_FRAME_REDUCTION,
            move_class: DEFAULT_MOVE_CLASS_ID,
            click_class: DEFAULT_CLICK_CLASS_ID,
        }
    }
}

impl ModelConfig {
    /// Detector artifact paths as the detector expects them
    #[must_use]
    pub fn detector_paths(&self) -> DetectorModelPaths {
        DetectorModelPaths {
            palm: self.palm_detector.clone(),
            landmark_lite: self.hand_landmarks_lite.clone(),
            landmark_full: self.hand_landmarks_full.clone(),
        }
    }
}

impl TrackingConfig {
    /// Convert to validated detector settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for out-of-range fields
    pub fn to_model_settings(&self) -> Result<ModelSettings> {
        let settings = ModelSettings {
            detection_confidence: self.detection_confidence,
            tracking_confidence: self.tracking_confidence,
            complexity: ModelComplexity::from_index(self.complexity)?,
            max_hands: self.max_hands,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl OverlayConfig {
    /// Convert to runtime display settings
    #[must_use]
    pub fn to_display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            landmarks: self.landmarks,
            region: self.region,
            handedness: self.handedness,
            gesture: self.gesture,
            point_radius: self.point_radius,
            point_thickness: self.point_thickness,
            line_thickness: self.line_thickness,
            region_thickness: self.region_thickness,
        }
    }
}

impl ControlConfig {
    /// Convert to runtime control settings
    #[must_use]
    pub fn to_control_settings(&self) -> ControlSettings {
        ControlSettings {
            frame_reduction: self.frame_reduction,
            activated: self.activated,
            move_class: self.move_class,
            click_class: self.click_class,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error or [`Error::Config`] for malformed YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error or [`Error::Config`] if serialization fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges and the presence of every model artifact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] or [`Error::Config`]
    pub fn validate(&self) -> Result<()> {
        if self.camera.tick_interval_ms == 0 {
            return Err(Error::InvalidConfiguration(
                "tick interval must be greater than 0".to_string(),
            ));
        }

        self.tracking.to_model_settings()?;
        self.control.to_control_settings().validate()?;

        for (name, value) in [
            ("point radius", self.display.point_radius),
            ("point thickness", self.display.point_thickness),
            ("line thickness", self.display.line_thickness),
            ("region thickness", self.display.region_thickness),
        ] {
            if value <= 0 {
                return Err(Error::InvalidConfiguration(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        for (name, path) in [
            ("palm detector", &self.models.palm_detector),
            ("hand landmarks (lite)", &self.models.hand_landmarks_lite),
            ("hand landmarks (full)", &self.models.hand_landmarks_full),
            ("gesture classifier", &self.models.gesture_classifier),
            ("gesture labels", &self.models.gesture_labels),
        ] {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "{name} file not found: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Gesture mouse configuration

camera:
  index: 0
  flip: false
  tick_interval_ms: 50

models:
  palm_detector: "assets/palm_detector.onnx"
  hand_landmarks_lite: "assets/hand_landmarks_lite.onnx"
  hand_landmarks_full: "assets/hand_landmarks_full.onnx"
  gesture_classifier: "assets/gesture_classifier.onnx"
  gesture_labels: "assets/labels.txt"

tracking:
  detection_confidence: 0.7
  tracking_confidence: 0.7
  complexity: 0
  max_hands: 1

display:
  landmarks: true
  region: true
  handedness: true
  gesture: true
  point_radius: 2
  point_thickness: 2
  line_thickness: 2
  region_thickness: 2

control:
  activated: false
  frame_reduction: 150
  move_class: 1
  click_class: 3
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_parses() {
        let config: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.camera.tick_interval_ms, 50);
        assert_eq!(config.control.frame_reduction, 150);
        assert_eq!(config.tracking.complexity, 0);
    }

    #[test]
    fn test_default_yaml_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.camera.index, config.camera.index);
        assert_eq!(parsed.control.move_class, config.control.move_class);
        assert_eq!(parsed.tracking.max_hands, config.tracking.max_hands);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("camera:\n  index: 2\n  flip: true\n  tick_interval_ms: 40\n").unwrap();
        assert_eq!(config.camera.index, 2);
        assert!(config.camera.flip);
        assert_eq!(config.control.frame_reduction, DEFAULT_FRAME_REDUCTION);
    }

    #[test]
    fn test_validate_rejects_bad_thresholds() {
        let mut config = Config::default();
        config.tracking.detection_confidence = 1.5;
        assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));

        let mut config = Config::default();
        config.tracking.complexity = 3;
        assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));

        let mut config = Config::default();
        config.camera.tick_interval_ms = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_validate_reports_missing_models() {
        let mut config = Config::default();
        config.models.palm_detector = PathBuf::from("/nonexistent/palm.onnx");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_tracking_conversion_maps_complexity() {
        let mut tracking = TrackingConfig::default();
        tracking.complexity = 1;
        let settings = tracking.to_model_settings().unwrap();
        assert_eq!(settings.complexity, ModelComplexity::Full);
    }
}
