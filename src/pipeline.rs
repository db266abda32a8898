//! Pipeline orchestration: one synchronous pass per display tick.
//!
//! The pipeline owns every stage behind its own lock, so settings
//! mutations arriving from a UI layer between ticks observe a consistent
//! per-stage snapshot, and a detector rebuild always completes before the
//! next `detect()` call.

use crate::capture::{CaptureParameter, CaptureSettings, FrameSource};
use crate::classifier::{GestureClassifier, LabelTable};
use crate::config::Config;
use crate::control::{ControlMapper, ControlSettings};
use crate::detector::{LandmarkDetector, ModelComplexity, ModelSettings};
use crate::display::DisplaySettings;
use crate::error::{Error, Result};
use crate::pointer::X11Pointer;
use crate::utils::encoding;
use opencv::core::Mat;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

struct DisplayState {
    current: DisplaySettings,
    defaults: DisplaySettings,
}

fn lock<T>(cell: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    cell.lock()
        .map_err(|_| Error::Internal("settings lock poisoned".to_string()))
}

/// Capture-to-cursor pipeline with a hot-swappable settings surface
pub struct Pipeline {
    capture: Mutex<FrameSource>,
    detector: Mutex<LandmarkDetector>,
    classifier: Mutex<GestureClassifier>,
    control: Mutex<ControlMapper>,
    display: Mutex<DisplayState>,
}

impl Pipeline {
    /// Compose a pipeline from already-built stages
    #[must_use]
    pub fn new(
        capture: FrameSource,
        detector: LandmarkDetector,
        classifier: GestureClassifier,
        control: ControlMapper,
        display: DisplaySettings,
    ) -> Self {
        Self {
            capture: Mutex::new(capture),
            detector: Mutex::new(detector),
            classifier: Mutex::new(classifier),
            control: Mutex::new(control),
            display: Mutex::new(DisplayState {
                current: display,
                defaults: display,
            }),
        }
    }

    /// Build every stage from a validated configuration.
    ///
    /// # Errors
    ///
    /// Surfaces configuration, device, model and display-server errors
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut capture = FrameSource::open(config.camera.index)?;
        capture.set_flip(config.camera.flip);

        let detector =
            LandmarkDetector::new(config.models.detector_paths(), config.tracking.to_model_settings()?)?;
        let classifier =
            GestureClassifier::new(&config.models.gesture_classifier, &config.models.gesture_labels)?;
        let control = ControlMapper::new(Box::new(X11Pointer::new()?), config.control.to_control_settings())?;

        Ok(Self::new(
            capture,
            detector,
            classifier,
            control,
            config.display.to_display_settings(),
        ))
    }

    /// Run one capture -> detect -> classify -> control pass and return the
    /// annotated frame.
    ///
    /// # Errors
    ///
    /// Stage errors surface unchanged: [`Error::CaptureTimeout`] and
    /// [`Error::EndOfStream`] mean no display update this tick, anything
    /// else is a genuine fault. Nothing is retried internally.
    pub fn tick_frame(&self) -> Result<Mat> {
        let (mut frame, flip) = {
            let mut capture = lock(&self.capture)?;
            let frame = capture.capture()?;
            (frame, capture.flip())
        };
        let display = lock(&self.display)?.current;

        let observations = lock(&self.detector)?.detect(&mut frame, flip, &display)?;

        let mut hands = Vec::with_capacity(observations.len());
        {
            let classifier = lock(&self.classifier)?;
            for observation in observations {
                let gesture = classifier.classify(&observation)?;
                classifier.annotate(&mut frame, &observation, &gesture, &display)?;
                hands.push((observation, gesture));
            }
        }

        lock(&self.control)?.apply(&mut frame, &hands, flip)?;
        Ok(frame)
    }

    /// Run one pass and encode the annotated frame as JPEG.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::tick_frame`]
    pub fn tick(&self) -> Result<Vec<u8>> {
        encoding::encode_jpeg(&self.tick_frame()?)
    }

    /// Run one pass and return the frame as a base64 image data URI.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::tick_frame`]
    pub fn tick_data_uri(&self) -> Result<String> {
        Ok(encoding::to_data_uri(&self.tick()?))
    }

    // --- capture settings -------------------------------------------------

    /// Current capture parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn capture_settings(&self) -> Result<CaptureSettings> {
        Ok(lock(&self.capture)?.settings())
    }

    /// Read one capture parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn capture_parameter(&self, parameter: CaptureParameter) -> Result<f64> {
        Ok(lock(&self.capture)?.get(parameter))
    }

    /// Write one capture parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for non-finite values
    pub fn set_capture_parameter(&self, parameter: CaptureParameter, value: f64) -> Result<()> {
        lock(&self.capture)?.set(parameter, value)
    }

    /// Enable or disable horizontal mirroring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn set_flip(&self, flip: bool) -> Result<()> {
        lock(&self.capture)?.set_flip(flip);
        Ok(())
    }

    /// Restore the open-time capture parameter snapshot.
    ///
    /// # Errors
    ///
    /// Surfaces device write errors
    pub fn reset_capture(&self) -> Result<()> {
        lock(&self.capture)?.reset()
    }

    /// Switch to another capture device, restoring the current one first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnavailable`] if the new index fails to open
    pub fn switch_camera(&self, index: i32) -> Result<()> {
        lock(&self.capture)?.switch(index)
    }

    // --- detector settings ------------------------------------------------

    /// Current detector parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn model_settings(&self) -> Result<ModelSettings> {
        Ok(lock(&self.detector)?.settings())
    }

    /// Set the palm detection threshold, rebuilding the detector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] or [`Error::ModelLoad`]
    pub fn set_detection_confidence(&self, value: f32) -> Result<()> {
        lock(&self.detector)?.set_detection_confidence(value)
    }

    /// Set the landmark presence threshold, rebuilding the detector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] or [`Error::ModelLoad`]
    pub fn set_tracking_confidence(&self, value: f32) -> Result<()> {
        lock(&self.detector)?.set_tracking_confidence(value)
    }

    /// Switch the landmark model variant, rebuilding the detector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`]
    pub fn set_model_complexity(&self, complexity: ModelComplexity) -> Result<()> {
        lock(&self.detector)?.set_complexity(complexity)
    }

    /// Cap the number of hands per frame, rebuilding the detector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] or [`Error::ModelLoad`]
    pub fn set_max_hands(&self, max_hands: usize) -> Result<()> {
        lock(&self.detector)?.set_max_hands(max_hands)
    }

    /// Restore the construction-time detector settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`]
    pub fn reset_model(&self) -> Result<()> {
        lock(&self.detector)?.reset()
    }

    // --- display settings -------------------------------------------------

    /// Current overlay settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn display_settings(&self) -> Result<DisplaySettings> {
        Ok(lock(&self.display)?.current)
    }

    /// Toggle the landmark/skeleton overlay.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn set_overlay_landmarks(&self, enabled: bool) -> Result<()> {
        lock(&self.display)?.current.landmarks = enabled;
        Ok(())
    }

    /// Toggle the hand-region overlay.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn set_overlay_region(&self, enabled: bool) -> Result<()> {
        lock(&self.display)?.current.region = enabled;
        Ok(())
    }

    /// Toggle the handedness label overlay.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn set_overlay_handedness(&self, enabled: bool) -> Result<()> {
        lock(&self.display)?.current.handedness = enabled;
        Ok(())
    }

    /// Toggle the gesture label overlay.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn set_overlay_gesture(&self, enabled: bool) -> Result<()> {
        lock(&self.display)?.current.gesture = enabled;
        Ok(())
    }

    /// Set the landmark point radius.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for non-positive values
    pub fn set_point_radius(&self, value: i32) -> Result<()> {
        Self::validate_stroke("point radius", value)?;
        lock(&self.display)?.current.point_radius = value;
        Ok(())
    }

    /// Set the landmark point stroke width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for non-positive values
    pub fn set_point_thickness(&self, value: i32) -> Result<()> {
        Self::validate_stroke("point thickness", value)?;
        lock(&self.display)?.current.point_thickness = value;
        Ok(())
    }

    /// Set the skeleton line stroke width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for non-positive values
    pub fn set_line_thickness(&self, value: i32) -> Result<()> {
        Self::validate_stroke("line thickness", value)?;
        lock(&self.display)?.current.line_thickness = value;
        Ok(())
    }

    /// Set the hand-region box stroke width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for non-positive values
    pub fn set_region_thickness(&self, value: i32) -> Result<()> {
        Self::validate_stroke("region thickness", value)?;
        lock(&self.display)?.current.region_thickness = value;
        Ok(())
    }

    /// Restore the construction-time overlay settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn reset_display(&self) -> Result<()> {
        let mut display = lock(&self.display)?;
        display.current = display.defaults;
        Ok(())
    }

    fn validate_stroke(name: &str, value: i32) -> Result<()> {
        if value <= 0 {
            return Err(Error::InvalidConfiguration(format!(
                "{name} must be positive, got {value}"
            )));
        }
        Ok(())
    }

    // --- control settings -------------------------------------------------

    /// Current cursor mapping parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn control_settings(&self) -> Result<ControlSettings> {
        Ok(lock(&self.control)?.settings())
    }

    /// Set the pixel margin of the active sub-rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for negative values
    pub fn set_frame_reduction(&self, value: i32) -> Result<()> {
        lock(&self.control)?.set_frame_reduction(value)
    }

    /// Enable or disable cursor control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn set_activated(&self, activated: bool) -> Result<()> {
        lock(&self.control)?.set_activated(activated);
        Ok(())
    }

    /// Restore the construction-time cursor mapping parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn reset_controls(&self) -> Result<()> {
        lock(&self.control)?.reset();
        Ok(())
    }

    // --- classifier artifacts ---------------------------------------------

    /// Replace the gesture model; the prior model stays active on failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`]
    pub fn upload_gesture_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        lock(&self.classifier)?.load_model(path)
    }

    /// Replace the label table; the prior table stays active on failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`]
    pub fn upload_label_table<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        lock(&self.classifier)?.load_labels(path)
    }

    /// Snapshot of the active label table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] on a poisoned lock
    pub fn label_table(&self) -> Result<LabelTable> {
        Ok(lock(&self.classifier)?.labels().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_validation() {
        assert!(Pipeline::validate_stroke("point radius", 2).is_ok());
        assert!(matches!(
            Pipeline::validate_stroke("point radius", 0),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(Pipeline::validate_stroke("line thickness", -3).is_err());
    }
}
