//! Hand landmark detection stage.
//!
//! Two ONNX Runtime sessions sit behind one facade: an SSD-style palm
//! detector proposes hand regions over the full frame, and a landmark
//! regressor produces 21 points plus a handedness score per region. Any
//! settings change rebuilds both sessions before the next `detect()` call,
//! so inference never runs on a stale model.

use crate::constants::{
    DEFAULT_DETECTION_CONFIDENCE, DEFAULT_MAX_HANDS, DEFAULT_TRACKING_CONFIDENCE, HAND_CONNECTIONS,
    HAND_REGION_SHIFT, IMAGE_NORMALIZATION_OFFSET, IMAGE_NORMALIZATION_SCALE, LABEL_OFFSET,
    LANDMARK_INPUT_SIZE, LABEL_COLOR, LINE_COLOR, NUM_HAND_LANDMARKS, PALM_INPUT_SIZE,
    PALM_NMS_THRESHOLD, POINT_COLOR, REGION_COLOR, REGION_OFFSET,
};
use crate::display::DisplaySettings;
use crate::error::{Error, Result};
use crate::utils::{bgr, safe_cast::f32_to_i32_clamp, square_region};
use log::{debug, info};
use ndarray::{Array4, CowArray};
use opencv::core::{Mat, Point, Rect, Size, CV_32F};
use opencv::imgproc::{self, InterpolationFlags, FONT_HERSHEY_PLAIN, LINE_8};
use opencv::prelude::*;
use ort::{Environment, GraphOptimizationLevel, LoggingLevel, Session, SessionBuilder, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Landmark model complexity, selecting the lite or full artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelComplexity {
    Lite,
    Full,
}

impl ModelComplexity {
    /// Parse the wire representation used by the settings surface.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for values outside {0, 1}
    pub fn from_index(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Lite),
            1 => Ok(Self::Full),
            other => Err(Error::InvalidConfiguration(format!(
                "model complexity must be 0 or 1, got {other}"
            ))),
        }
    }

    /// Wire representation of this complexity level
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Lite => 0,
            Self::Full => 1,
        }
    }
}

/// Detector parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSettings {
    /// Palm detection score threshold, in [0, 1]
    pub detection_confidence: f32,
    /// Landmark presence threshold, in [0, 1]
    pub tracking_confidence: f32,
    /// Landmark model variant
    pub complexity: ModelComplexity,
    /// Upper bound on hands returned per frame
    pub max_hands: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            detection_confidence: DEFAULT_DETECTION_CONFIDENCE,
            tracking_confidence: DEFAULT_TRACKING_CONFIDENCE,
            complexity: ModelComplexity::Lite,
            max_hands: DEFAULT_MAX_HANDS,
        }
    }
}

impl ModelSettings {
    /// Check every field against its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the offending field
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.detection_confidence) {
            return Err(Error::InvalidConfiguration(format!(
                "detection confidence must be within [0, 1], got {}",
                self.detection_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.tracking_confidence) {
            return Err(Error::InvalidConfiguration(format!(
                "tracking confidence must be within [0, 1], got {}",
                self.tracking_confidence
            )));
        }
        if self.max_hands == 0 {
            return Err(Error::InvalidConfiguration(
                "max hands must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Model-reported hand side, after mirroring correction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// The opposite side, applied when the frame is not mirrored
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Display string for the overlay
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

/// One detected hand, valid for the current tick only
#[derive(Debug, Clone)]
pub struct HandObservation {
    /// 21 landmarks, normalized to [0, 1] frame coordinates
    pub landmarks: Vec<(f32, f32)>,
    /// Mirroring-corrected hand side
    pub handedness: Handedness,
    /// Landmark extents in pixel space
    pub bbox: Rect,
}

impl HandObservation {
    /// Build an observation from normalized landmarks, deriving the
    /// pixel-space bounding box from their extents.
    #[must_use]
    pub fn from_landmarks(
        landmarks: Vec<(f32, f32)>,
        handedness: Handedness,
        frame_width: i32,
        frame_height: i32,
    ) -> Self {
        let mut x_min = f32::INFINITY;
        let mut y_min = f32::INFINITY;
        let mut x_max = f32::NEG_INFINITY;
        let mut y_max = f32::NEG_INFINITY;
        for &(x, y) in &landmarks {
            x_min = x_min.min(x);
            y_min = y_min.min(y);
            x_max = x_max.max(x);
            y_max = y_max.max(y);
        }

        #[allow(clippy::cast_precision_loss)]
        let (w, h) = (frame_width as f32, frame_height as f32);
        let x0 = f32_to_i32_clamp(x_min * w, 0, frame_width);
        let y0 = f32_to_i32_clamp(y_min * h, 0, frame_height);
        let x1 = f32_to_i32_clamp(x_max * w, 0, frame_width);
        let y1 = f32_to_i32_clamp(y_max * h, 0, frame_height);

        Self {
            landmarks,
            handedness,
            bbox: Rect::new(x0, y0, x1 - x0, y1 - y0),
        }
    }

    /// Normalized position of the index fingertip
    #[must_use]
    pub fn index_fingertip(&self) -> (f32, f32) {
        self.landmarks[crate::constants::INDEX_FINGER_TIP]
    }
}

/// Paths to the detector model artifacts
#[derive(Debug, Clone)]
pub struct DetectorModelPaths {
    pub palm: PathBuf,
    pub landmark_lite: PathBuf,
    pub landmark_full: PathBuf,
}

impl DetectorModelPaths {
    fn landmark_for(&self, complexity: ModelComplexity) -> &Path {
        match complexity {
            ModelComplexity::Lite => &self.landmark_lite,
            ModelComplexity::Full => &self.landmark_full,
        }
    }
}

/// Hand landmark detector facade
pub struct LandmarkDetector {
    settings: ModelSettings,
    defaults: ModelSettings,
    paths: DetectorModelPaths,
    palm: PalmDetector,
    landmark: HandLandmarkModel,
    generation: u64,
}

impl LandmarkDetector {
    /// Load both model sessions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for out-of-range settings
    /// and [`Error::ModelLoad`] if an artifact is missing or malformed
    pub fn new(paths: DetectorModelPaths, settings: ModelSettings) -> Result<Self> {
        settings.validate()?;
        let palm = PalmDetector::new(&paths.palm)?;
        let landmark = HandLandmarkModel::new(paths.landmark_for(settings.complexity))?;
        Ok(Self {
            settings,
            defaults: settings,
            paths,
            palm,
            landmark,
            generation: 0,
        })
    }

    /// Current detector parameters
    #[must_use]
    pub fn settings(&self) -> ModelSettings {
        self.settings
    }

    /// Construction-time parameter snapshot
    #[must_use]
    pub fn defaults(&self) -> ModelSettings {
        self.defaults
    }

    /// Number of completed session rebuilds
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Validate and apply new settings, rebuilding both sessions.
    ///
    /// The replacement sessions are loaded before the old ones are
    /// dropped, so a failed rebuild leaves the previous settings and
    /// sessions fully active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] or [`Error::ModelLoad`]
    pub fn apply_settings(&mut self, settings: ModelSettings) -> Result<()> {
        settings.validate()?;
        if settings == self.settings {
            return Ok(());
        }
        debug!("Rebuilding hand models for {settings:?}");
        let palm = PalmDetector::new(&self.paths.palm)?;
        let landmark = HandLandmarkModel::new(self.paths.landmark_for(settings.complexity))?;
        self.palm = palm;
        self.landmark = landmark;
        self.settings = settings;
        self.generation += 1;
        Ok(())
    }

    /// Set the palm detection threshold.
    ///
    /// # Errors
    ///
    /// See [`LandmarkDetector::apply_settings`]
    pub fn set_detection_confidence(&mut self, value: f32) -> Result<()> {
        self.apply_settings(ModelSettings {
            detection_confidence: value,
            ..self.settings
        })
    }

    /// Set the landmark presence threshold.
    ///
    /// # Errors
    ///
    /// See [`LandmarkDetector::apply_settings`]
    pub fn set_tracking_confidence(&mut self, value: f32) -> Result<()> {
        self.apply_settings(ModelSettings {
            tracking_confidence: value,
            ..self.settings
        })
    }

    /// Switch between the lite and full landmark models.
    ///
    /// # Errors
    ///
    /// See [`LandmarkDetector::apply_settings`]
    pub fn set_complexity(&mut self, complexity: ModelComplexity) -> Result<()> {
        self.apply_settings(ModelSettings {
            complexity,
            ..self.settings
        })
    }

    /// Cap the number of hands returned per frame.
    ///
    /// # Errors
    ///
    /// See [`LandmarkDetector::apply_settings`]
    pub fn set_max_hands(&mut self, max_hands: usize) -> Result<()> {
        self.apply_settings(ModelSettings {
            max_hands,
            ..self.settings
        })
    }

    /// Restore the construction-time settings.
    ///
    /// # Errors
    ///
    /// See [`LandmarkDetector::apply_settings`]
    pub fn reset(&mut self) -> Result<()> {
        self.apply_settings(self.defaults)
    }

    /// Detect hands in a BGR frame, drawing enabled overlays in place.
    ///
    /// `mirrored` is the capture flip flag: handedness labels are flipped
    /// when the frame shows the unmirrored camera view. Hand order follows
    /// model output order and carries no identity across ticks.
    ///
    /// # Errors
    ///
    /// Returns an error if color conversion or inference fails
    pub fn detect(
        &mut self,
        frame: &mut Mat,
        mirrored: bool,
        display: &DisplaySettings,
    ) -> Result<Vec<HandObservation>> {
        let mut rgb = Mat::default();
        imgproc::cvt_color(frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

        let frame_width = frame.cols();
        let frame_height = frame.rows();

        let regions = self.palm.detect(&rgb, self.settings.detection_confidence)?;
        let mut observations = Vec::new();

        for region in regions.into_iter().take(self.settings.max_hands) {
            let crop_rect = square_region(region, frame_width, frame_height, HAND_REGION_SHIFT);
            if crop_rect.width <= 0 || crop_rect.height <= 0 {
                continue;
            }
            let crop = Mat::roi(&rgb, crop_rect)?.try_clone()?;

            let Some((points, raw_handedness)) =
                self.landmark.regress(&crop, self.settings.tracking_confidence)?
            else {
                continue;
            };

            // Map crop-normalized points back to frame-normalized ones
            #[allow(clippy::cast_precision_loss)]
            let landmarks: Vec<(f32, f32)> = points
                .iter()
                .map(|&(x, y)| {
                    (
                        (crop_rect.x as f32 + x * crop_rect.width as f32) / frame_width as f32,
                        (crop_rect.y as f32 + y * crop_rect.height as f32) / frame_height as f32,
                    )
                })
                .collect();

            let handedness = if mirrored {
                raw_handedness
            } else {
                raw_handedness.mirrored()
            };

            observations.push(HandObservation::from_landmarks(
                landmarks,
                handedness,
                frame_width,
                frame_height,
            ));
        }

        self.draw_overlays(frame, &observations, display)?;
        Ok(observations)
    }

    fn draw_overlays(
        &self,
        frame: &mut Mat,
        observations: &[HandObservation],
        display: &DisplaySettings,
    ) -> Result<()> {
        let frame_width = frame.cols();
        let frame_height = frame.rows();

        for observation in observations {
            #[allow(clippy::cast_precision_loss)]
            let to_pixel = |&(x, y): &(f32, f32)| {
                Point::new(
                    f32_to_i32_clamp(x * frame_width as f32, 0, frame_width - 1),
                    f32_to_i32_clamp(y * frame_height as f32, 0, frame_height - 1),
                )
            };

            if display.landmarks {
                for &(from, to) in &HAND_CONNECTIONS {
                    imgproc::line(
                        frame,
                        to_pixel(&observation.landmarks[from]),
                        to_pixel(&observation.landmarks[to]),
                        bgr(LINE_COLOR),
                        display.line_thickness,
                        LINE_8,
                        0,
                    )?;
                }
                for landmark in &observation.landmarks {
                    imgproc::circle(
                        frame,
                        to_pixel(landmark),
                        display.point_radius,
                        bgr(POINT_COLOR),
                        display.point_thickness,
                        LINE_8,
                        0,
                    )?;
                }
            }

            if display.region {
                let bbox = observation.bbox;
                imgproc::rectangle(
                    frame,
                    Rect::new(
                        bbox.x - REGION_OFFSET,
                        bbox.y - REGION_OFFSET,
                        bbox.width + 2 * REGION_OFFSET,
                        bbox.height + 2 * REGION_OFFSET,
                    ),
                    bgr(REGION_COLOR),
                    display.region_thickness,
                    LINE_8,
                    0,
                )?;
            }

            if display.handedness {
                imgproc::put_text(
                    frame,
                    observation.handedness.as_str(),
                    Point::new(
                        observation.bbox.x - LABEL_OFFSET,
                        observation.bbox.y - LABEL_OFFSET,
                    ),
                    FONT_HERSHEY_PLAIN,
                    2.0,
                    bgr(LABEL_COLOR),
                    2,
                    LINE_8,
                    false,
                )?;
            }
        }
        Ok(())
    }
}

/// SSD-style palm proposal model
struct PalmDetector {
    session: Session,
    anchors: Vec<(f32, f32)>,
}

impl PalmDetector {
    fn new(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ModelLoad(format!(
                "palm detector model not found: {}",
                path.display()
            )));
        }
        info!("Loading palm detector from {}", path.display());
        let session = build_session("palm_detector", path)?;
        Ok(Self {
            session,
            anchors: generate_anchors(),
        })
    }

    /// Propose palm boxes in pixel space, best score first.
    fn detect(&self, rgb: &Mat, threshold: f32) -> Result<Vec<Rect>> {
        let frame_width = rgb.cols();
        let frame_height = rgb.rows();

        let inputs = preprocess(rgb, PALM_INPUT_SIZE, |pixel| {
            (pixel - IMAGE_NORMALIZATION_OFFSET) / IMAGE_NORMALIZATION_SCALE
        })?;

        let cow_array = CowArray::from(inputs.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;
        let outputs = self.session.run(vec![input_tensor])?;

        // Output 0: per-anchor box regressors [1, n, 4] in input pixels.
        // Output 1: per-anchor score logits [1, n, 1].
        let regressors_output = outputs
            .first()
            .ok_or_else(|| Error::ModelLoad("palm model produced no regressor output".to_string()))?
            .try_extract::<f32>()?;
        let regressors_view = regressors_output.view();
        let regressors = regressors_view
            .as_slice()
            .ok_or_else(|| Error::ModelLoad("palm regressor output is not contiguous".to_string()))?;

        let scores_output = outputs
            .get(1)
            .ok_or_else(|| Error::ModelLoad("palm model produced no score output".to_string()))?
            .try_extract::<f32>()?;
        let scores_view = scores_output.view();
        let scores = scores_view
            .as_slice()
            .ok_or_else(|| Error::ModelLoad("palm score output is not contiguous".to_string()))?;

        let count = self.anchors.len().min(scores.len()).min(regressors.len() / 4);

        #[allow(clippy::cast_precision_loss)]
        let input_size = PALM_INPUT_SIZE as f32;

        // Decode normalized center boxes anchored on the grid
        let mut candidates: Vec<(f32, [f32; 4])> = Vec::new();
        for i in 0..count {
            let score = sigmoid(scores[i]);
            if score < threshold {
                continue;
            }
            let (anchor_x, anchor_y) = self.anchors[i];
            let dx = regressors[i * 4] / input_size;
            let dy = regressors[i * 4 + 1] / input_size;
            let w = regressors[i * 4 + 2] / input_size;
            let h = regressors[i * 4 + 3] / input_size;
            let cx = anchor_x + dx;
            let cy = anchor_y + dy;
            candidates.push((score, [cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0]));
        }

        candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        let kept = suppress(&candidates, PALM_NMS_THRESHOLD);

        #[allow(clippy::cast_precision_loss)]
        let (w, h) = (frame_width as f32, frame_height as f32);
        Ok(kept
            .iter()
            .filter_map(|&[x0, y0, x1, y1]| {
                let px0 = f32_to_i32_clamp(x0 * w, 0, frame_width);
                let py0 = f32_to_i32_clamp(y0 * h, 0, frame_height);
                let px1 = f32_to_i32_clamp(x1 * w, 0, frame_width);
                let py1 = f32_to_i32_clamp(y1 * h, 0, frame_height);
                (px1 > px0 && py1 > py0).then(|| Rect::new(px0, py0, px1 - px0, py1 - py0))
            })
            .collect())
    }
}

/// Per-region landmark regressor
struct HandLandmarkModel {
    session: Session,
}

impl HandLandmarkModel {
    fn new(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ModelLoad(format!(
                "hand landmark model not found: {}",
                path.display()
            )));
        }
        info!("Loading hand landmark model from {}", path.display());
        let session = build_session("hand_landmarks", path)?;
        Ok(Self { session })
    }

    /// Regress 21 landmarks over a square hand crop.
    ///
    /// Output tensors: 63 floats (x, y, z per landmark in input pixels),
    /// a presence logit, and a handedness logit (positive = right hand).
    /// Returns `None` when presence falls below `presence_threshold`.
    fn regress(
        &self,
        crop: &Mat,
        presence_threshold: f32,
    ) -> Result<Option<(Vec<(f32, f32)>, Handedness)>> {
        let inputs = preprocess(crop, LANDMARK_INPUT_SIZE, |pixel| pixel / 255.0)?;

        let cow_array = CowArray::from(inputs.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;
        let outputs = self.session.run(vec![input_tensor])?;

        let landmarks_output = outputs
            .first()
            .ok_or_else(|| Error::ModelLoad("landmark model produced no output".to_string()))?
            .try_extract::<f32>()?;
        let landmarks_view = landmarks_output.view();
        let raw = landmarks_view
            .as_slice()
            .ok_or_else(|| Error::ModelLoad("landmark output is not contiguous".to_string()))?;
        if raw.len() < NUM_HAND_LANDMARKS * 3 {
            return Err(Error::ModelLoad(format!(
                "landmark output too short: {} values",
                raw.len()
            )));
        }

        let presence_logit = {
            let tensor = outputs
                .get(1)
                .ok_or_else(|| Error::ModelLoad("model produced no presence output".to_string()))?
                .try_extract::<f32>()?;
            let view = tensor.view();
            view.iter()
                .next()
                .copied()
                .ok_or_else(|| Error::ModelLoad("presence output is empty".to_string()))?
        };
        if sigmoid(presence_logit) < presence_threshold {
            return Ok(None);
        }

        let handedness_logit = {
            let tensor = outputs
                .get(2)
                .ok_or_else(|| Error::ModelLoad("model produced no handedness output".to_string()))?
                .try_extract::<f32>()?;
            let view = tensor.view();
            view.iter()
                .next()
                .copied()
                .ok_or_else(|| Error::ModelLoad("handedness output is empty".to_string()))?
        };
        let handedness = if sigmoid(handedness_logit) > 0.5 {
            Handedness::Right
        } else {
            Handedness::Left
        };

        #[allow(clippy::cast_precision_loss)]
        let input_size = LANDMARK_INPUT_SIZE as f32;
        let points = (0..NUM_HAND_LANDMARKS)
            .map(|i| (raw[i * 3] / input_size, raw[i * 3 + 1] / input_size))
            .collect();

        Ok(Some((points, handedness)))
    }
}

fn build_session(name: &str, path: &Path) -> Result<Session> {
    let environment = Arc::new(
        Environment::builder()
            .with_name(name)
            .with_log_level(LoggingLevel::Warning)
            .build()?,
    );
    SessionBuilder::new(&environment)?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_model_from_file(path)
        .map_err(|e| Error::ModelLoad(format!("{}: {e}", path.display())))
}

/// Resize a RGB image and pack it as a normalized NCHW tensor.
fn preprocess(rgb: &Mat, input_size: i32, normalize: impl Fn(f32) -> f32) -> Result<Array4<f32>> {
    let mut resized = Mat::default();
    imgproc::resize(
        rgb,
        &mut resized,
        Size::new(input_size, input_size),
        0.0,
        0.0,
        InterpolationFlags::INTER_LINEAR as i32,
    )?;

    let mut float_image = Mat::default();
    resized.convert_to(&mut float_image, CV_32F, 1.0, 0.0)?;

    #[allow(clippy::cast_sign_loss)]
    let size = input_size as usize;
    let channels = 3usize;
    let mut data = vec![0.0f32; size * size * channels];

    for row in 0..size {
        for col in 0..size {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let pixel = float_image.at_2d::<opencv::core::Vec3f>(row as i32, col as i32)?;
            for ch in 0..channels {
                // NCHW layout: channel-major planes
                data[ch * size * size + row * size + col] = normalize(pixel[ch]);
            }
        }
    }

    Array4::from_shape_vec((1, channels, size, size), data)
        .map_err(|e| Error::ModelLoad(format!("failed to shape input tensor: {e}")))
}

fn sigmoid(value: f32) -> f32 {
    1.0 / (1.0 + (-value).exp())
}

/// Anchor centers for the palm detector grid, normalized to [0, 1].
/// Two anchors per cell at strides 8 and 16 over the model input.
fn generate_anchors() -> Vec<(f32, f32)> {
    let mut anchors = Vec::new();
    for stride in [8, 16] {
        let cells = PALM_INPUT_SIZE / stride;
        for y in 0..cells {
            for x in 0..cells {
                #[allow(clippy::cast_precision_loss)]
                let center = (
                    (x as f32 + 0.5) * stride as f32 / PALM_INPUT_SIZE as f32,
                    (y as f32 + 0.5) * stride as f32 / PALM_INPUT_SIZE as f32,
                );
                anchors.push(center);
                anchors.push(center);
            }
        }
    }
    anchors
}

/// Greedy non-maximum suppression over score-sorted corner boxes.
fn suppress(candidates: &[(f32, [f32; 4])], iou_threshold: f32) -> Vec<[f32; 4]> {
    let mut kept: Vec<[f32; 4]> = Vec::new();
    for &(_, bbox) in candidates {
        if kept.iter().all(|other| iou(bbox, *other) <= iou_threshold) {
            kept.push(bbox);
        }
    }
    kept
}

fn iou(a: [f32; 4], b: [f32; 4]) -> f32 {
    let x0 = a[0].max(b[0]);
    let y0 = a[1].max(b[1]);
    let x1 = a[2].min(b[2]);
    let y1 = a[3].min(b[3]);

    let intersection = (x1 - x0).max(0.0) * (y1 - y0).max(0.0);
    let area_a = (a[2] - a[0]).max(0.0) * (a[3] - a[1]).max(0.0);
    let area_b = (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0);
    let union = area_a + area_b - intersection;
    if union <= 0.0 {
        return 0.0;
    }
    intersection / union
}
