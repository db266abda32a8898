//! Gesture classification stage.
//!
//! Normalizes a hand observation into a translation-invariant feature
//! vector, feeds it through the loaded gesture model and resolves the
//! predicted class id against the label table. Model and table uploads
//! parse fully into a new value before replacing the active one, so a
//! malformed upload never leaves the classifier half-updated.

use crate::constants::{FEATURE_VECTOR_LEN, LABEL_COLOR, LABEL_OFFSET};
use crate::detector::HandObservation;
use crate::display::DisplaySettings;
use crate::error::{Error, Result};
use crate::utils::bgr;
use log::info;
use ndarray::{Array2, CowArray};
use opencv::core::{Mat, Point};
use opencv::imgproc::{self, FONT_HERSHEY_PLAIN, LINE_8};
use ort::{Environment, GraphOptimizationLevel, LoggingLevel, Session, SessionBuilder, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Mapping from model class ids to display strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    entries: BTreeMap<i64, String>,
}

impl LabelTable {
    /// Parse `"<int> <label>"` lines, skipping blank ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`] naming the first malformed line, or
    /// if the table ends up empty
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (line_number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(2, char::is_whitespace);
            let id = parts
                .next()
                .and_then(|field| field.parse::<i64>().ok())
                .ok_or_else(|| {
                    Error::ModelLoad(format!("label file line {}: expected an integer id", line_number + 1))
                })?;
            let name = parts
                .next()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    Error::ModelLoad(format!("label file line {}: missing label text", line_number + 1))
                })?;
            entries.insert(id, name.to_string());
        }
        if entries.is_empty() {
            return Err(Error::ModelLoad("label file has no entries".to_string()));
        }
        Ok(Self { entries })
    }

    /// Parse a label table from a file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error or [`Error::ModelLoad`] for malformed content
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Display string for a class id, if present
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    /// Display string for a class id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownLabel`] when the id has no entry
    pub fn resolve(&self, id: i64) -> Result<&str> {
        self.get(id).ok_or(Error::UnknownLabel(id))
    }

    /// Number of entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classified gesture for one hand, valid for the current tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gesture {
    /// Model class id
    pub id: i64,
    /// Display string from the label table
    pub name: String,
}

/// Opaque prediction model: feature vector in, class id out
struct GestureModel {
    session: Session,
}

impl GestureModel {
    fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ModelLoad(format!(
                "gesture model not found: {}",
                path.display()
            )));
        }
        info!("Loading gesture model from {}", path.display());
        let environment = Arc::new(
            Environment::builder()
                .with_name("gesture_classifier")
                .with_log_level(LoggingLevel::Warning)
                .build()?,
        );
        let session = SessionBuilder::new(&environment)?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_model_from_file(path)
            .map_err(|e| Error::ModelLoad(format!("{}: {e}", path.display())))?;
        Ok(Self { session })
    }

    /// Predict a class id from a feature vector. The model output is a
    /// score row; the highest-scoring index is the class id.
    fn predict(&self, features: &[f32]) -> Result<i64> {
        let array = Array2::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| Error::ModelLoad(format!("failed to shape feature vector: {e}")))?;
        let cow_array = CowArray::from(array.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;
        let outputs = self.session.run(vec![input_tensor])?;

        let scores_output = outputs
            .first()
            .ok_or_else(|| Error::ModelLoad("gesture model produced no output".to_string()))?
            .try_extract::<f32>()?;
        let scores_view = scores_output.view();
        let scores = scores_view
            .as_slice()
            .ok_or_else(|| Error::ModelLoad("gesture model output is not contiguous".to_string()))?;

        argmax(scores).ok_or_else(|| Error::ModelLoad("gesture model output is empty".to_string()))
    }
}

/// Gesture classifier over hand observations
pub struct GestureClassifier {
    model: GestureModel,
    labels: LabelTable,
}

impl GestureClassifier {
    /// Load the gesture model and label table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`] for missing or malformed artifacts
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(model_path: P, labels_path: Q) -> Result<Self> {
        Ok(Self {
            model: GestureModel::load(model_path.as_ref())?,
            labels: LabelTable::from_file(labels_path)?,
        })
    }

    /// Replace the prediction model. The previous model stays active if
    /// the load fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`]
    pub fn load_model<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.model = GestureModel::load(path.as_ref())?;
        Ok(())
    }

    /// Replace the label table. The previous table stays active if the
    /// upload fails to parse.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`]
    pub fn load_labels<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.labels = LabelTable::from_file(path)?;
        Ok(())
    }

    /// Active label table
    #[must_use]
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Flatten an observation into its translation-invariant feature
    /// vector: every landmark shifted so the minimum x and y become zero.
    /// Scale and rotation still matter to the downstream model.
    #[must_use]
    pub fn features(observation: &HandObservation) -> Vec<f32> {
        let min_x = observation
            .landmarks
            .iter()
            .map(|&(x, _)| x)
            .fold(f32::INFINITY, f32::min);
        let min_y = observation
            .landmarks
            .iter()
            .map(|&(_, y)| y)
            .fold(f32::INFINITY, f32::min);

        let mut features = Vec::with_capacity(FEATURE_VECTOR_LEN);
        for &(x, y) in &observation.landmarks {
            features.push(x - min_x);
            features.push(y - min_y);
        }
        features
    }

    /// Classify one hand observation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownLabel`] when the predicted id has no table
    /// entry, or a model error if inference fails
    pub fn classify(&self, observation: &HandObservation) -> Result<Gesture> {
        let features = Self::features(observation);
        let id = self.model.predict(&features)?;
        let name = self.labels.resolve(id)?.to_string();
        Ok(Gesture { id, name })
    }

    /// Draw the gesture label near the hand when enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if text rendering fails
    pub fn annotate(
        &self,
        frame: &mut Mat,
        observation: &HandObservation,
        gesture: &Gesture,
        display: &DisplaySettings,
    ) -> Result<()> {
        if !display.gesture {
            return Ok(());
        }
        imgproc::put_text(
            frame,
            &gesture.name,
            Point::new(
                observation.bbox.x + LABEL_OFFSET,
                observation.bbox.y - LABEL_OFFSET,
            ),
            FONT_HERSHEY_PLAIN,
            2.0,
            bgr(LABEL_COLOR),
            2,
            LINE_8,
            false,
        )?;
        Ok(())
    }
}

fn argmax(scores: &[f32]) -> Option<i64> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }
    #[allow(clippy::cast_possible_wrap)]
    best.map(|(index, _)| index as i64)
}
