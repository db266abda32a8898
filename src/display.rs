//! Overlay display settings.
//!
//! These toggles and stroke styles control what gets drawn onto the
//! captured frame. They are cosmetic only: control mapping ignores them.

use crate::constants::{
    DEFAULT_LINE_THICKNESS, DEFAULT_POINT_RADIUS, DEFAULT_POINT_THICKNESS, DEFAULT_REGION_THICKNESS,
};

/// Per-frame overlay configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Draw per-landmark point markers and skeleton lines
    pub landmarks: bool,
    /// Draw the hand-region bounding box
    pub region: bool,
    /// Draw the handedness label above the hand
    pub handedness: bool,
    /// Draw the classified gesture label above the hand
    pub gesture: bool,
    /// Radius of landmark point markers
    pub point_radius: i32,
    /// Stroke width of landmark point markers
    pub point_thickness: i32,
    /// Stroke width of skeleton lines
    pub line_thickness: i32,
    /// Stroke width of the hand-region box
    pub region_thickness: i32,
}

impl Default for DisplaySettings {
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
