//! Cursor control mapping stage.
//!
//! Interprets classified gestures as cursor commands. The index fingertip
//! of the first hand holding the move gesture steers the pointer through a
//! linear remap of the active capture sub-rectangle onto the full screen;
//! the click gesture fires one click per detecting tick. No smoothing is
//! applied beyond the remap, so some jitter is expected.

use crate::classifier::Gesture;
use crate::constants::{
    ACTIVE_REGION_COLOR, DEFAULT_CLICK_CLASS_ID, DEFAULT_FRAME_REDUCTION, DEFAULT_MOVE_CLASS_ID,
    FINGERTIP_COLOR,
};
use crate::detector::HandObservation;
use crate::error::{Error, Result};
use crate::pointer::PointerDevice;
use crate::utils::{bgr, interp, safe_cast::f64_to_i32};
use log::debug;
use opencv::core::{Mat, Point, Rect};
use opencv::imgproc::{self, LINE_8};
use opencv::prelude::*;

/// Cursor mapping parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSettings {
    /// Pixel margin of the active capture sub-rectangle
    pub frame_reduction: i32,
    /// Master switch; everything is a no-op while false
    pub activated: bool,
    /// Class id that steers the cursor
    pub move_class: i64,
    /// Class id that fires a click
    pub click_class: i64,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            frame_reduction: DEFAULT_FRAME_REDUCTION,
            activated: false,
            move_class: DEFAULT_MOVE_CLASS_ID,
            click_class: DEFAULT_CLICK_CLASS_ID,
        }
    }
}

impl ControlSettings {
    /// Check every field against its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a negative margin
    pub fn validate(&self) -> Result<()> {
        if self.frame_reduction < 0 {
            return Err(Error::InvalidConfiguration(format!(
                "frame reduction must be non-negative, got {}",
                self.frame_reduction
            )));
        }
        Ok(())
    }
}

/// Gesture-to-cursor mapper
pub struct ControlMapper {
    settings: ControlSettings,
    defaults: ControlSettings,
    pointer: Box<dyn PointerDevice + Send>,
}

impl ControlMapper {
    /// Wrap a pointer backend with the given initial settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for out-of-range settings
    pub fn new(pointer: Box<dyn PointerDevice + Send>, settings: ControlSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            defaults: settings,
            pointer,
        })
    }

    /// Current mapping parameters
    #[must_use]
    pub fn settings(&self) -> ControlSettings {
        self.settings
    }

    /// Set the pixel margin of the active sub-rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for negative values; the
    /// previous margin stays in effect
    pub fn set_frame_reduction(&mut self, value: i32) -> Result<()> {
        let candidate = ControlSettings {
            frame_reduction: value,
            ..self.settings
        };
        candidate.validate()?;
        self.settings = candidate;
        Ok(())
    }

    /// Enable or disable cursor control
    pub fn set_activated(&mut self, activated: bool) {
        debug!("Cursor control {}", if activated { "activated" } else { "deactivated" });
        self.settings.activated = activated;
    }

    /// Restore the construction-time settings
    pub fn reset(&mut self) {
        self.settings = self.defaults;
    }

    /// Map classified hands to cursor commands, annotating the frame.
    ///
    /// The first hand holding the move gesture steers the pointer; any
    /// hand holding the click gesture fires exactly one click this tick.
    /// Holding the click gesture across ticks clicks repeatedly. Does
    /// nothing while deactivated.
    ///
    /// # Errors
    ///
    /// Returns an error if a cursor command or overlay drawing fails
    pub fn apply(
        &mut self,
        frame: &mut Mat,
        hands: &[(HandObservation, Gesture)],
        flip: bool,
    ) -> Result<()> {
        if !self.settings.activated {
            return Ok(());
        }

        let frame_width = frame.cols();
        let frame_height = frame.rows();
        let (screen_width, screen_height) = self.pointer.screen_size();
        let reduction = f64::from(self.settings.frame_reduction);

        if let Some((hand, _)) = hands.iter().find(|(_, gesture)| gesture.id == self.settings.move_class) {
            let (tip_x_norm, tip_y_norm) = hand.index_fingertip();
            let tip_x = f64::from(tip_x_norm) * f64::from(frame_width);
            let tip_y = f64::from(tip_y_norm) * f64::from(frame_height);

            let mapped_x = interp(
                tip_x,
                (reduction, f64::from(frame_width) - reduction),
                (0.0, f64::from(screen_width)),
            );
            let mapped_y = interp(
                tip_y,
                (reduction, f64::from(frame_height) - reduction),
                (0.0, f64::from(screen_height)),
            );

            // An unmirrored camera view moves opposite to the user's hand,
            // so mirror x unless the capture flip already did
            let target_x = if flip {
                mapped_x
            } else {
                f64::from(screen_width) - mapped_x
            };

            #[allow(clippy::cast_possible_truncation)]
            let x = f64_to_i32(target_x)?.clamp(0, i32::from(i16::MAX)) as i16;
            #[allow(clippy::cast_possible_truncation)]
            let y = f64_to_i32(mapped_y)?.clamp(0, i32::from(i16::MAX)) as i16;
            self.pointer.move_to(x, y)?;

            imgproc::circle(
                frame,
                Point::new(f64_to_i32(tip_x)?, f64_to_i32(tip_y)?),
                5,
                bgr(FINGERTIP_COLOR),
                2,
                LINE_8,
                0,
            )?;
            imgproc::rectangle(
                frame,
                Rect::new(
                    self.settings.frame_reduction,
                    self.settings.frame_reduction,
                    frame_width - 2 * self.settings.frame_reduction,
                    frame_height - 2 * self.settings.frame_reduction,
                ),
                bgr(ACTIVE_REGION_COLOR),
                2,
                LINE_8,
                0,
            )?;
        }

        if hands.iter().any(|(_, gesture)| gesture.id == self.settings.click_class) {
            // One click per tick the gesture is seen; no debounce
            self.pointer.click()?;
        }

        Ok(())
    }
}
