//! Camera capture stage.
//!
//! Owns the `OpenCV` capture handle and the six adjustable device
//! parameters. The parameter values read from the device at open time are
//! the snapshot that `reset()` restores.

use crate::error::{Error, Result};
use log::{debug, info};
use opencv::core::{self, Mat};
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

/// Capture parameters adjustable on a live device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSettings {
    pub brightness: f64,
    pub contrast: f64,
    pub hue: f64,
    pub saturation: f64,
    pub sharpness: f64,
    pub gamma: f64,
    /// Mirror captured frames horizontally
    pub flip: bool,
}

impl CaptureSettings {
    /// Value of one device parameter
    #[must_use]
    pub fn get(&self, parameter: CaptureParameter) -> f64 {
        match parameter {
            CaptureParameter::Brightness => self.brightness,
            CaptureParameter::Contrast => self.contrast,
            CaptureParameter::Hue => self.hue,
            CaptureParameter::Saturation => self.saturation,
            CaptureParameter::Sharpness => self.sharpness,
            CaptureParameter::Gamma => self.gamma,
        }
    }

    fn set(&mut self, parameter: CaptureParameter, value: f64) {
        match parameter {
            CaptureParameter::Brightness => self.brightness = value,
            CaptureParameter::Contrast => self.contrast = value,
            CaptureParameter::Hue => self.hue = value,
            CaptureParameter::Saturation => self.saturation = value,
            CaptureParameter::Sharpness => self.sharpness = value,
            CaptureParameter::Gamma => self.gamma = value,
        }
    }
}

/// One of the six adjustable device parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureParameter {
    Brightness,
    Contrast,
    Hue,
    Saturation,
    Sharpness,
    Gamma,
}

impl CaptureParameter {
    /// Every adjustable parameter, in snapshot/restore order
    pub const ALL: [Self; 6] = [
        Self::Brightness,
        Self::Contrast,
        Self::Hue,
        Self::Saturation,
        Self::Sharpness,
        Self::Gamma,
    ];

    const fn property(self) -> i32 {
        match self {
            Self::Brightness => videoio::CAP_PROP_BRIGHTNESS,
            Self::Contrast => videoio::CAP_PROP_CONTRAST,
            Self::Hue => videoio::CAP_PROP_HUE,
            Self::Saturation => videoio::CAP_PROP_SATURATION,
            Self::Sharpness => videoio::CAP_PROP_SHARPNESS,
            Self::Gamma => videoio::CAP_PROP_GAMMA,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Sharpness => "sharpness",
            Self::Gamma => "gamma",
        }
    }
}

/// Frame source over a camera device
pub struct FrameSource {
    device: VideoCapture,
    index: i32,
    settings: CaptureSettings,
    defaults: CaptureSettings,
    frame_width: i32,
    frame_height: i32,
}

impl FrameSource {
    /// Open the capture device at `index` and snapshot its parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnavailable`] if the device cannot be opened
    pub fn open(index: i32) -> Result<Self> {
        info!("Opening capture device {index}");
        let mut device =
            VideoCapture::new(index, videoio::CAP_ANY).map_err(|_| Error::DeviceUnavailable { index })?;
        if !device.is_opened()? {
            return Err(Error::DeviceUnavailable { index });
        }

        // Keep at most one buffered frame for low latency
        device.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        let defaults = Self::read_device_settings(&device)?;

        #[allow(clippy::cast_possible_truncation)]
        let frame_width = device.get(videoio::CAP_PROP_FRAME_WIDTH)? as i32;
        #[allow(clippy::cast_possible_truncation)]
        let frame_height = device.get(videoio::CAP_PROP_FRAME_HEIGHT)? as i32;
        info!("Capture device {index} open at {frame_width}x{frame_height}");

        Ok(Self {
            device,
            index,
            settings: defaults,
            defaults,
            frame_width,
            frame_height,
        })
    }

    fn read_device_settings(device: &VideoCapture) -> Result<CaptureSettings> {
        Ok(CaptureSettings {
            brightness: device.get(videoio::CAP_PROP_BRIGHTNESS)?,
            contrast: device.get(videoio::CAP_PROP_CONTRAST)?,
            hue: device.get(videoio::CAP_PROP_HUE)?,
            saturation: device.get(videoio::CAP_PROP_SATURATION)?,
            sharpness: device.get(videoio::CAP_PROP_SHARPNESS)?,
            gamma: device.get(videoio::CAP_PROP_GAMMA)?,
            flip: false,
        })
    }

    /// Read the next frame, mirrored when flip is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndOfStream`] when a file source is exhausted and
    /// [`Error::CaptureTimeout`] when a live device yields no frame
    pub fn capture(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        let grabbed = self.device.read(&mut frame)?;
        if !grabbed || frame.empty() {
            // A file source reports its frame count; a live device reports zero
            let total_frames = self.device.get(videoio::CAP_PROP_FRAME_COUNT).unwrap_or(0.0);
            return Err(if total_frames > 0.0 {
                Error::EndOfStream
            } else {
                Error::CaptureTimeout
            });
        }

        if self.settings.flip {
            let mut mirrored = Mat::default();
            core::flip(&frame, &mut mirrored, 1)?;
            return Ok(mirrored);
        }
        Ok(frame)
    }

    /// Current value of one device parameter
    #[must_use]
    pub fn get(&self, parameter: CaptureParameter) -> f64 {
        self.settings.get(parameter)
    }

    /// Write one device parameter, caching the value for `get`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for non-finite values; the
    /// device and cache are untouched on failure
    pub fn set(&mut self, parameter: CaptureParameter, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "capture {} must be finite, got {value}",
                parameter.name()
            )));
        }
        debug!("Setting capture {} to {value}", parameter.name());
        self.device.set(parameter.property(), value)?;
        self.settings.set(parameter, value);
        Ok(())
    }

    /// Whether captured frames are mirrored
    #[must_use]
    pub fn flip(&self) -> bool {
        self.settings.flip
    }

    /// Enable or disable horizontal mirroring
    pub fn set_flip(&mut self, flip: bool) {
        self.settings.flip = flip;
    }

    /// Write the open-time parameter snapshot back to the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the device rejects a parameter write
    pub fn reset(&mut self) -> Result<()> {
        debug!("Restoring capture defaults on device {}", self.index);
        for parameter in CaptureParameter::ALL {
            self.device.set(parameter.property(), self.defaults.get(parameter))?;
        }
        self.settings = self.defaults;
        Ok(())
    }

    /// Restore the current device, then reopen at `index` with a fresh
    /// parameter snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnavailable`] if the new device cannot be
    /// opened; the old device keeps its restored state in that case
    pub fn switch(&mut self, index: i32) -> Result<()> {
        self.reset()?;
        *self = Self::open(index)?;
        Ok(())
    }

    /// Device index this source was opened at
    #[must_use]
    pub fn index(&self) -> i32 {
        self.index
    }

    /// Current parameter values including the flip flag
    #[must_use]
    pub fn settings(&self) -> CaptureSettings {
        self.settings
    }

    /// Open-time parameter snapshot
    #[must_use]
    pub fn defaults(&self) -> CaptureSettings {
        self.defaults
    }

    /// Native frame width in pixels
    #[must_use]
    pub fn frame_width(&self) -> i32 {
        self.frame_width
    }

    /// Native frame height in pixels
    #[must_use]
    pub fn frame_height(&self) -> i32 {
        self.frame_height
    }
}
