//! Gesture mouse library for camera-driven cursor control.
//!
//! This library turns a live camera feed into cursor control using:
//! - `OpenCV` for capture, drawing and frame encoding
//! - ONNX Runtime for hand landmark detection and gesture classification
//! - X11 for cursor movement and click injection
//!
//! Each display tick runs one synchronous pass:
//! 1. Capture a frame (optionally mirrored)
//! 2. Detect hand landmarks and handedness
//! 3. Classify each hand's pose into a gesture label
//! 4. Map the move/click gestures to cursor commands
//!
//! # Examples
//!
//! ```no_run
//! use gesture_mouse::{config::Config, pipeline::Pipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_file("config.yaml")?;
//! let pipeline = Pipeline::from_config(&config)?;
//!
//! // One pass per display tick; the result embeds directly in an <img>
//! let frame_uri = pipeline.tick_data_uri()?;
//! println!("{}", &frame_uri[..32]);
//!
//! // Settings are hot-swappable between ticks
//! pipeline.set_activated(true)?;
//! pipeline.set_frame_reduction(120)?;
//! # Ok(())
//! # }
//! ```

/// Camera capture stage
pub mod capture;

/// Gesture classification stage
pub mod classifier;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Cursor control mapping stage
pub mod control;

/// Hand landmark detection stage
pub mod detector;

/// Overlay display settings
pub mod display;

/// Error types and result handling
pub mod error;

/// Pipeline orchestration
pub mod pipeline;

/// OS cursor backend
pub mod pointer;

/// Coordinate remapping, casting and encoding utilities
pub mod utils;

pub use error::{Error, Result};
