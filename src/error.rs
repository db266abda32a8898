//! Error types for the gesture control library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Capture device could not be opened at the requested index
    #[error("capture device {index} unavailable")]
    DeviceUnavailable {
        /// Index passed to the capture backend
        index: i32,
    },

    /// Live device produced no frame this tick
    #[error("timed out waiting for a camera frame")]
    CaptureTimeout,

    /// Video source has no more frames
    #[error("end of video stream")]
    EndOfStream,

    /// Setter received an out-of-contract value; nothing was mutated
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Classifier predicted an id with no label table entry
    #[error("no label table entry for class id {0}")]
    UnknownLabel(i64),

    /// Malformed model or label upload; the prior artifact stays active
    #[error("model load error: {0}")]
    ModelLoad(String),

    /// `OpenCV` operation failed
    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),

    /// `ONNX` Runtime inference failed
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::OrtError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Cursor backend operation failed
    #[error("cursor control error: {0}")]
    CursorControl(String),

    /// Configuration file error
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid input parameters provided
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Broken internal invariant (poisoned lock, impossible state)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
