//! JPEG and data-URI encoding for the streamed preview frame.

use crate::Result;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use opencv::core::{Mat, Vector};
use opencv::imgcodecs;

/// Encode a BGR frame as JPEG bytes.
///
/// # Errors
///
/// Returns an error if the frame cannot be encoded
pub fn encode_jpeg(frame: &Mat) -> Result<Vec<u8>> {
    let mut buffer = Vector::<u8>::new();
    imgcodecs::imencode(".jpg", frame, &mut buffer, &Vector::new())?;
    Ok(buffer.to_vec())
}

/// Wrap JPEG bytes as a data URI suitable for an image element source.
#[must_use]
pub fn to_data_uri(jpeg: &[u8]) -> String {
    format!("data:image/jpg;base64,{}", BASE64.encode(jpeg))
}
