//! Encoder stage of the recompression pipeline.
//!
//! Serializes a composited image into a JPEG buffer at a caller-supplied
//! quality factor and derives a self-contained preview string from the same
//! bytes, so the result can be displayed without another fetch.

mod jpeg;
mod preview;

pub use jpeg::{encode_jpeg, encode_rgb, EncodeError, EXTENSION, MIME_TYPE};
pub use preview::data_url;

use image::RgbImage;

use crate::quality::QualityFactor;

/// An encoded buffer and its inline preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub buffer: Vec<u8>,
    pub preview: String,
}

impl Encoded {
    /// Wrap encoder output, deriving the preview string.
    ///
    /// An empty buffer is a hard failure.
    pub fn from_buffer(buffer: Vec<u8>) -> Result<Self, EncodeError> {
        if buffer.is_empty() {
            return Err(EncodeError::EmptyOutput);
        }
        let preview = data_url(MIME_TYPE, &buffer);
        Ok(Self { buffer, preview })
    }
}

/// Encode `image` and build its preview in one step.
pub fn encode(image: &RgbImage, quality: QualityFactor) -> Result<Encoded, EncodeError> {
    Encoded::from_buffer(encode_rgb(image, quality)?)
}
