//! The user-supplied original image.

use std::path::Path;

use thiserror::Error;

use crate::encode::data_url;

/// Name used when the original file name gives nothing usable.
const FALLBACK_BASE_NAME: &str = "image";

/// Reasons a selection is rejected before it reaches the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Not an image: declared type is {0:?}")]
    NotAnImage(String),

    #[error("Source file is empty")]
    Empty,
}

/// Immutable handle to the original bytes and what the picker told us about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    bytes: Vec<u8>,
    mime: String,
    file_name: String,
}

impl SourceImage {
    /// Accept a selection whose declared MIME type starts with `image/`.
    pub fn new(
        bytes: Vec<u8>,
        mime: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let mime = mime.into();
        if !is_image_mime(&mime) {
            return Err(SourceError::NotAnImage(mime));
        }
        if bytes.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(Self {
            bytes,
            mime,
            file_name: file_name.into(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// The original as a `data:` URL, for showing it next to the recompressed variant.
    pub fn preview_string(&self) -> String {
        data_url(&self.mime, &self.bytes)
    }

    /// File name without its last extension or any directory part.
    pub fn base_name(&self) -> String {
        let stem = Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(FALLBACK_BASE_NAME);
        stem.chars()
            .map(|ch| if ch == '/' || ch == '\\' { '_' } else { ch })
            .collect()
    }
}

/// True when a declared MIME type names an image.
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}
