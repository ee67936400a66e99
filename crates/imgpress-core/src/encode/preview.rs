//! Inline preview strings for encoded buffers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Render `bytes` as a `data:` URL that can be used directly as an image source.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
