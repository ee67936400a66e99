//! Display helpers for sizes and quality.
//!
//! # Functions
//!
//! - [`format_size`] - Human-readable byte count
//! - [`savings_percent`] - Relative reduction from original to compressed
//! - [`quality_label`] - "Low Quality", "Medium Quality" or "High Quality"
//! - [`suggested_file_name`] - Download name for a given base name and quality

use imgpress_core::{stats, QualityFactor};
use wasm_bindgen::prelude::*;

/// Format a byte count, e.g. `1536` becomes `"1.5 KB"`.
///
/// JavaScript numbers arrive as `f64`; negative or fractional values are
/// truncated toward zero.
#[wasm_bindgen(js_name = formatSize)]
pub fn format_size(bytes: f64) -> String {
    stats::format_size(bytes.max(0.0) as u64)
}

/// Percentage saved, or `undefined` when either size is zero.
#[wasm_bindgen(js_name = savingsPercent)]
pub fn savings_percent(original: f64, compressed: f64) -> Option<f64> {
    stats::savings_percent(original.max(0.0) as u64, compressed.max(0.0) as u64)
}

/// Label for a quality factor, or `undefined` outside (0, 1].
#[wasm_bindgen(js_name = qualityLabel)]
pub fn quality_label(quality: f32) -> Option<String> {
    QualityFactor::new(quality)
        .ok()
        .map(|q| q.label().as_str().to_string())
}

#[wasm_bindgen(js_name = suggestedFileName)]
pub fn suggested_file_name(base_name: &str, quality: f32) -> Option<String> {
    let quality = QualityFactor::new(quality).ok()?;
    Some(imgpress_core::suggested_file_name(base_name, quality))
}
