//! imgpress WASM - WebAssembly bindings for imgpress
//!
//! This crate exposes the imgpress-core recompression pipeline to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `compressor` - Stateful `Compressor` with generation-tagged delivery
//! - `compress` - One-shot `compressImage`
//! - `stats` - Size and quality display helpers
//! - `types` - WASM-compatible wrapper for recompression results
//!
//! # Usage
//!
//! ```typescript
//! import init, { Compressor, formatSize } from '@imgpress/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const compressor = new Compressor();
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = await compressor.selectSource(bytes, file.type, file.name);
//! if (result) {
//!   console.log(`${formatSize(bytes.length)} -> ${formatSize(result.byteSize)}`);
//! }
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod compressor;
mod stats;
mod types;

// Re-export public types
pub use compress::compress_image;
pub use compressor::JsCompressor;
pub use stats::{format_size, quality_label, savings_percent, suggested_file_name};
pub use types::JsRecompressionResult;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
