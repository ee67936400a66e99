//! One-shot recompression binding.
//!
//! For callers that manage their own request ordering. No generation
//! tracking happens here; use `Compressor` for interactive quality control.
//!
//! # Example
//!
//! ```typescript
//! import { compressImage } from '@imgpress/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = await compressImage(bytes, file.type, 0.7);
//! console.log(`${result.width}x${result.height}, ${result.byteSize} bytes`);
//! ```

use imgpress_core::{CompressorConfig, Pipeline, QualityFactor, SourceImage};
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::types::JsRecompressionResult;

/// Recompress `bytes` at `quality` with the default configuration.
///
/// # Errors
///
/// Throws synchronously if `mime` is not an image type, `bytes` is empty or
/// `quality` lies outside (0, 1]. The returned promise rejects if decoding
/// or encoding fails.
#[wasm_bindgen(js_name = compressImage)]
pub fn compress_image(bytes: Vec<u8>, mime: String, quality: f32) -> Result<Promise, JsValue> {
    let quality = QualityFactor::new(quality).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let source =
        SourceImage::new(bytes, mime, String::new()).map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(future_to_promise(async move {
        let pipeline = Pipeline::host(CompressorConfig::default());
        let result = pipeline
            .run(&source, quality)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(JsRecompressionResult::from(result).into())
    }))
}
