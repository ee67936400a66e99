//! WASM-compatible wrapper types for recompression output.

use std::rc::Rc;

use imgpress_core::RecompressionResult;
use wasm_bindgen::prelude::*;

/// One published recompression result.
///
/// The result is shared with the compressor, so holding on to it costs no
/// copy. `encodedBuffer` copies the bytes into JavaScript memory on each call.
#[wasm_bindgen(js_name = RecompressionResult)]
#[derive(Debug, Clone)]
pub struct JsRecompressionResult {
    inner: Rc<RecompressionResult>,
}

#[wasm_bindgen(js_class = RecompressionResult)]
impl JsRecompressionResult {
    /// JPEG bytes as a `Uint8Array`.
    #[wasm_bindgen(getter, js_name = encodedBuffer)]
    pub fn encoded_buffer(&self) -> Vec<u8> {
        self.inner.encoded_buffer().to_vec()
    }

    /// `data:image/jpeg;base64,...`, usable directly as an `<img>` source.
    #[wasm_bindgen(getter, js_name = previewString)]
    pub fn preview_string(&self) -> String {
        self.inner.preview_string().to_string()
    }

    #[wasm_bindgen(getter, js_name = byteSize)]
    pub fn byte_size(&self) -> usize {
        self.inner.byte_size()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.dimensions().width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.dimensions().height
    }

    /// Quality factor in (0, 1] the buffer was encoded at.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.inner.quality().value()
    }
}

impl From<Rc<RecompressionResult>> for JsRecompressionResult {
    fn from(inner: Rc<RecompressionResult>) -> Self {
        Self { inner }
    }
}

impl From<RecompressionResult> for JsRecompressionResult {
    fn from(result: RecompressionResult) -> Self {
        Self::from(Rc::new(result))
    }
}
