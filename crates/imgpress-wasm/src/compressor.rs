//! Stateful compressor binding.
//!
//! Wraps the core controller so a page can feed it file selections and
//! slider input directly. Each call returns a `Promise` that resolves to the
//! published `RecompressionResult`, or to `null` when the run failed or was
//! superseded by a later call. Promises never reject for pipeline failures;
//! `lastError` carries the message instead.
//!
//! # Example
//!
//! ```typescript
//! import { Compressor } from '@imgpress/wasm';
//!
//! const compressor = new Compressor(
//!   { qualityRange: { min: 0.1, max: 1, step: 0.1 } },
//!   (generation, result) => { preview.src = result ? result.previewString : ''; },
//! );
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! await compressor.selectSource(bytes, file.type, file.name);
//! slider.oninput = () => compressor.setQuality(Number(slider.value));
//! ```

use std::rc::Rc;

use imgpress_core::{CompressorConfig, Delivery, HostCodec, HostController, SourceImage, Ticket};
use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::types::JsRecompressionResult;

#[wasm_bindgen(js_name = Compressor)]
pub struct JsCompressor {
    inner: Rc<HostController>,
}

#[wasm_bindgen(js_class = Compressor)]
impl JsCompressor {
    /// Create a compressor. `config` may be omitted or hold any subset of
    /// `maxWidth`, `maxHeight`, `background`, `qualityRange`,
    /// `defaultQuality` and `filter`. `onUpdate` is optional, see [`Self::on_update`].
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, on_update: Option<Function>) -> Result<JsCompressor, JsValue> {
        let config: CompressorConfig = if config.is_undefined() || config.is_null() {
            CompressorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid compressor config: {}", e)))?
        };
        let inner = HostController::new(HostCodec, HostCodec, config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let compressor = JsCompressor {
            inner: Rc::new(inner),
        };
        if let Some(callback) = on_update {
            compressor.on_update(callback);
        }
        Ok(compressor)
    }

    /// Register `callback(generation, result | null)`, called once per
    /// settled generation. Replaces any previous callback.
    #[wasm_bindgen(js_name = onUpdate)]
    pub fn on_update(&self, callback: Function) {
        self.inner.set_listener(move |generation, result| {
            let value = result
                .map(|r| JsValue::from(JsRecompressionResult::from(r)))
                .unwrap_or(JsValue::NULL);
            let generation = JsValue::from_f64(generation.value() as f64);
            if let Err(err) = callback.call2(&JsValue::NULL, &generation, &value) {
                web_sys::console::warn_2(&JsValue::from_str("imgpress: onUpdate callback threw"), &err);
            }
        });
    }

    /// Select a new source image and recompress it at the current quality.
    ///
    /// Throws synchronously when `mime` does not name an image or `bytes`
    /// is empty.
    #[wasm_bindgen(js_name = selectSource)]
    pub fn select_source(
        &self,
        bytes: Vec<u8>,
        mime: String,
        file_name: String,
    ) -> Result<Promise, JsValue> {
        let source = SourceImage::new(bytes, mime, file_name)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let ticket = self.inner.prepare_source(source);
        Ok(self.spawn(Some(ticket)))
    }

    /// Clamp `value` into the configured range and recompress.
    ///
    /// Resolves to `null` immediately when no source has been selected.
    #[wasm_bindgen(js_name = setQuality)]
    pub fn set_quality(&self, value: f32) -> Promise {
        let ticket = self.inner.prepare_quality(value);
        self.spawn(ticket)
    }

    /// Recompress the current source at the current quality.
    pub fn refresh(&self) -> Promise {
        let ticket = self.inner.prepare_refresh();
        self.spawn(ticket)
    }

    #[wasm_bindgen(getter)]
    pub fn busy(&self) -> bool {
        self.inner.is_busy()
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f32 {
        self.inner.quality().value()
    }

    #[wasm_bindgen(getter, js_name = qualityPercent)]
    pub fn quality_percent(&self) -> u32 {
        self.inner.quality().percent()
    }

    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> f64 {
        self.inner.generation().value() as f64
    }

    /// The published result for the current state, if any.
    #[wasm_bindgen(getter)]
    pub fn latest(&self) -> Option<JsRecompressionResult> {
        self.inner.latest().map(JsRecompressionResult::from)
    }

    #[wasm_bindgen(getter, js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error().map(|e| e.to_string())
    }

    /// Preview of the original as a `data:` URL.
    #[wasm_bindgen(getter, js_name = sourcePreview)]
    pub fn source_preview(&self) -> Option<String> {
        self.inner.source().map(|s| s.preview_string())
    }

    #[wasm_bindgen(getter, js_name = suggestedFileName)]
    pub fn suggested_file_name(&self) -> Option<String> {
        self.inner.suggested_file_name()
    }

    /// `{ originalBytes, compressedBytes, original, compressed, savings }`, or
    /// `undefined` before the first result.
    #[wasm_bindgen(getter)]
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.stats())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The effective configuration, with defaults filled in.
    #[wasm_bindgen(getter)]
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn spawn(&self, ticket: Option<Ticket>) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let delivery = match ticket {
                Some(ticket) => inner.complete(ticket).await,
                None => Delivery::Idle,
            };
            Ok(match delivery {
                Delivery::Published(result) => JsRecompressionResult::from(result).into(),
                Delivery::Failed(_) | Delivery::Stale { .. } | Delivery::Idle => JsValue::NULL,
            })
        })
    }
}
