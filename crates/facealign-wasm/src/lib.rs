//! Facealign WASM - WebAssembly bindings for facealign
//!
//! This crate provides WASM bindings to expose the facealign-core face
//! geometry pipeline to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for images, landmarks and boxes
//! - `decode` - Image decoding and normalization bindings
//! - `face` - Landmark-driven crop, rotation, resize and full alignment
//! - `logger` - Console backend for the `log` facade
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, align_face, JsLandmarks } from '@facealign/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const landmarks = new JsLandmarks(indices, xs, ys);
//! const aligned = align_face(image, landmarks, undefined);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod face;
mod logger;
mod types;

// Re-export public types
pub use decode::{decode_image, normalize_rgba, normalize_tensor};
pub use face::{
    align_face, crop_face, crop_face_to_square, face_bounding_box, resize_image, rotate_face,
    rotation_angle, JsAlignedFace, JsRotatedFace, JsSquareCrop,
};
pub use logger::set_log_level;
pub use types::{JsBoundingBox, JsDecodedImage, JsLandmarks};

/// Initialize the WASM module (called automatically on load).
///
/// Installs the console logger at `warn` level.
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Warn);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
