//! Image decoding and normalization WASM bindings.
//!
//! Everything that enters the face pipeline from JavaScript is first turned
//! into a canonical RGB [`JsDecodedImage`].
//!
//! # Functions
//!
//! - [`decode_image`] - Decode JPEG or PNG bytes, honoring EXIF orientation
//! - [`normalize_rgba`] - Convert canvas `ImageData` (RGBA) to RGB
//! - [`normalize_tensor`] - Convert a float `[H, W, C]` or `[N, H, W, C]` tensor to RGB
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, normalize_rgba } from '@facealign/wasm';
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//!
//! const data = ctx.getImageData(0, 0, canvas.width, canvas.height);
//! const frame = normalize_rgba(data.width, data.height, new Uint8Array(data.data.buffer));
//! ```

use crate::types::JsDecodedImage;
use facealign_core::decode::{self, ImageInput, PixelArray, Tensor};
use wasm_bindgen::prelude::*;

/// Decode an encoded image (JPEG or PNG).
///
/// EXIF orientation is applied, so the returned pixels are upright.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported or intact image.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert interleaved RGBA bytes (as in canvas `ImageData`) to RGB.
///
/// Alpha is dropped, not composited.
///
/// # Errors
///
/// Returns an error if `pixels` is not `width * height * 4` bytes long.
#[wasm_bindgen]
pub fn normalize_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsDecodedImage, JsValue> {
    decode::normalize(rgba_input(width, height, pixels))
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert a channel-last float tensor with values in `[0, 1]` to RGB.
///
/// Only the first batch element of a 4-D tensor is used.
///
/// # Errors
///
/// Returns an error for an unsupported shape or a data length that does not
/// match the shape.
#[wasm_bindgen]
pub fn normalize_tensor(shape: Vec<u32>, data: Vec<f32>) -> Result<JsDecodedImage, JsValue> {
    decode::normalize(tensor_input(&shape, data))
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn rgba_input(width: u32, height: u32, pixels: Vec<u8>) -> ImageInput {
    PixelArray::from_u8(vec![height as usize, width as usize, 4], pixels).into()
}

fn tensor_input(shape: &[u32], data: Vec<f32>) -> ImageInput {
    let shape = shape.iter().map(|&d| d as usize).collect();
    Tensor::new(shape, data).into()
}
