//! WASM-compatible wrapper types for images, landmarks and crop boxes.
//!
//! These types wrap the core facealign types and handle the conversion
//! between Rust and JavaScript data representations.

use facealign_core::decode::DecodedImage;
use facealign_core::face::{Landmark, LandmarkTable};
use facealign_core::transform::BoundingBox;
use wasm_bindgen::prelude::*;

/// A canonical RGB image wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create a new JsDecodedImage from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3 for RGB)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert back to a core DecodedImage. Clones the pixel data.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// A landmark table in column form: parallel index, x and y arrays.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct JsLandmarks {
    inner: LandmarkTable,
}

#[wasm_bindgen]
impl JsLandmarks {
    /// Build a landmark table from parallel arrays.
    ///
    /// # Errors
    /// Returns an error if the arrays differ in length or an index repeats.
    #[wasm_bindgen(constructor)]
    pub fn new(indices: Vec<u32>, xs: Vec<f64>, ys: Vec<f64>) -> Result<JsLandmarks, JsValue> {
        table_from_columns(&indices, &xs, &ys)
            .map(|inner| JsLandmarks { inner })
            .map_err(|e| JsValue::from_str(&e))
    }

    /// An empty table (no face).
    pub fn empty() -> JsLandmarks {
        JsLandmarks::default()
    }

    /// Deserialize from an array of `{index, x, y}` objects.
    pub fn from_json(value: JsValue) -> Result<JsLandmarks, JsValue> {
        let inner: LandmarkTable = serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Invalid landmarks: {}", e)))?;
        Ok(JsLandmarks { inner })
    }

    /// Serialize to an array of `{index, x, y}` objects.
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    pub fn indices(&self) -> Vec<u32> {
        self.inner.iter().map(|p| p.index).collect()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.inner.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.inner.iter().map(|p| p.y).collect()
    }
}

impl JsLandmarks {
    pub(crate) fn from_table(inner: LandmarkTable) -> Self {
        Self { inner }
    }

    pub(crate) fn table(&self) -> &LandmarkTable {
        &self.inner
    }
}

fn table_from_columns(indices: &[u32], xs: &[f64], ys: &[f64]) -> Result<LandmarkTable, String> {
    if indices.len() != xs.len() || indices.len() != ys.len() {
        return Err(format!(
            "Landmark arrays differ in length: {} indices, {} xs, {} ys",
            indices.len(),
            xs.len(),
            ys.len()
        ));
    }

    let points = indices
        .iter()
        .zip(xs.iter().zip(ys))
        .map(|(&index, (&x, &y))| Landmark::new(index, x, y))
        .collect();

    LandmarkTable::new(points).map_err(|e| e.to_string())
}

/// An integer pixel region for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsBoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<BoundingBox> for JsBoundingBox {
    fn from(b: BoundingBox) -> Self {
        Self {
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
        }
    }
}
