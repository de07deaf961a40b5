//! Face geometry WASM bindings.
//!
//! Wraps the landmark-driven operations of `facealign_core::face`. Landmarks
//! are passed as a [`JsLandmarks`] table; an empty table means "no face" and
//! makes the landmark-dependent functions return `undefined` (or `0` for the
//! angle) rather than throwing.
//!
//! # Example
//!
//! ```typescript
//! import { align_face, JsLandmarks } from '@facealign/wasm';
//!
//! const landmarks = new JsLandmarks(indices, xs, ys);
//! const aligned = align_face(image, landmarks, { target_size: 512, padding: 0.2 });
//! if (aligned) {
//!   drawImage(aligned.image);
//!   const box = aligned.crop_box;
//! }
//! ```

use crate::types::{JsBoundingBox, JsDecodedImage, JsLandmarks};
use facealign_core::decode;
use facealign_core::face::{self, AlignConfig, AlignedFace, FaceError, LandmarkScheme, RotatedFace};
use facealign_core::transform::{AffineMatrix, BorderMode};
use wasm_bindgen::prelude::*;

/// A rotated image with its co-rotated landmarks.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsRotatedFace {
    image: JsDecodedImage,
    landmarks: JsLandmarks,
    angle: f64,
}

#[wasm_bindgen]
impl JsRotatedFace {
    #[wasm_bindgen(getter)]
    pub fn image(&self) -> JsDecodedImage {
        self.image.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn landmarks(&self) -> JsLandmarks {
        self.landmarks.clone()
    }

    /// Rotation applied, in degrees.
    #[wasm_bindgen(getter)]
    pub fn angle(&self) -> f64 {
        self.angle
    }
}

impl From<RotatedFace> for JsRotatedFace {
    fn from(rotated: RotatedFace) -> Self {
        Self {
            image: JsDecodedImage::from_decoded(rotated.image),
            landmarks: JsLandmarks::from_table(rotated.landmarks),
            angle: rotated.transform.angle_degrees,
        }
    }
}

/// A square face crop and the region it was taken from.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsSquareCrop {
    image: JsDecodedImage,
    bbox: JsBoundingBox,
}

#[wasm_bindgen]
impl JsSquareCrop {
    #[wasm_bindgen(getter)]
    pub fn image(&self) -> JsDecodedImage {
        self.image.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn bbox(&self) -> JsBoundingBox {
        self.bbox
    }
}

/// Output of [`align_face`].
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsAlignedFace {
    image: JsDecodedImage,
    landmarks: JsLandmarks,
    crop_box: JsBoundingBox,
    angle: f64,
    matrix: AffineMatrix,
    inverse: AffineMatrix,
}

#[wasm_bindgen]
impl JsAlignedFace {
    /// The `target_size x target_size` face image.
    #[wasm_bindgen(getter)]
    pub fn image(&self) -> JsDecodedImage {
        self.image.clone()
    }

    /// Landmarks in the rotated full-image coordinate space.
    #[wasm_bindgen(getter)]
    pub fn landmarks(&self) -> JsLandmarks {
        self.landmarks.clone()
    }

    /// Square region cropped from the rotated full image.
    #[wasm_bindgen(getter)]
    pub fn crop_box(&self) -> JsBoundingBox {
        self.crop_box
    }

    #[wasm_bindgen(getter)]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Source-to-rotated affine matrix, row-major `[a, b, tx, c, d, ty]`.
    pub fn matrix(&self) -> Vec<f64> {
        flatten(&self.matrix)
    }

    /// Rotated-to-source affine matrix, for pasting a result back.
    pub fn inverse_matrix(&self) -> Vec<f64> {
        flatten(&self.inverse)
    }
}

impl From<AlignedFace> for JsAlignedFace {
    fn from(aligned: AlignedFace) -> Self {
        Self {
            image: JsDecodedImage::from_decoded(aligned.image),
            landmarks: JsLandmarks::from_table(aligned.landmarks),
            crop_box: aligned.crop_box.into(),
            angle: aligned.transform.angle_degrees,
            matrix: aligned.transform.matrix,
            inverse: aligned.transform.inverse(),
        }
    }
}

fn flatten(m: &AffineMatrix) -> Vec<f64> {
    m.iter().flatten().copied().collect()
}

fn scheme(left_eye: Option<u32>, right_eye: Option<u32>) -> LandmarkScheme {
    let default = LandmarkScheme::default();
    LandmarkScheme::new(
        left_eye.unwrap_or(default.left_eye_center),
        right_eye.unwrap_or(default.right_eye_center),
    )
}

fn border(replicate: bool) -> BorderMode {
    if replicate {
        BorderMode::Replicate
    } else {
        BorderMode::default()
    }
}

fn to_js_error(e: FaceError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Padded bounding box of all landmarks, or `undefined` with no landmarks.
///
/// # Arguments
///
/// * `landmarks` - Landmark table in image pixel coordinates
/// * `padding_percent` - Fraction of the landmark extent added on each side
#[wasm_bindgen]
pub fn face_bounding_box(landmarks: &JsLandmarks, padding_percent: f64) -> Option<JsBoundingBox> {
    face::face_bounding_box(Some(landmarks.table()), padding_percent).map(Into::into)
}

/// Crop the padded landmark box out of the image.
///
/// Returns `undefined` with no landmarks.
///
/// # Errors
///
/// Throws if the padded box reaches past the image edges.
#[wasm_bindgen]
pub fn crop_face(
    image: &JsDecodedImage,
    landmarks: &JsLandmarks,
    padding_percent: f64,
) -> Result<Option<JsDecodedImage>, JsValue> {
    face::crop_face(image.to_decoded().into(), Some(landmarks.table()), padding_percent)
        .map(|crop| crop.map(JsDecodedImage::from_decoded))
        .map_err(to_js_error)
}

/// Roll angle of the face in degrees, from the eye-to-eye vector.
///
/// Eye indices default to MediaPipe Face Mesh (33 and 263).
///
/// # Errors
///
/// Throws if an eye landmark is missing from a non-empty table.
#[wasm_bindgen]
pub fn rotation_angle(
    landmarks: &JsLandmarks,
    left_eye: Option<u32>,
    right_eye: Option<u32>,
) -> Result<f64, JsValue> {
    face::rotation_angle(Some(landmarks.table()), &scheme(left_eye, right_eye))
        .map_err(to_js_error)
}

/// Rotate the image so the eyes are level, carrying the landmarks along.
///
/// The output keeps the input size. Exposed corners are black unless
/// `replicate_border` is set. Eye indices default to MediaPipe Face Mesh
/// (33 and 263).
///
/// # Errors
///
/// Throws if the pixel buffer does not match the dimensions or an eye
/// landmark is missing.
#[wasm_bindgen]
pub fn rotate_face(
    image: &JsDecodedImage,
    landmarks: &JsLandmarks,
    replicate_border: bool,
    left_eye: Option<u32>,
    right_eye: Option<u32>,
) -> Result<Option<JsRotatedFace>, JsValue> {
    face::rotate_image_and_landmarks(
        Some(image.to_decoded().into()),
        Some(landmarks.table()),
        &scheme(left_eye, right_eye),
        border(replicate_border),
    )
    .map(|rotated| rotated.map(JsRotatedFace::from))
    .map_err(to_js_error)
}

/// Square crop centered on the padded landmark box, kept inside the image.
///
/// Returns `undefined` with no landmarks.
///
/// # Errors
///
/// Throws if the pixel buffer does not match the dimensions.
#[wasm_bindgen]
pub fn crop_face_to_square(
    image: &JsDecodedImage,
    landmarks: &JsLandmarks,
    padding_percent: f64,
) -> Result<Option<JsSquareCrop>, JsValue> {
    square_crop_with(image, landmarks, padding_percent).map_err(to_js_error)
}

fn square_crop_with(
    image: &JsDecodedImage,
    landmarks: &JsLandmarks,
    padding_percent: f64,
) -> Result<Option<JsSquareCrop>, FaceError> {
    let source = decode::normalize(image.to_decoded().into())?;
    let crop = face::crop_face_to_square(&source, Some(landmarks.table()), padding_percent);
    Ok(crop.map(|(crop, region)| JsSquareCrop {
        image: JsDecodedImage::from_decoded(crop),
        bbox: region.into(),
    }))
}

/// Center-crop to a square and resize to `target_size x target_size`
/// (Lanczos3).
///
/// # Errors
///
/// Throws if `target_size` is zero or the image is empty.
#[wasm_bindgen]
pub fn resize_image(image: &JsDecodedImage, target_size: u32) -> Result<JsDecodedImage, JsValue> {
    match face::resize_image(Some(image.to_decoded().into()), target_size) {
        Ok(Some(resized)) => Ok(JsDecodedImage::from_decoded(resized)),
        Ok(None) => Err(JsValue::from_str("No image to resize")),
        Err(e) => Err(to_js_error(e)),
    }
}

/// Run the full alignment pipeline: level the eyes, square-crop around the
/// landmarks and resize.
///
/// `config` is an optional object with any of `padding`, `target_size`,
/// `rotate`, `scheme`, `border` and `filter`; missing fields take defaults.
/// Returns `undefined` with no landmarks.
///
/// # Errors
///
/// Throws on an invalid config or a missing eye landmark.
#[wasm_bindgen]
pub fn align_face(
    image: &JsDecodedImage,
    landmarks: &JsLandmarks,
    config: JsValue,
) -> Result<Option<JsAlignedFace>, JsValue> {
    let config: AlignConfig = if config.is_undefined() || config.is_null() {
        AlignConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid align config: {}", e)))?
    };

    align_with(image, landmarks, &config).map_err(to_js_error)
}

fn align_with(
    image: &JsDecodedImage,
    landmarks: &JsLandmarks,
    config: &AlignConfig,
) -> Result<Option<JsAlignedFace>, FaceError> {
    let aligned = face::align_face(image.to_decoded().into(), Some(landmarks.table()), config)?;
    Ok(aligned.map(JsAlignedFace::from))
}
