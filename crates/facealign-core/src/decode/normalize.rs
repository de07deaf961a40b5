//! Conversion of external image representations into the canonical image.
//!
//! Images reach the geometry pipeline in several shapes: normalized float
//! tensors with an optional batch axis, plain pixel arrays, decoded
//! `image::DynamicImage` values, or encoded file bytes. Each variant of
//! [`ImageInput`] has one conversion path and all of them converge on
//! [`DecodedImage`] (8-bit RGB, single image).
//!
//! # Shapes
//!
//! Array shapes are row-major and channel-last:
//! - `[H, W]` grayscale
//! - `[H, W, C]` with C in {1, 3, 4}
//! - `[B, H, W, C]` batched; only the first image is used

use image::DynamicImage;

use super::{decode_image, DecodeError, DecodedImage};

/// Normalized float tensor, values expected in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl Tensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Self {
        Self { shape, data }
    }
}

/// Sample storage of a [`PixelArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    /// Float samples. Treated as normalized when the maximum is at most 1.0,
    /// otherwise as already being in the 0-255 range.
    F32(Vec<f32>),
}

impl Samples {
    fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::F32(v) => v.len(),
        }
    }
}

/// A plain pixel array with an explicit shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelArray {
    pub shape: Vec<usize>,
    pub samples: Samples,
}

impl PixelArray {
    pub fn from_u8(shape: Vec<usize>, data: Vec<u8>) -> Self {
        Self {
            shape,
            samples: Samples::U8(data),
        }
    }

    pub fn from_f32(shape: Vec<usize>, data: Vec<f32>) -> Self {
        Self {
            shape,
            samples: Samples::F32(data),
        }
    }
}

/// Every image representation accepted by the geometry pipeline.
#[derive(Debug, Clone)]
pub enum ImageInput {
    /// Normalized float tensor (values in `[0, 1]`, optional batch axis).
    Tensor(Tensor),
    /// Plain pixel array, `u8` or `f32`.
    Array(PixelArray),
    /// An already decoded image of any color type.
    Image(DynamicImage),
    /// Encoded file bytes (JPEG or PNG).
    Encoded(Vec<u8>),
    /// The canonical representation itself.
    Canonical(DecodedImage),
}

impl From<DecodedImage> for ImageInput {
    fn from(img: DecodedImage) -> Self {
        ImageInput::Canonical(img)
    }
}

impl From<DynamicImage> for ImageInput {
    fn from(img: DynamicImage) -> Self {
        ImageInput::Image(img)
    }
}

impl From<Tensor> for ImageInput {
    fn from(tensor: Tensor) -> Self {
        ImageInput::Tensor(tensor)
    }
}

impl From<PixelArray> for ImageInput {
    fn from(array: PixelArray) -> Self {
        ImageInput::Array(array)
    }
}

/// Normalize any supported input into the canonical RGB image.
///
/// Batched inputs use the first image only; the remaining batch entries are
/// ignored. Grayscale is broadcast to RGB and alpha is dropped without
/// compositing.
///
/// # Errors
///
/// - `DecodeError::UnsupportedShape` if the rank is not 2-4 or the channel
///   count is not 1, 3 or 4
/// - `DecodeError::BufferMismatch` if the sample count does not match the shape
/// - `DecodeError::CorruptedFile` if encoded bytes cannot be decoded
pub fn normalize(input: ImageInput) -> Result<DecodedImage, DecodeError> {
    match input {
        ImageInput::Tensor(tensor) => normalize_tensor(tensor),
        ImageInput::Array(array) => normalize_array(array),
        ImageInput::Image(img) => Ok(DecodedImage::from_rgb_image(img.into_rgb8())),
        ImageInput::Encoded(bytes) => decode_image(&bytes),
        ImageInput::Canonical(img) => {
            let expected = img.width as usize * img.height as usize * 3;
            if img.pixels.len() != expected {
                return Err(DecodeError::BufferMismatch {
                    expected,
                    actual: img.pixels.len(),
                });
            }
            Ok(img)
        }
    }
}

/// Height, width and channels of the first image in a (possibly batched) array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    height: usize,
    width: usize,
    channels: usize,
    /// Samples in one image, `height * width * channels`.
    sample_count: usize,
}

impl Layout {
    fn from_shape(shape: &[usize], len: usize) -> Result<Self, DecodeError> {
        let unsupported = || DecodeError::UnsupportedShape {
            shape: shape.to_vec(),
        };

        let (batch, height, width, channels) = match *shape {
            [h, w] => (1, h, w, 1),
            [h, w, c] => (1, h, w, c),
            [b, h, w, c] => (b, h, w, c),
            _ => return Err(unsupported()),
        };

        if !matches!(channels, 1 | 3 | 4) {
            return Err(unsupported());
        }

        // Shapes whose element count does not fit in usize are malformed.
        let checked_product = |dims: &[usize]| {
            dims.iter()
                .try_fold(1usize, |acc, &d| acc.checked_mul(d))
                .ok_or_else(unsupported)
        };
        let expected = checked_product(shape)?;
        let sample_count = checked_product(&[height, width, channels])?;
        if expected != len {
            return Err(DecodeError::BufferMismatch {
                expected,
                actual: len,
            });
        }

        if batch == 0 {
            return Err(DecodeError::InvalidDimensions);
        }
        if batch > 1 {
            log::debug!("batch of {} images, using the first", batch);
        }

        Ok(Self {
            height,
            width,
            channels,
            sample_count,
        })
    }
}

fn normalize_tensor(tensor: Tensor) -> Result<DecodedImage, DecodeError> {
    let layout = Layout::from_shape(&tensor.shape, tensor.data.len())?;
    let samples: Vec<u8> = tensor.data[..layout.sample_count]
        .iter()
        .map(|&v| unit_to_u8(v))
        .collect();
    to_rgb(layout, &samples)
}

fn normalize_array(array: PixelArray) -> Result<DecodedImage, DecodeError> {
    let layout = Layout::from_shape(&array.shape, array.samples.len())?;
    let count = layout.sample_count;

    match array.samples {
        Samples::U8(data) => to_rgb(layout, &data[..count]),
        Samples::F32(data) => {
            let max = data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let normalized = max <= 1.0;
            log::trace!("f32 array max {}, normalized: {}", max, normalized);

            let samples: Vec<u8> = data[..count]
                .iter()
                .map(|&v| if normalized { unit_to_u8(v) } else { v as u8 })
                .collect();
            to_rgb(layout, &samples)
        }
    }
}

/// Scale a `[0, 1]` sample to `u8`, truncating. Out-of-range values saturate.
#[inline]
fn unit_to_u8(v: f32) -> u8 {
    (v * 255.0) as u8
}

/// Expand or reduce channel-last samples to packed RGB.
fn to_rgb(layout: Layout, samples: &[u8]) -> Result<DecodedImage, DecodeError> {
    let width = u32::try_from(layout.width).map_err(|_| DecodeError::InvalidDimensions)?;
    let height = u32::try_from(layout.height).map_err(|_| DecodeError::InvalidDimensions)?;

    let pixels = match layout.channels {
        3 => samples.to_vec(),
        1 => samples.iter().flat_map(|&v| [v, v, v]).collect(),
        4 => samples
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        _ => {
            return Err(DecodeError::UnsupportedShape {
                shape: vec![layout.height, layout.width, layout.channels],
            })
        }
    };

    Ok(DecodedImage::new(width, height, pixels))
}
