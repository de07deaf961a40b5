//! Image resizing for fixed-size model input.
//!
//! Resampling is delegated to the `image` crate. Square output is produced by
//! center-cropping first, so anything outside the central square is dropped.

use super::{DecodeError, DecodedImage, FilterType};
use crate::transform::{crop_region, BoundingBox};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if a target dimension is zero or
/// the source image is empty.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 || image.is_empty() {
        return Err(DecodeError::InvalidDimensions);
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image.to_rgb_image().ok_or(DecodeError::BufferMismatch {
        expected: image.width as usize * image.height as usize * 3,
        actual: image.pixels.len(),
    })?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// The central square region of a `width x height` image.
pub fn center_square(width: u32, height: u32) -> BoundingBox {
    let side = width.min(height);
    BoundingBox::new((width - side) / 2, (height - side) / 2, side, side)
}

/// Crop the central square of side `min(width, height)`.
pub fn center_square_crop(image: &DecodedImage) -> DecodedImage {
    crop_region(image, &center_square(image.width, image.height))
}

/// Center-crop to a square and resize it to `target_size x target_size`.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if `target_size` is zero or the
/// image is empty.
pub fn resize_square(
    image: &DecodedImage,
    target_size: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if target_size == 0 || image.is_empty() {
        return Err(DecodeError::InvalidDimensions);
    }
    let square = center_square_crop(image);
    log::trace!(
        "resize_square: {}x{} -> {}x{} -> {}x{}",
        image.width,
        image.height,
        square.width,
        square.height,
        target_size,
        target_size
    );
    resize(&square, target_size, target_size, filter)
}
