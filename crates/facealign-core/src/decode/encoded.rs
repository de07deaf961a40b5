//! Decoding of encoded image files (JPEG, PNG) with EXIF orientation handling.
//!
//! Landmark detectors usually run on the image as it is displayed, so the
//! EXIF orientation has to be applied before landmarks and pixels can share
//! a coordinate space.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};

/// Decode encoded image bytes, applying EXIF orientation correction.
///
/// The format is sniffed from the bytes. Grayscale and alpha images are
/// converted to RGB.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` if the bytes cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = get_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    log::debug!(
        "decoded {}x{} image, orientation {:?}",
        img.width(),
        img.height(),
        orientation
    );
    Ok(DecodedImage::from_rgb_image(
        apply_orientation(img, orientation).into_rgb8(),
    ))
}

/// Extract the EXIF orientation from encoded image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or the orientation
/// cannot be determined.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
