//! Landmark-driven face geometry.
//!
//! Every function here is a pure function of its inputs. Absent (`None`) or
//! empty landmark tables are not errors: landmark-dependent operations return
//! `None` so callers can skip face processing for images without a face.
//! Image normalization failures are errors and are returned immediately.

use crate::decode::{self, DecodedImage, FilterType, ImageInput};
use crate::transform::{
    crop_region, rotate_about_center, square_region, BorderMode, BoundingBox,
    InterpolationFilter, RotationTransform,
};

use super::{FaceError, FacePoint, LandmarkScheme, LandmarkTable};

/// An image rotated to level the eyes, with its landmarks carried along.
#[derive(Debug, Clone)]
pub struct RotatedFace {
    pub image: DecodedImage,
    /// Landmarks mapped through `transform`, same indices and order.
    pub landmarks: LandmarkTable,
    pub transform: RotationTransform,
}

/// Bounding box of all landmarks, padded by a fraction of its extent.
///
/// Each side is moved outward by `padding_percent * extent` of its axis, so
/// the total added width is `2 * padding_percent * width`. The left and top
/// edges are clamped at zero; the right and bottom edges are not clamped to
/// any image. Negative padding shrinks the box.
///
/// Returns `None` for an absent or empty table.
pub fn face_bounding_box(
    landmarks: Option<&LandmarkTable>,
    padding_percent: f64,
) -> Option<BoundingBox> {
    let (min_x, min_y, max_x, max_y) = landmarks?.bounds()?;

    let pad_x = (max_x - min_x) * padding_percent;
    let pad_y = (max_y - min_y) * padding_percent;

    let x1 = (min_x - pad_x).max(0.0);
    let y1 = (min_y - pad_y).max(0.0);
    let x2 = max_x + pad_x;
    let y2 = max_y + pad_y;

    // Float-to-int casts truncate and saturate negatives at zero.
    Some(BoundingBox::new(
        x1 as u32,
        y1 as u32,
        (x2 - x1) as u32,
        (y2 - y1) as u32,
    ))
}

/// Crop the padded landmark bounding box out of the image.
///
/// The box is not clamped to the image: a box reaching past the image edges
/// (typically from large padding) fails with `FaceError::OutOfBoundsCrop`.
/// Use [`crop_face_to_square`] for a crop that always stays inside the image.
pub fn crop_face(
    input: ImageInput,
    landmarks: Option<&LandmarkTable>,
    padding_percent: f64,
) -> Result<Option<DecodedImage>, FaceError> {
    let image = decode::normalize(input)?;
    let Some(bbox) = face_bounding_box(landmarks, padding_percent) else {
        return Ok(None);
    };

    if !bbox.fits_within(image.width, image.height) {
        return Err(FaceError::OutOfBoundsCrop {
            bbox,
            width: image.width,
            height: image.height,
        });
    }

    Ok(Some(crop_region(&image, &bbox)))
}

/// Roll angle of the face in degrees.
///
/// Computed from the eye-to-eye vector `right - left` as `atan2(dy, dx)`.
/// Returns `0.0` for an absent or empty table.
///
/// # Errors
///
/// `FaceError::MissingLandmark` if either eye landmark is not in the table.
pub fn rotation_angle(
    landmarks: Option<&LandmarkTable>,
    scheme: &LandmarkScheme,
) -> Result<f64, FaceError> {
    let Some(table) = landmarks.filter(|t| !t.is_empty()) else {
        return Ok(0.0);
    };

    let left = table.require(scheme.index_of(FacePoint::LeftEyeCenter))?;
    let right = table.require(scheme.index_of(FacePoint::RightEyeCenter))?;

    let dx = right.x - left.x;
    let dy = right.y - left.y;
    Ok(dy.atan2(dx).to_degrees())
}

/// Rotate the image about its center so the eyes are level, and map the
/// landmarks through the identical transform.
///
/// The output keeps the input's width and height; corners rotated out of
/// frame are lost and exposed areas are filled per `border`. Resampling is
/// Lanczos3.
///
/// Returns `Ok(None)` when the image or the landmark table is absent.
pub fn rotate_image_and_landmarks(
    input: Option<ImageInput>,
    landmarks: Option<&LandmarkTable>,
    scheme: &LandmarkScheme,
    border: BorderMode,
) -> Result<Option<RotatedFace>, FaceError> {
    let Some(input) = input else {
        return Ok(None);
    };
    let image = decode::normalize(input)?;
    let Some(table) = landmarks else {
        return Ok(None);
    };

    rotate_face(&image, table, scheme, InterpolationFilter::Lanczos3, border).map(Some)
}

/// Co-rotate a canonical image and its landmarks.
pub(crate) fn rotate_face(
    image: &DecodedImage,
    landmarks: &LandmarkTable,
    scheme: &LandmarkScheme,
    filter: InterpolationFilter,
    border: BorderMode,
) -> Result<RotatedFace, FaceError> {
    let angle = rotation_angle(Some(landmarks), scheme)?;
    log::debug!("leveling eyes: roll angle {:.3} degrees", angle);

    let (rotated, transform) = rotate_about_center(image, angle, filter, border);
    let landmarks = landmarks.map_coords(|x, y| transform.apply(x, y));

    Ok(RotatedFace {
        image: rotated,
        landmarks,
        transform,
    })
}

/// Crop a square centered on the padded landmark bounding box.
///
/// The square's side is `max(width, height)` of the padded box. When the
/// square crosses an image edge it is shifted back inside rather than
/// shrunk, so the crop is exactly `side x side` whenever the image is large
/// enough. A smaller image yields a smaller crop, without padding.
///
/// Returns the crop and the region actually used, or `None` when no
/// bounding box can be derived.
pub fn crop_face_to_square(
    image: &DecodedImage,
    landmarks: Option<&LandmarkTable>,
    padding_percent: f64,
) -> Option<(DecodedImage, BoundingBox)> {
    let bbox = face_bounding_box(landmarks, padding_percent)?;
    let region = square_region(&bbox, image.width, image.height);
    log::trace!("face box {:?} -> square crop {:?}", bbox, region);

    Some((crop_region(image, &region), region))
}

/// Center-crop to a square and resize to `target_size x target_size` with
/// Lanczos3 interpolation.
///
/// Returns `Ok(None)` when the image is absent.
pub fn resize_image(
    input: Option<ImageInput>,
    target_size: u32,
) -> Result<Option<DecodedImage>, FaceError> {
    let Some(input) = input else {
        return Ok(None);
    };
    let image = decode::normalize(input)?;
    let resized = decode::resize_square(&image, target_size, FilterType::Lanczos3)?;
    Ok(Some(resized))
}
