//! The full alignment pipeline: normalize, level the eyes, square-crop, resize.

use serde::{Deserialize, Serialize};

use crate::decode::{self, DecodedImage, FilterType, ImageInput};
use crate::transform::{BorderMode, BoundingBox, InterpolationFilter, RotationTransform};

use super::geometry::{crop_face_to_square, rotate_face};
use super::{FaceError, LandmarkScheme, LandmarkTable};

/// Settings for [`align_face`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Bounding box padding as a fraction of the landmark extent per side.
    pub padding: f64,
    /// Side length of the output square in pixels.
    pub target_size: u32,
    /// Level the eyes before cropping.
    pub rotate: bool,
    pub scheme: LandmarkScheme,
    /// Interpolation for the rotation warp.
    pub rotation_filter: InterpolationFilter,
    /// Fill for corners exposed by the rotation.
    pub border: BorderMode,
    /// Filter for the final resize.
    pub filter: FilterType,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            padding: 0.2,
            target_size: 512,
            rotate: true,
            scheme: LandmarkScheme::default(),
            rotation_filter: InterpolationFilter::Lanczos3,
            border: BorderMode::default(),
            filter: FilterType::Lanczos3,
        }
    }
}

/// A fixed-size, rotation-normalized face image plus the geometry needed to
/// place a processed result back into the source image.
#[derive(Debug, Clone)]
pub struct AlignedFace {
    /// `target_size x target_size` face image.
    pub image: DecodedImage,
    /// Landmarks in the coordinate space of the rotated full image.
    pub landmarks: LandmarkTable,
    /// Square region cropped from the rotated full image.
    pub crop_box: BoundingBox,
    /// Rotation applied to the full image (identity when rotation is off).
    pub transform: RotationTransform,
}

/// Produce the aligned face crop for `input`.
///
/// Returns `Ok(None)` when the landmark table is absent or empty, or when
/// the landmarks collapse to a zero-size box.
pub fn align_face(
    input: ImageInput,
    landmarks: Option<&LandmarkTable>,
    config: &AlignConfig,
) -> Result<Option<AlignedFace>, FaceError> {
    let image = decode::normalize(input)?;
    let Some(table) = landmarks.filter(|t| !t.is_empty()) else {
        log::debug!("no landmarks, skipping face alignment");
        return Ok(None);
    };

    let (image, landmarks, transform) = if config.rotate {
        let rotated = rotate_face(
            &image,
            table,
            &config.scheme,
            config.rotation_filter,
            config.border,
        )?;
        (rotated.image, rotated.landmarks, rotated.transform)
    } else {
        let identity = RotationTransform::about_image_center(image.width, image.height, 0.0);
        (image, table.clone(), identity)
    };

    let Some((crop, crop_box)) = crop_face_to_square(&image, Some(&landmarks), config.padding)
    else {
        return Ok(None);
    };
    if crop.is_empty() {
        log::debug!("degenerate landmark set, empty face crop {:?}", crop_box);
        return Ok(None);
    }

    let image = decode::resize_square(&crop, config.target_size, config.filter)?;

    Ok(Some(AlignedFace {
        image,
        landmarks,
        crop_box,
        transform,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::Landmark;

    fn tilted_eyes() -> LandmarkTable {
        LandmarkTable::new(vec![
            Landmark::new(33, 200.0, 240.0),
            Landmark::new(263, 300.0, 260.0),
            Landmark::new(1, 250.0, 330.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = AlignConfig::default();
        assert_eq!(config.padding, 0.2);
        assert_eq!(config.target_size, 512);
        assert!(config.rotate);
        assert_eq!(config.scheme, LandmarkScheme::MEDIAPIPE_FACE_MESH);
        assert_eq!(config.border, BorderMode::Constant([0, 0, 0]));
        assert_eq!(config.rotation_filter, InterpolationFilter::Lanczos3);
    }

    #[test]
    fn test_align_bilinear_rotation() {
        let mut img = DecodedImage::filled(512, 512, [0, 0, 0]);
        for y in 160..400 {
            for x in 140..370 {
                img.set_pixel(x, y, [90, 150, 210]);
            }
        }
        let config = AlignConfig {
            target_size: 64,
            padding: 0.0,
            rotation_filter: InterpolationFilter::Bilinear,
            ..AlignConfig::default()
        };

        let bilinear = align_face(img.clone().into(), Some(&tilted_eyes()), &config)
            .unwrap()
            .unwrap();
        let lanczos = align_face(
            img.into(),
            Some(&tilted_eyes()),
            &AlignConfig {
                rotation_filter: InterpolationFilter::Lanczos3,
                ..config
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!((bilinear.image.width, bilinear.image.height), (64, 64));
        // Same geometry, only the resampling differs
        assert_eq!(bilinear.crop_box, lanczos.crop_box);
        assert_eq!(bilinear.transform, lanczos.transform);
        // The crop lies inside the flat patch, so both filters reproduce it
        assert_eq!(bilinear.image.pixel(32, 32), Some([90, 150, 210]));
    }

    #[test]
    fn test_align_without_landmarks() {
        let img = DecodedImage::filled(64, 64, [0, 0, 0]);
        let config = AlignConfig::default();

        assert!(align_face(img.clone().into(), None, &config).unwrap().is_none());
        assert!(
            align_face(img.into(), Some(&LandmarkTable::empty()), &config)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_align_produces_target_size() {
        let img = DecodedImage::filled(512, 512, [100, 110, 120]);
        let config = AlignConfig {
            target_size: 128,
            ..AlignConfig::default()
        };

        let aligned = align_face(img.into(), Some(&tilted_eyes()), &config)
            .unwrap()
            .unwrap();

        assert_eq!((aligned.image.width, aligned.image.height), (128, 128));
        assert_eq!(aligned.crop_box.width, aligned.crop_box.height);
        assert!(aligned.crop_box.fits_within(512, 512));

        let left = aligned.landmarks.get(33).unwrap();
        let right = aligned.landmarks.get(263).unwrap();
        assert!((left.y - right.y).abs() < 1e-9);
        assert!(!aligned.transform.is_identity());
    }

    #[test]
    fn test_align_without_rotation() {
        let img = DecodedImage::filled(512, 512, [0, 0, 0]);
        let config = AlignConfig {
            rotate: false,
            target_size: 64,
            padding: 0.0,
            ..AlignConfig::default()
        };

        let aligned = align_face(img.into(), Some(&tilted_eyes()), &config)
            .unwrap()
            .unwrap();

        assert!(aligned.transform.is_identity());
        assert_eq!(aligned.landmarks, tilted_eyes());
        // Box (200, 240, 100, 90) -> square of side 100 centered on (250, 285)
        assert_eq!(aligned.crop_box, BoundingBox::new(200, 235, 100, 100));
    }

    #[test]
    fn test_align_missing_eye() {
        let img = DecodedImage::filled(64, 64, [0, 0, 0]);
        let table = LandmarkTable::new(vec![Landmark::new(1, 5.0, 5.0)]).unwrap();
        assert!(matches!(
            align_face(img.into(), Some(&table), &AlignConfig::default()),
            Err(FaceError::MissingLandmark { index: 33 })
        ));
    }

    #[test]
    fn test_align_degenerate_single_point() {
        let img = DecodedImage::filled(64, 64, [0, 0, 0]);
        let table = LandmarkTable::new(vec![Landmark::new(7, 20.0, 20.0)]).unwrap();
        let config = AlignConfig {
            rotate: false,
            ..AlignConfig::default()
        };
        assert!(align_face(img.into(), Some(&table), &config)
            .unwrap()
            .is_none());
    }
}
