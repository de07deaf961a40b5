//! Pixel-space geometric transforms: rotation and cropping.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, x to the right, y down
//! - Pixel centers sit on integer coordinates
//! - Rotation angles are in degrees, positive = counter-clockwise on screen
//! - Crop regions are integer pixel rectangles

mod crop;
mod rotation;

pub use crop::{crop_region, square_region, BoundingBox};
pub use rotation::{
    rotate_about_center, warp_affine, AffineMatrix, BorderMode, InterpolationFilter,
    RotationTransform,
};
