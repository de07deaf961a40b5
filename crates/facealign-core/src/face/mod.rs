//! Landmark-driven face geometry.
//!
//! The operations compose linearly:
//!
//! 1. [`normalize`](crate::decode::normalize) the input image
//! 2. [`face_bounding_box`] from the landmarks
//! 3. optionally [`rotate_image_and_landmarks`] to level the eyes
//! 4. [`crop_face_to_square`] around the (rotated) landmarks
//! 5. [`resize_image`] / [`resize_square`](crate::decode::resize_square) to the model size
//!
//! [`align_face`] runs the whole chain with an [`AlignConfig`].

mod align;
mod error;
mod geometry;
mod landmarks;

pub use align::{align_face, AlignConfig, AlignedFace};
pub use error::FaceError;
pub use geometry::{
    crop_face, crop_face_to_square, face_bounding_box, resize_image, rotate_image_and_landmarks,
    rotation_angle, RotatedFace,
};
pub use landmarks::{FacePoint, Landmark, LandmarkScheme, LandmarkTable};
