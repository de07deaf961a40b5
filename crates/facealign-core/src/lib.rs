//! Facealign Core - face crop geometry from facial landmarks
//!
//! This crate turns an image plus a table of facial landmarks into a
//! fixed-size, rotation-normalized face image for a downstream
//! restoration model. It covers input normalization, landmark bounding
//! boxes, eye-leveling rotation of image and landmarks together, square
//! face crops and square resizing.
//!
//! All operations are synchronous pure functions over owned images.

pub mod decode;
pub mod face;
pub mod transform;

pub use decode::{normalize, DecodeError, DecodedImage, ImageInput, PixelArray, Tensor};
pub use face::{
    align_face, crop_face, crop_face_to_square, face_bounding_box, resize_image,
    rotate_image_and_landmarks, rotation_angle, AlignConfig, AlignedFace, FaceError, Landmark,
    LandmarkScheme, LandmarkTable,
};
pub use transform::{BorderMode, BoundingBox, RotationTransform};
