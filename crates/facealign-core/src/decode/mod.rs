//! Input normalization and resizing.
//!
//! This module provides functionality for:
//! - Converting tensors, pixel arrays, decoded images and encoded bytes into
//!   the canonical 8-bit RGB image
//! - Decoding JPEG/PNG bytes with EXIF orientation applied
//! - Center-crop square resizing for fixed-size model input
//!
//! # Examples
//!
//! ```ignore
//! use facealign_core::decode::{normalize, resize_square, FilterType, PixelArray};
//!
//! let array = PixelArray::from_u8(vec![480, 640, 4], rgba_bytes);
//! let image = normalize(array.into())?;
//! let square = resize_square(&image, 512, FilterType::Lanczos3)?;
//! ```

mod encoded;
mod normalize;
mod resize;
mod types;

pub use encoded::{decode_image, get_orientation};
pub use normalize::{normalize, ImageInput, PixelArray, Samples, Tensor};
pub use resize::{center_square, center_square_crop, resize, resize_square};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
