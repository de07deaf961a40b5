use thiserror::Error;

use crate::decode::DecodeError;
use crate::transform::BoundingBox;

/// Errors raised by landmark-driven face operations.
#[derive(Debug, Error)]
pub enum FaceError {
    /// The image could not be normalized.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A landmark required by the operation is not in the table.
    #[error("Landmark {index} not found in landmark table")]
    MissingLandmark { index: u32 },

    /// Two landmarks share the same index.
    #[error("Duplicate landmark index {index}")]
    DuplicateLandmark { index: u32 },

    /// The face box extends past the image edges.
    #[error("Crop {bbox:?} exceeds {width}x{height} image bounds")]
    OutOfBoundsCrop {
        bbox: BoundingBox,
        width: u32,
        height: u32,
    },
}
