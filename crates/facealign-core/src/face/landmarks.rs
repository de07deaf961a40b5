//! Landmark tables and landmark indexing schemes.
//!
//! A [`LandmarkTable`] is the output of an external landmark detector: an
//! ordered set of `(index, x, y)` records in the pixel space of the image it
//! was detected on. Indices are unique within a table. Which index means
//! "left eye center" depends on the detector, so that mapping lives in a
//! [`LandmarkScheme`] instead of the geometry code.

use serde::{Deserialize, Serialize};

use super::FaceError;

/// A single landmark point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Detector-specific semantic id.
    pub index: u32,
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub const fn new(index: u32, x: f64, y: f64) -> Self {
        Self { index, x, y }
    }
}

/// An ordered collection of landmarks with unique indices.
///
/// An empty table is a valid "no landmarks" state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkTable {
    points: Vec<Landmark>,
}

impl LandmarkTable {
    /// Build a table, rejecting duplicate indices.
    pub fn new(points: Vec<Landmark>) -> Result<Self, FaceError> {
        let mut seen = std::collections::HashSet::with_capacity(points.len());
        if let Some(dup) = points.iter().find(|p| !seen.insert(p.index)) {
            return Err(FaceError::DuplicateLandmark { index: dup.index });
        }
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.points.iter()
    }

    /// Look up a landmark by its semantic index.
    pub fn get(&self, index: u32) -> Option<&Landmark> {
        self.points.iter().find(|p| p.index == index)
    }

    /// Look up a landmark, failing with `MissingLandmark` if absent.
    pub fn require(&self, index: u32) -> Result<&Landmark, FaceError> {
        self.get(index).ok_or(FaceError::MissingLandmark { index })
    }

    /// Tight bounds `(min_x, min_y, max_x, max_y)`, or `None` when empty.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.points.first()?;
        Some(self.points.iter().fold(
            (first.x, first.y, first.x, first.y),
            |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
            },
        ))
    }

    /// Map every coordinate through `f`, keeping indices and order.
    pub fn map_coords(&self, mut f: impl FnMut(f64, f64) -> (f64, f64)) -> LandmarkTable {
        let points = self
            .points
            .iter()
            .map(|p| {
                let (x, y) = f(p.x, p.y);
                Landmark::new(p.index, x, y)
            })
            .collect();
        LandmarkTable { points }
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkTable {
    type Error = FaceError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<LandmarkTable> for Vec<Landmark> {
    fn from(table: LandmarkTable) -> Self {
        table.points
    }
}

/// Semantic landmarks the geometry pipeline needs to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacePoint {
    LeftEyeCenter,
    RightEyeCenter,
}

/// Mapping from semantic face points to a detector's landmark indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkScheme {
    pub left_eye_center: u32,
    pub right_eye_center: u32,
}

impl LandmarkScheme {
    /// MediaPipe Face Mesh indexing: left eye 33, right eye 263.
    pub const MEDIAPIPE_FACE_MESH: LandmarkScheme = LandmarkScheme {
        left_eye_center: 33,
        right_eye_center: 263,
    };

    pub const fn new(left_eye_center: u32, right_eye_center: u32) -> Self {
        Self {
            left_eye_center,
            right_eye_center,
        }
    }

    pub fn index_of(&self, point: FacePoint) -> u32 {
        match point {
            FacePoint::LeftEyeCenter => self.left_eye_center,
            FacePoint::RightEyeCenter => self.right_eye_center,
        }
    }
}

impl Default for LandmarkScheme {
    fn default() -> Self {
        Self::MEDIAPIPE_FACE_MESH
    }
}
