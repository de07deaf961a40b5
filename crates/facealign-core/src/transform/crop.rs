//! Pixel-space crop regions.
//!
//! Regions are integer rectangles in the source image's pixel grid with the
//! origin at the top-left corner. [`square_region`] derives the square face
//! crop from a bounding box, keeping the square at full size whenever the
//! image is large enough.

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;

/// An integer pixel region `(x, y, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Integer center, `(x + width / 2, y + height / 2)`.
    pub fn center(&self) -> (i64, i64) {
        (
            self.x as i64 + (self.width / 2) as i64,
            self.y as i64 + (self.height / 2) as i64,
        )
    }

    /// True if the region lies entirely inside a `width x height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }

    /// Intersect the region with a `width x height` image.
    pub fn clamp_to(&self, width: u32, height: u32) -> BoundingBox {
        let x = self.x.min(width);
        let y = self.y.min(height);
        let right = self.right().min(width as u64) as u32;
        let bottom = self.bottom().min(height as u64) as u32;
        BoundingBox::new(x, y, right - x, bottom - y)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Copy a pixel region out of an image.
///
/// The region is intersected with the image bounds first, so the output may
/// be smaller than requested (or empty).
pub fn crop_region(image: &DecodedImage, region: &BoundingBox) -> DecodedImage {
    let region = region.clamp_to(image.width, image.height);

    // Fast path: full-image region returns a clone
    if region.x == 0 && region.y == 0 && region.width == image.width && region.height == image.height
    {
        return image.clone();
    }

    let row_bytes = region.width as usize * 3;
    let mut output = Vec::with_capacity(row_bytes * region.height as usize);

    // Copy pixel data row by row
    for y in region.y..region.y + region.height {
        let start = (y as usize * image.width as usize + region.x as usize) * 3;
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    DecodedImage::new(region.width, region.height, output)
}

/// Derive a square region of side `max(width, height)` centered on `bbox`.
///
/// The square is shifted, not shrunk, when it crosses an image edge: a
/// deficit on one side is moved to the opposite side. The result is exactly
/// `side x side` whenever the image is at least `side` in both dimensions,
/// and limited to the image extent otherwise.
pub fn square_region(bbox: &BoundingBox, image_width: u32, image_height: u32) -> BoundingBox {
    let side = bbox.width.max(bbox.height) as i64;
    let (cx, cy) = bbox.center();

    let (x, width) = place_span(cx, side, image_width as i64);
    let (y, height) = place_span(cy, side, image_height as i64);

    if width != side || height != side {
        log::debug!(
            "square crop of side {} limited to {}x{} by {}x{} image",
            side,
            width,
            height,
            image_width,
            image_height
        );
    }

    BoundingBox::new(x as u32, y as u32, width as u32, height as u32)
}

/// Place a span of length `side` around `center` inside `[0, bound)`.
fn place_span(center: i64, side: i64, bound: i64) -> (i64, i64) {
    let mut end = center + side / 2;
    let mut start = end - side;

    if start < 0 {
        end -= start;
        start = 0;
    }
    if end > bound {
        start = (start - (end - bound)).max(0);
        end = bound;
    }

    (start, end - start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.push(v);
                pixels.push(v);
                pixels.push(v);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_bbox_edges_and_center() {
        let bbox = BoundingBox::new(10, 20, 31, 40);
        assert_eq!(bbox.right(), 41);
        assert_eq!(bbox.bottom(), 60);
        assert_eq!(bbox.center(), (25, 40));
    }

    #[test]
    fn test_fits_within() {
        let bbox = BoundingBox::new(10, 10, 90, 90);
        assert!(bbox.fits_within(100, 100));
        assert!(!bbox.fits_within(99, 100));
        assert!(!BoundingBox::new(u32::MAX, 0, 2, 1).fits_within(u32::MAX, 1));
    }

    #[test]
    fn test_clamp_to() {
        let bbox = BoundingBox::new(80, 90, 50, 50);
        assert_eq!(bbox.clamp_to(100, 100), BoundingBox::new(80, 90, 20, 10));
        assert!(BoundingBox::new(150, 0, 10, 10).clamp_to(100, 100).is_empty());
    }

    #[test]
    fn test_full_crop() {
        let img = test_image(100, 100);
        let result = crop_region(&img, &BoundingBox::new(0, 0, 100, 100));
        assert_eq!(result, img);
    }

    #[test]
    fn test_crop_pixel_values_preserved() {
        let img = test_image(10, 10);
        let result = crop_region(&img, &BoundingBox::new(2, 3, 4, 5));

        assert_eq!((result.width, result.height), (4, 5));
        // Value at (2, 3) = 3 * 10 + 2 = 32
        assert_eq!(result.pixel(0, 0), Some([32, 32, 32]));
        // Value at (5, 7) = 75
        assert_eq!(result.pixel(3, 4), Some([75, 75, 75]));
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let img = test_image(10, 10);
        let result = crop_region(&img, &BoundingBox::new(8, 8, 5, 5));
        assert_eq!((result.width, result.height), (2, 2));
    }

    #[test]
    fn test_square_region_interior() {
        let bbox = BoundingBox::new(180, 250, 140, 0);
        assert_eq!(
            square_region(&bbox, 512, 512),
            BoundingBox::new(180, 180, 140, 140)
        );
    }

    #[test]
    fn test_square_region_odd_side_shifts_left() {
        // side 5, center 12: end = 14, start = 9
        let bbox = BoundingBox::new(10, 10, 5, 5);
        assert_eq!(square_region(&bbox, 100, 100), BoundingBox::new(9, 9, 5, 5));
    }

    #[test]
    fn test_square_region_left_edge_pushes_right() {
        let bbox = BoundingBox::new(0, 40, 20, 60);
        let region = square_region(&bbox, 200, 200);
        assert_eq!(region, BoundingBox::new(0, 40, 60, 60));
    }

    #[test]
    fn test_square_region_bottom_right_corner_pulls_back() {
        let bbox = BoundingBox::new(170, 180, 30, 20);
        let region = square_region(&bbox, 200, 200);
        assert_eq!(region, BoundingBox::new(170, 170, 30, 30));
    }

    #[test]
    fn test_square_region_box_beyond_image() {
        let bbox = BoundingBox::new(300, 10, 40, 40);
        let region = square_region(&bbox, 200, 200);
        assert_eq!(region, BoundingBox::new(160, 10, 40, 40));
    }

    #[test]
    fn test_square_region_image_too_small() {
        let bbox = BoundingBox::new(0, 0, 80, 30);
        let region = square_region(&bbox, 100, 50);
        assert_eq!(region, BoundingBox::new(0, 0, 80, 50));
    }

    #[test]
    fn test_square_region_zero_size() {
        let bbox = BoundingBox::new(5, 5, 0, 0);
        assert!(square_region(&bbox, 10, 10).is_empty());
    }

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (16u32..400, 16u32..400)
    }

    proptest! {
        /// Property: the square keeps its full size when the image allows it.
        #[test]
        fn prop_square_region_full_size(
            (width, height) in dimensions_strategy(),
            x in 0u32..400,
            y in 0u32..400,
            bw in 0u32..200,
            bh in 0u32..200,
        ) {
            let bbox = BoundingBox::new(x, y, bw, bh);
            let side = bw.max(bh);
            let region = square_region(&bbox, width, height);

            prop_assert!(region.fits_within(width, height));
            prop_assert_eq!(region.width, side.min(width));
            prop_assert_eq!(region.height, side.min(height));
        }

        /// Property: cropping a derived square yields exactly the region size.
        #[test]
        fn prop_crop_matches_region(
            (width, height) in dimensions_strategy(),
            x in 0u32..400,
            y in 0u32..400,
            side in 1u32..16,
        ) {
            let img = DecodedImage::filled(width, height, [1, 2, 3]);
            let region = square_region(&BoundingBox::new(x, y, side, side), width, height);
            let crop = crop_region(&img, &region);

            prop_assert_eq!((crop.width, crop.height), (side, side));
            prop_assert_eq!(crop.pixels.len(), (side * side * 3) as usize);
        }
    }
}
