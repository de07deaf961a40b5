//! Image rotation about the image center with bilinear and Lanczos3 interpolation.
//!
//! # Algorithm
//!
//! A [`RotationTransform`] holds a 2x3 affine matrix `M` that maps source
//! pixel coordinates to destination coordinates:
//!
//! ```text
//! | alpha  beta  tx |      alpha = cos(angle)
//! | -beta  alpha ty |      beta  = sin(angle)
//!
//! tx = (1 - alpha) * cx - beta * cy
//! ty = beta * cx + (1 - alpha) * cy
//! ```
//!
//! A positive angle rotates the content counter-clockwise on screen. The
//! warp uses inverse mapping: for each destination pixel, `M^-1` gives the
//! source position, which is then interpolated. Points (landmarks) are mapped
//! forward through the same `M`, so pixels and points stay in registration.

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;

/// A 2x3 affine matrix in row-major order.
pub type AffineMatrix = [[f64; 3]; 2];

const IDENTITY: AffineMatrix = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// Interpolation filter for rotation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation.
    Bilinear,
    /// High-quality Lanczos3 interpolation (6x6 neighborhood).
    #[default]
    Lanczos3,
}

/// How pixels outside the source image are filled during a warp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderMode {
    /// Fill with a constant RGB color.
    Constant([u8; 3]),
    /// Repeat the nearest edge pixel.
    Replicate,
}

impl Default for BorderMode {
    fn default() -> Self {
        BorderMode::Constant([0, 0, 0])
    }
}

/// A rotation about a center point, with the affine matrix it induces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTransform {
    /// Rotation angle in degrees (positive = counter-clockwise).
    pub angle_degrees: f64,
    /// Center of rotation in pixel coordinates.
    pub center: (f64, f64),
    /// Source-to-destination matrix.
    pub matrix: AffineMatrix,
}

impl RotationTransform {
    /// Build the rotation matrix for `angle_degrees` about `center` with the
    /// given isotropic `scale`.
    pub fn new(center: (f64, f64), angle_degrees: f64, scale: f64) -> Self {
        let angle = angle_degrees.to_radians();
        let alpha = scale * angle.cos();
        let beta = scale * angle.sin();
        let (cx, cy) = center;

        let tx = (1.0 - alpha) * cx - beta * cy;
        let ty = beta * cx + (1.0 - alpha) * cy;

        Self {
            angle_degrees,
            center,
            matrix: [[alpha, beta, tx], [-beta, alpha, ty]],
        }
    }

    /// Rotation about the center of a `width x height` image, scale 1.0.
    ///
    /// The center uses integer halves, `(width / 2, height / 2)`.
    pub fn about_image_center(width: u32, height: u32, angle_degrees: f64) -> Self {
        let center = ((width / 2) as f64, (height / 2) as f64);
        Self::new(center, angle_degrees, 1.0)
    }

    /// Map a source point to destination coordinates.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        apply_affine(&self.matrix, x, y)
    }

    /// The destination-to-source matrix.
    pub fn inverse(&self) -> AffineMatrix {
        invert_affine(&self.matrix)
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == IDENTITY
    }
}

#[inline]
fn apply_affine(m: &AffineMatrix, x: f64, y: f64) -> (f64, f64) {
    (
        m[0][0] * x + m[0][1] * y + m[0][2],
        m[1][0] * x + m[1][1] * y + m[1][2],
    )
}

/// Invert a 2x3 affine matrix. A singular matrix inverts to all zeros.
fn invert_affine(m: &AffineMatrix) -> AffineMatrix {
    let [[a, b, c], [d, e, f]] = *m;

    let determinant = a * e - b * d;
    let inv_det = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let na = e * inv_det;
    let nb = -b * inv_det;
    let nd = -d * inv_det;
    let ne = a * inv_det;
    let nc = -(na * c + nb * f);
    let nf = -(nd * c + ne * f);

    [[na, nb, nc], [nd, ne, nf]]
}

/// Rotate an image about its center, keeping the original width and height.
///
/// Corners rotated out of the frame are lost; newly exposed areas are filled
/// according to `border`. Returns the rotated image and the transform that
/// was applied, so callers can map points with the identical matrix.
pub fn rotate_about_center(
    image: &DecodedImage,
    angle_degrees: f64,
    filter: InterpolationFilter,
    border: BorderMode,
) -> (DecodedImage, RotationTransform) {
    let transform = RotationTransform::about_image_center(image.width, image.height, angle_degrees);
    let rotated = warp_affine(image, &transform, image.width, image.height, filter, border);
    (rotated, transform)
}

/// Warp an image through `transform` into a `width x height` canvas.
pub fn warp_affine(
    image: &DecodedImage,
    transform: &RotationTransform,
    width: u32,
    height: u32,
    filter: InterpolationFilter,
    border: BorderMode,
) -> DecodedImage {
    // Fast path: identity on the same canvas
    if transform.is_identity() && width == image.width && height == image.height {
        return image.clone();
    }

    if image.is_empty() {
        return DecodedImage::filled(width, height, border_fill(border));
    }

    let inverse = transform.inverse();
    let mut output = Vec::with_capacity(width as usize * height as usize * 3);

    for dst_y in 0..height {
        for dst_x in 0..width {
            let (src_x, src_y) = apply_affine(&inverse, dst_x as f64, dst_y as f64);

            let pixel = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y, border),
                InterpolationFilter::Lanczos3 => sample_lanczos3(image, src_x, src_y, border),
            };
            output.extend_from_slice(&pixel);
        }
    }

    DecodedImage::new(width, height, output)
}

fn border_fill(border: BorderMode) -> [u8; 3] {
    match border {
        BorderMode::Constant(rgb) => rgb,
        BorderMode::Replicate => [0, 0, 0],
    }
}

/// Fetch a pixel as `[f64; 3]`, resolving out-of-range coordinates by `border`.
#[inline]
fn fetch(image: &DecodedImage, px: i64, py: i64, border: BorderMode) -> [f64; 3] {
    let (w, h) = (image.width as i64, image.height as i64);

    let (px, py) = if px >= 0 && px < w && py >= 0 && py < h {
        (px, py)
    } else {
        match border {
            BorderMode::Constant(rgb) => return rgb.map(f64::from),
            BorderMode::Replicate => (px.clamp(0, w - 1), py.clamp(0, h - 1)),
        }
    };

    let idx = (py as usize * image.width as usize + px as usize) * 3;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
    ]
}

#[inline]
fn to_u8(v: f64) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

/// Sample a pixel using bilinear interpolation over the 4 nearest pixels.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64, border: BorderMode) -> [u8; 3] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = fetch(image, x0, y0, border);
    let p10 = fetch(image, x0 + 1, y0, border);
    let p01 = fetch(image, x0, y0 + 1, border);
    let p11 = fetch(image, x0 + 1, y0 + 1, border);

    std::array::from_fn(|i| {
        to_u8(
            p00[i] * (1.0 - fx) * (1.0 - fy)
                + p10[i] * fx * (1.0 - fy)
                + p01[i] * (1.0 - fx) * fy
                + p11[i] * fx * fy,
        )
    })
}

/// Sample a pixel using Lanczos3 interpolation over a 6x6 neighborhood.
///
/// Weights are renormalized so flat regions stay flat.
fn sample_lanczos3(image: &DecodedImage, x: f64, y: f64, border: BorderMode) -> [u8; 3] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let wx: [f64; 6] = std::array::from_fn(|k| lanczos_weight(x - (x0 + k as i64 - 2) as f64, 3.0));
    let wy: [f64; 6] = std::array::from_fn(|k| lanczos_weight(y - (y0 + k as i64 - 2) as f64, 3.0));

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for (ky, &weight_y) in wy.iter().enumerate() {
        if weight_y == 0.0 {
            continue;
        }
        let py = y0 + ky as i64 - 2;
        for (kx, &weight_x) in wx.iter().enumerate() {
            let weight = weight_x * weight_y;
            if weight == 0.0 {
                continue;
            }
            let pixel = fetch(image, x0 + kx as i64 - 2, py, border);
            sum[0] += pixel[0] * weight;
            sum[1] += pixel[1] * weight;
            sum[2] += pixel[2] * weight;
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return sample_bilinear(image, x, y, border);
    }

    sum.map(|s| to_u8(s / weight_sum))
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a simple test image with a gradient pattern.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 8) as u8;
                pixels.push(v);
                pixels.push(v);
                pixels.push(v);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    /// Black image with a white square block centered on each point.
    fn image_with_blocks(width: u32, height: u32, points: &[(u32, u32)]) -> DecodedImage {
        let mut img = DecodedImage::filled(width, height, [0, 0, 0]);
        for &(px, py) in points {
            for y in py - 2..=py + 2 {
                for x in px - 2..=px + 2 {
                    img.set_pixel(x, y, [255, 255, 255]);
                }
            }
        }
        img
    }

    fn assert_close(a: (f64, f64), b: (f64, f64)) {
        assert!(
            (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_zero_angle_is_identity() {
        let transform = RotationTransform::about_image_center(100, 50, 0.0);
        assert!(transform.is_identity());
        assert_eq!(transform.center, (50.0, 25.0));
    }

    #[test]
    fn test_center_uses_integer_halves() {
        let transform = RotationTransform::about_image_center(101, 51, 30.0);
        assert_eq!(transform.center, (50.0, 25.0));
        // The center is a fixed point of the rotation
        assert_close(transform.apply(50.0, 25.0), (50.0, 25.0));
    }

    #[test]
    fn test_positive_angle_is_counter_clockwise_on_screen() {
        let transform = RotationTransform::new((0.0, 0.0), 90.0, 1.0);
        // A point to the right of the center moves up (negative y)
        assert_close(transform.apply(10.0, 0.0), (0.0, -10.0));
    }

    #[test]
    fn test_rotation_levels_its_own_angle() {
        let (dx, dy) = (40.0f64, 20.0f64);
        let angle = dy.atan2(dx).to_degrees();
        let transform = RotationTransform::new((0.0, 0.0), angle, 1.0);
        let (x, y) = transform.apply(dx, dy);

        assert!(y.abs() < 1e-9);
        assert!((x - dx.hypot(dy)).abs() < 1e-9);
    }

    #[test]
    fn test_inverse_composes_to_identity() {
        let transform = RotationTransform::about_image_center(64, 48, 23.5);
        let inverse = transform.inverse();

        let (x, y) = transform.apply(7.25, 31.5);
        assert_close(apply_affine(&inverse, x, y), (7.25, 31.5));
    }

    #[test]
    fn test_singular_matrix_inverts_to_zero() {
        let singular = RotationTransform::new((3.0, 4.0), 0.0, 0.0);
        assert_eq!(singular.inverse(), [[0.0; 3]; 2]);
    }

    #[test]
    fn test_no_rotation_returns_copy() {
        let img = test_image(100, 50);
        let (result, transform) =
            rotate_about_center(&img, 0.0, InterpolationFilter::Lanczos3, BorderMode::default());

        assert!(transform.is_identity());
        assert_eq!(result, img);
    }

    #[test]
    fn test_rotation_keeps_dimensions() {
        let img = test_image(80, 40);
        for angle in [15.0, 45.0, -90.0, 180.0] {
            let (result, _) =
                rotate_about_center(&img, angle, InterpolationFilter::Lanczos3, BorderMode::default());
            assert_eq!((result.width, result.height), (80, 40));
            assert_eq!(result.pixels.len(), img.pixels.len());
        }
    }

    #[test]
    fn test_constant_border_fills_exposed_corners() {
        let img = DecodedImage::filled(40, 40, [200, 200, 200]);
        let border = BorderMode::Constant([10, 20, 30]);
        let (result, _) = rotate_about_center(&img, 45.0, InterpolationFilter::Lanczos3, border);

        // The corner maps far outside the source
        assert_eq!(result.pixel(0, 0), Some([10, 20, 30]));
        // The center stays inside
        assert_eq!(result.pixel(20, 20), Some([200, 200, 200]));
    }

    #[test]
    fn test_replicate_border_keeps_flat_image_flat() {
        let img = DecodedImage::filled(30, 20, [90, 60, 30]);
        for filter in [InterpolationFilter::Bilinear, InterpolationFilter::Lanczos3] {
            let (result, _) = rotate_about_center(&img, 33.0, filter, BorderMode::Replicate);
            assert!(
                result.pixels.chunks_exact(3).all(|px| px == [90, 60, 30]),
                "{:?} changed a flat image",
                filter
            );
        }
    }

    #[test]
    fn test_rotated_points_land_on_rotated_pixels() {
        let points = [(30u32, 40u32), (70, 60), (50, 25)];
        let img = image_with_blocks(101, 101, &points);

        for filter in [InterpolationFilter::Bilinear, InterpolationFilter::Lanczos3] {
            let (result, transform) = rotate_about_center(&img, 26.5, filter, BorderMode::default());

            for &(px, py) in &points {
                let (x, y) = transform.apply(px as f64, py as f64);
                let value = result.pixel(x.round() as u32, y.round() as u32).unwrap();
                assert!(
                    value[0] > 180,
                    "{:?}: ({}, {}) -> ({:.1}, {:.1}) has value {:?}",
                    filter,
                    px,
                    py,
                    x,
                    y,
                    value
                );
            }
        }
    }

    #[test]
    fn test_bilinear_vs_lanczos_same_dimensions() {
        let img = test_image(50, 50);

        let (bilinear, _) =
            rotate_about_center(&img, 15.0, InterpolationFilter::Bilinear, BorderMode::default());
        let (lanczos, _) =
            rotate_about_center(&img, 15.0, InterpolationFilter::Lanczos3, BorderMode::default());

        assert_eq!(bilinear.width, lanczos.width);
        assert_eq!(bilinear.height, lanczos.height);
    }

    #[test]
    fn test_small_images_do_not_panic() {
        for (w, h) in [(1, 1), (4, 4), (100, 1), (1, 100)] {
            let img = test_image(w, h);
            let (result, _) =
                rotate_about_center(&img, 30.0, InterpolationFilter::Lanczos3, BorderMode::Replicate);
            assert_eq!((result.width, result.height), (w, h));
        }
    }

    #[test]
    fn test_empty_image_rotation() {
        let img = DecodedImage::new(0, 0, vec![]);
        let (result, _) =
            rotate_about_center(&img, 30.0, InterpolationFilter::Lanczos3, BorderMode::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_lanczos_weight_at_zero() {
        let w = lanczos_weight(0.0, 3.0);
        assert!((w - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_at_boundary() {
        let w = lanczos_weight(3.0, 3.0);
        assert!(w.abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_symmetry() {
        let w1 = lanczos_weight(1.5, 3.0);
        let w2 = lanczos_weight(-1.5, 3.0);
        assert!((w1 - w2).abs() < 1e-10);
    }
}
