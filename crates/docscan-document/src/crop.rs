// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective crop. Warps the quadrilateral outlined by four corner points
// onto an upright rectangle.

use docscan_core::error::{Result, ScanError};
use docscan_core::types::Quad;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{info, instrument, warn};

/// Largest crop side, as a multiple of the photo's longer side. Corners may
/// sit outside the photo, but not so far that the output dwarfs it.
const MAX_OUTPUT_SCALE: f32 = 4.0;

/// Crops a photo to a document outline given in pixel coordinates.
///
/// Corners are expected in winding order starting top-left (top-left,
/// top-right, bottom-right, bottom-left). Corners outside the photo are
/// allowed; the uncovered area is filled with white.
pub struct QuadCropper {
    image: DynamicImage,
}

impl QuadCropper {
    /// Load the photo at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let image = image::open(path.as_ref()).map_err(|err| {
            ScanError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = image.width(), height = image.height(), "photo loaded for crop");
        Ok(Self { image })
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Warp the outlined region to a rectangle sized by the longest opposite
    /// edges of the quadrilateral.
    #[instrument(skip(self))]
    pub fn crop(&self, corners: &Quad) -> Result<DynamicImage> {
        let src = corners.to_f32_pairs();
        let area = shoelace_area(&src);
        if area < 1.0 {
            warn!(area, "corner outline encloses no area");
            return Err(ScanError::CropFailed(format!(
                "corner outline encloses no area ({area:.1} px²)"
            )));
        }
        let max_side = self.image.width().max(self.image.height()).max(1) as f32 * MAX_OUTPUT_SCALE;
        let (out_w, out_h) = output_size(&src, max_side)?;

        let dest: [(f32, f32); 4] = [
            (0.0, 0.0),
            (out_w as f32, 0.0),
            (out_w as f32, out_h as f32),
            (0.0, out_h as f32),
        ];

        let Some(projection) = Projection::from_control_points(src, dest) else {
            warn!("corners do not define a projective transform");
            return Err(ScanError::CropFailed(
                "corner points are collinear or coincident".into(),
            ));
        };

        let rgba_input = self.image.to_rgba8();
        let mut output = RgbaImage::new(out_w, out_h);
        warp_into(
            &rgba_input,
            &projection,
            Interpolation::Bilinear,
            Rgba([255u8, 255, 255, 255]),
            &mut output,
        );

        info!(out_w, out_h, "perspective crop applied");
        Ok(DynamicImage::ImageRgba8(output))
    }
}

/// Output rectangle for a quad: width is the longer of the top and bottom
/// edges, height the longer of the left and right edges. Never zero.
///
/// Fails with `CropFailed` when either side exceeds `max_side`.
fn output_size(corners: &[(f32, f32); 4], max_side: f32) -> Result<(u32, u32)> {
    let [tl, tr, br, bl] = *corners;
    let width = distance(tl, tr).max(distance(bl, br));
    let height = distance(tl, bl).max(distance(tr, br));
    if !(width.is_finite() && height.is_finite()) || width > max_side || height > max_side {
        warn!(width, height, max_side, "crop output too large");
        return Err(ScanError::CropFailed(format!(
            "corner outline spans {width:.0}x{height:.0} px, more than the {max_side:.0} px limit"
        )));
    }
    Ok((
        (width.round() as u32).max(1),
        (height.round() as u32).max(1),
    ))
}

/// Area of the quadrilateral via the shoelace formula.
fn shoelace_area(corners: &[(f32, f32); 4]) -> f32 {
    let mut sum = 0.0f32;
    for i in 0..4 {
        let (x1, y1) = corners[i];
        let (x2, y2) = corners[(i + 1) % 4];
        sum += x1 * y2 - x2 * y1;
    }
    sum.abs() / 2.0
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_core::types::Point;

    fn quad(points: [(f64, f64); 4]) -> Quad {
        Quad(points.map(Point::from))
    }

    #[test]
    fn output_size_uses_longest_edges() {
        let corners = [(0.0, 0.0), (100.0, 0.0), (90.0, 60.0), (10.0, 50.0)];
        let (w, h) = output_size(&corners, 1000.0).unwrap();
        assert_eq!(w, 100);
        assert_eq!(h, 61);
    }

    #[test]
    fn corners_slightly_outside_the_photo_are_cropped() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let cropper = QuadCropper::from_dynamic(DynamicImage::ImageRgba8(img));
        let out = cropper
            .crop(&quad([(-5.0, -5.0), (15.0, -5.0), (15.0, 15.0), (-5.0, 15.0)]))
            .unwrap();
        assert_eq!((out.width(), out.height()), (20, 20));
    }

    #[test]
    fn far_away_corners_fail_before_allocating() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let cropper = QuadCropper::from_dynamic(DynamicImage::ImageRgba8(img));
        let err = cropper
            .crop(&quad([(0.0, 0.0), (1e10, 0.0), (1e10, 1e10), (0.0, 1e10)]))
            .unwrap_err();
        assert!(matches!(err, ScanError::CropFailed(ref msg) if msg.contains("limit")));

        // 10 px photo allows at most 40 px per side.
        let err = cropper
            .crop(&quad([(0.0, 0.0), (41.0, 0.0), (41.0, 10.0), (0.0, 10.0)]))
            .unwrap_err();
        assert!(matches!(err, ScanError::CropFailed(_)));
    }

    #[test]
    fn axis_aligned_crop_keeps_region_size() {
        let mut img = RgbaImage::from_pixel(100, 100, Rgba([20, 20, 20, 255]));
        for y in 20..80 {
            for x in 10..90 {
                img.put_pixel(x, y, Rgba([240, 240, 240, 255]));
            }
        }
        let cropper = QuadCropper::from_dynamic(DynamicImage::ImageRgba8(img));

        let out = cropper
            .crop(&quad([(10.0, 20.0), (90.0, 20.0), (90.0, 80.0), (10.0, 80.0)]))
            .unwrap();
        assert_eq!((out.width(), out.height()), (80, 60));

        let centre = out.to_rgba8().get_pixel(40, 30).0;
        assert!(centre[0] > 200, "expected the bright page, got {centre:?}");
    }

    #[test]
    fn shoelace_area_rectangle() {
        let corners = [(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0)];
        assert!((shoelace_area(&corners) - 12.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_corners_fail() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let cropper = QuadCropper::from_dynamic(DynamicImage::ImageRgba8(img));
        let err = cropper
            .crop(&quad([(1.0, 1.0), (1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]))
            .unwrap_err();
        assert!(matches!(err, ScanError::CropFailed(_)));
    }
}
