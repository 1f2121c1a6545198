// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop/CI bridge: a file stands in for the camera, and the crop runs
// in-process through `docscan-document`.
//
// There is no edge detector on desktop. The bridge reports whichever corners
// it was configured with, which lets a driver exercise the full editor flow.

use std::path::{Path, PathBuf};

use docscan_core::error::Result;
use docscan_core::types::{
    CaptureOptions, CapturedPhoto, Detection, PhotoRef, Point, Quad, Viewport,
};
use docscan_document::{PhotoStore, QuadCropper};
use tracing::{debug, info};

use crate::traits::*;

/// File-backed scanner bridge.
pub struct DesktopBridge {
    source: PathBuf,
    store: PhotoStore,
    /// Raw detector output, in photo pixels.
    points: Vec<Point>,
}

impl DesktopBridge {
    /// Bridge whose "camera" copies `source` into `work_dir` on every capture.
    pub fn new(source: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            source: source.into(),
            store: PhotoStore::open(work_dir)?,
            points: Vec::new(),
        })
    }

    /// Report `corners` (pixel space) from every detection.
    pub fn with_corners(self, corners: Quad) -> Self {
        self.with_points(corners.corners().to_vec())
    }

    /// Report `points` as the raw detector output. Anything but zero or four
    /// points is a failed detection, as with a native detector.
    pub fn with_points(mut self, points: Vec<Point>) -> Self {
        self.points = points;
        self
    }

    pub fn work_dir(&self) -> &Path {
        self.store.dir()
    }
}

impl ScannerBridge for DesktopBridge {
    fn platform_name(&self) -> &str {
        "Desktop (file)"
    }
}

impl NativeCamera for DesktopBridge {
    fn capture_photo(&self, options: &CaptureOptions) -> Result<CapturedPhoto> {
        debug!(options = ?options, "desktop camera ignores capture options");
        self.store.import(&self.source)
    }
}

impl NativeEdgeDetector for DesktopBridge {
    fn detect_edges(&self, photo: &PhotoRef, viewport: &Viewport) -> Result<Detection> {
        let detection = Detection::from_points(&self.points)?;
        info!(
            photo = %photo,
            width = viewport.width,
            height = viewport.height,
            found = detection.is_found(),
            "desktop edge detection"
        );
        Ok(detection)
    }
}

impl NativeCropper for DesktopBridge {
    fn crop(&self, photo: &PhotoRef, corners: &Quad) -> Result<PhotoRef> {
        let cropped = QuadCropper::open(photo.path())?.crop(corners)?;
        self.store.save_png("cropped", &cropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_core::ScanError;
    use image::{Rgb, RgbImage};

    fn bridge_with_photo(dir: &Path) -> DesktopBridge {
        let source = dir.join("page.png");
        RgbImage::from_pixel(200, 200, Rgb([230, 230, 230]))
            .save(&source)
            .unwrap();
        DesktopBridge::new(source, dir.join("work")).unwrap()
    }

    #[test]
    fn capture_then_crop_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let corners = Quad([
            Point::new(10.0, 10.0),
            Point::new(100.0, 10.0),
            Point::new(100.0, 100.0),
            Point::new(10.0, 100.0),
        ]);
        let bridge = bridge_with_photo(dir.path()).with_corners(corners);

        let captured = bridge.capture_photo(&CaptureOptions::default()).unwrap();
        assert_eq!((captured.width, captured.height), (200, 200));

        let detection = bridge
            .detect_edges(&captured.photo, &Viewport::sized(400.0, 400.0))
            .unwrap();
        assert_eq!(detection, Detection::Found(corners));

        let cropped = bridge.crop(&captured.photo, &corners).unwrap();
        assert_eq!(image::image_dimensions(cropped.path()).unwrap(), (90, 90));
    }

    #[test]
    fn no_corners_means_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_with_photo(dir.path());
        let captured = bridge.capture_photo(&CaptureOptions::default()).unwrap();
        let detection = bridge
            .detect_edges(&captured.photo, &Viewport::default())
            .unwrap();
        assert_eq!(detection, Detection::NotFound);
    }

    #[test]
    fn malformed_detector_output_fails() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_with_photo(dir.path())
            .with_points(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]);
        let captured = bridge.capture_photo(&CaptureOptions::default()).unwrap();
        let err = bridge
            .detect_edges(&captured.photo, &Viewport::default())
            .unwrap_err();
        assert!(matches!(err, ScanError::DetectionFailed(_)));
    }

    #[test]
    fn crop_far_outside_the_photo_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = bridge_with_photo(dir.path());
        let captured = bridge.capture_photo(&CaptureOptions::default()).unwrap();
        let far = Quad([
            Point::new(0.0, 0.0),
            Point::new(1e10, 0.0),
            Point::new(1e10, 1e10),
            Point::new(0.0, 1e10),
        ]);
        let err = bridge.crop(&captured.photo, &far).unwrap_err();
        assert!(matches!(err, ScanError::CropFailed(_)));
    }
}
