// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the native scanning capabilities.
//
// All calls are blocking: native modules answer on their own threads and the
// session runs them off the async executor.

use docscan_core::error::Result;
use docscan_core::types::{CaptureOptions, CapturedPhoto, Detection, PhotoRef, Quad, Viewport};

/// Unified bridge that groups the three native services a scan needs.
pub trait ScannerBridge: NativeCamera + NativeEdgeDetector + NativeCropper + Send + Sync {
    /// Human-readable platform name (e.g. "iOS 17", "Android 14").
    fn platform_name(&self) -> &str;
}

/// Take photos with the device camera.
pub trait NativeCamera {
    /// Capture a photo and store it as a transient file.
    ///
    /// `options` are forwarded untouched to the platform camera.
    fn capture_photo(&self, options: &CaptureOptions) -> Result<CapturedPhoto>;
}

/// Locate the outline of a document in a photo.
pub trait NativeEdgeDetector {
    /// Return the document corners in photo pixel space, or
    /// `Detection::NotFound`.
    ///
    /// `viewport` is the overlay's current layout, for detectors that scale
    /// their output to the screen.
    fn detect_edges(&self, photo: &PhotoRef, viewport: &Viewport) -> Result<Detection>;
}

/// Perspective-crop a photo to a document outline.
pub trait NativeCropper {
    /// Crop `photo` to `corners` (pixel space) and return the new file.
    fn crop(&self, photo: &PhotoRef, corners: &Quad) -> Result<PhotoRef>;
}
