// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for builds where no native scanner module is registered.
//
// Every trait method returns `PlatformUnavailable`.

use docscan_core::error::{Result, ScanError};
use docscan_core::types::{CaptureOptions, CapturedPhoto, Detection, PhotoRef, Quad, Viewport};

use crate::traits::*;

/// No-op bridge returned when the platform has no scanner.
pub struct StubBridge;

impl ScannerBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Unsupported (stub)"
    }
}

impl NativeCamera for StubBridge {
    fn capture_photo(&self, _options: &CaptureOptions) -> Result<CapturedPhoto> {
        tracing::warn!("NativeCamera::capture_photo called on stub bridge");
        Err(ScanError::PlatformUnavailable)
    }
}

impl NativeEdgeDetector for StubBridge {
    fn detect_edges(&self, _photo: &PhotoRef, _viewport: &Viewport) -> Result<Detection> {
        tracing::warn!("NativeEdgeDetector::detect_edges called on stub bridge");
        Err(ScanError::PlatformUnavailable)
    }
}

impl NativeCropper for StubBridge {
    fn crop(&self, _photo: &PhotoRef, _corners: &Quad) -> Result<PhotoRef> {
        tracing::warn!("NativeCropper::crop called on stub bridge");
        Err(ScanError::PlatformUnavailable)
    }
}
