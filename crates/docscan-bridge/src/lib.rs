// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Docscan — Native platform bridge abstractions.
//!
//! The scanner core never touches camera hardware or computer-vision code.
//! It reaches the native capture, edge-detection and crop modules through the
//! traits in [`traits`], implemented once per platform.

pub mod desktop;
pub mod stub;
pub mod traits;

pub use desktop::DesktopBridge;
pub use stub::StubBridge;
pub use traits::{NativeCamera, NativeCropper, NativeEdgeDetector, ScannerBridge};

/// Retrieves the bridge implementation for the target operating system.
///
/// Mobile hosts register their own `ScannerBridge` with the session; when
/// none is available this returns the stub, whose every call reports
/// `ScanError::PlatformUnavailable`.
pub fn platform_bridge() -> Box<dyn ScannerBridge> {
    Box::new(StubBridge)
}
