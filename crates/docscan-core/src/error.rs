// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the document scanner.

use thiserror::Error;

/// Top-level error type for all scanner operations.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- External services --
    #[error("capture failed: {0}")]
    CaptureFailed(String),

    /// Never surfaced by a session: detection failures are downgraded to
    /// "no document found". Bridges use it to report what went wrong.
    #[error("edge detection failed: {0}")]
    DetectionFailed(String),

    #[error("crop failed: {0}")]
    CropFailed(String),

    #[error("crop needs 4 corner points, found {found}")]
    InsufficientPoints { found: usize },

    // -- Editor --
    #[error("invalid layout {width}x{height}")]
    LayoutInvalid { width: f64, height: f64 },

    #[error("point index {index} out of range for {len} point(s)")]
    PointIndexOutOfRange { index: usize, len: usize },

    #[error("point {active} is already being dragged")]
    DragInProgress { active: usize },

    #[error("no drag in progress for point {index}")]
    NoActiveDrag { index: usize },

    // -- Session state --
    #[error("no photo is being edited")]
    NotEditing,

    #[error("a photo is already being edited; restart first")]
    NotIdle,

    #[error("another capture or crop is still running")]
    OperationInProgress,

    #[error("operation superseded by a restart")]
    Superseded,

    // -- Images / persistence --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl ScanError {
    /// Whether the error belongs to the crop operation, including the
    /// missing-corners precondition.
    pub fn is_crop_failure(&self) -> bool {
        matches!(self, Self::CropFailed(_) | Self::InsufficientPoints { .. })
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
