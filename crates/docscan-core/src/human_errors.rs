// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the scanner overlay.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The taxonomy uses three severity levels that drive UI presentation.

use crate::error::ScanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Timeout or busy device; trying again may work.
    Transient,
    /// User must do something (adjust corners, finish a gesture, restart).
    ActionRequired,
    /// Cannot be fixed by retrying (missing hardware, broken file).
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether offering a "try again" button makes sense.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

impl HumanError {
    fn new(message: &str, suggestion: impl Into<String>, retriable: bool, severity: Severity) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            retriable,
            severity,
        }
    }
}

/// Convert a `ScanError` into a `HumanError` fit for the scanner screen.
pub fn humanize_error(err: &ScanError) -> HumanError {
    match err {
        // -- External services --
        ScanError::CaptureFailed(detail) => {
            if is_timeout(detail) {
                HumanError::new(
                    "The camera took too long to respond.",
                    "Hold the device still and try taking the photo again.",
                    true,
                    Severity::Transient,
                )
            } else {
                HumanError::new(
                    "We couldn't take a photo.",
                    "Make sure no other app is using the camera, then try again.",
                    true,
                    Severity::Transient,
                )
            }
        }

        ScanError::DetectionFailed(_) => HumanError::new(
            "We couldn't find the edges of the document.",
            "Retake the photo with the whole page in view, on a darker background.",
            false,
            Severity::ActionRequired,
        ),

        ScanError::CropFailed(detail) => {
            if is_timeout(detail) {
                HumanError::new(
                    "Cropping took too long.",
                    "Try again. Very large photos can take a while to process.",
                    true,
                    Severity::Transient,
                )
            } else {
                HumanError::new(
                    "We couldn't crop the photo.",
                    "Check that the four corners outline the document, then try again.",
                    true,
                    Severity::Transient,
                )
            }
        }

        ScanError::InsufficientPoints { .. } => HumanError::new(
            "No document outline to crop.",
            "Retake the photo so the whole page is visible, with some background around it.",
            false,
            Severity::ActionRequired,
        ),

        // -- Editor --
        ScanError::LayoutInvalid { .. } => HumanError::new(
            "The scanner view has no size yet.",
            "Wait for the screen to finish loading, then try again.",
            true,
            Severity::Transient,
        ),

        ScanError::PointIndexOutOfRange { len: 0, .. } => HumanError::new(
            "There are no corner points to move.",
            "No document was found in this photo. Retake it with the whole page in view.",
            false,
            Severity::ActionRequired,
        ),

        ScanError::PointIndexOutOfRange { len, .. } => HumanError::new(
            "That corner doesn't exist.",
            format!("Pick one of the {len} corners on the outline."),
            false,
            Severity::ActionRequired,
        ),

        ScanError::DragInProgress { .. } | ScanError::NoActiveDrag { .. } => HumanError::new(
            "Only one corner can be moved at a time.",
            "Lift your finger and drag a single corner.",
            false,
            Severity::ActionRequired,
        ),

        // -- Session state --
        ScanError::NotEditing => HumanError::new(
            "There is no photo to crop.",
            "Take a photo of the document first.",
            false,
            Severity::ActionRequired,
        ),

        ScanError::NotIdle => HumanError::new(
            "A photo is already open.",
            "Tap \"Retake\" to discard it before taking another photo.",
            false,
            Severity::ActionRequired,
        ),

        ScanError::OperationInProgress => HumanError::new(
            "Still working on the last photo.",
            "Wait a moment for it to finish.",
            true,
            Severity::Transient,
        ),

        ScanError::Superseded => HumanError::new(
            "The scan was cancelled.",
            "Take a new photo when you're ready.",
            false,
            Severity::ActionRequired,
        ),

        // -- Images / persistence --
        ScanError::ImageError(_) => HumanError::new(
            "There's a problem with this photo.",
            "The photo may be damaged. Try taking it again.",
            false,
            Severity::Permanent,
        ),

        ScanError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError::new(
                "The photo couldn't be found.",
                "It may have been cleared from the cache. Take the photo again.",
                false,
                Severity::ActionRequired,
            ),
            std::io::ErrorKind::PermissionDenied => HumanError::new(
                "The app doesn't have permission to save the photo.",
                "Allow storage access for this app in your device settings.",
                false,
                Severity::ActionRequired,
            ),
            _ => HumanError::new(
                "There was a problem reading or writing the photo.",
                "Try again. If this keeps happening, your device's storage may be full.",
                true,
                Severity::Transient,
            ),
        },

        ScanError::Serialization(_) => HumanError::new(
            "The app had an internal data problem.",
            "Try again. If this keeps happening, please report it.",
            true,
            Severity::Transient,
        ),

        // -- Platform --
        ScanError::Bridge(detail) => HumanError::new(
            "A device-specific feature didn't work.",
            format!("Try restarting the app. ({detail})"),
            true,
            Severity::Transient,
        ),

        ScanError::PlatformUnavailable => HumanError::new(
            "Scanning isn't available on this device.",
            "Document scanning needs a device with a camera.",
            false,
            Severity::Permanent,
        ),
    }
}

fn is_timeout(detail: &str) -> bool {
    detail.to_ascii_lowercase().contains("timed out")
}
