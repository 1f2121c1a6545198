// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the document scanner.
//
// Points carry no space tag of their own: whether a value is in detection
// space (photo pixels) or display space (layout coordinates) is decided by the
// collection that holds it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ScanError};

/// Unique identifier for a scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 2D coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point displaced by `(dx, dy)`.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Whether both coordinates are within `tolerance` of `other`.
    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// The four corners of a document, in winding order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    pub fn corners(&self) -> &[Point; 4] {
        &self.0
    }

    /// Apply `f` to every corner, keeping the winding order.
    pub fn map(self, f: impl Fn(Point) -> Point) -> Self {
        Self(self.0.map(f))
    }

    /// Corners as `(f32, f32)` pairs for image-space APIs.
    pub fn to_f32_pairs(&self) -> [(f32, f32); 4] {
        self.0.map(|p| (p.x as f32, p.y as f32))
    }
}

impl From<[Point; 4]> for Quad {
    fn from(points: [Point; 4]) -> Self {
        Self(points)
    }
}

/// Outcome of running the edge detector on a photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Detection {
    /// No document outline was found.
    NotFound,
    /// Four corners in detection (pixel) space.
    Found(Quad),
}

impl Detection {
    /// Build a detection from the raw point list a native detector returns.
    ///
    /// Detectors report either nothing or four corners; any other count is
    /// a malformed result.
    pub fn from_points(points: &[Point]) -> Result<Self> {
        match points {
            [] => Ok(Self::NotFound),
            [a, b, c, d] => Ok(Self::Found(Quad([*a, *b, *c, *d]))),
            other => Err(ScanError::DetectionFailed(format!(
                "detector returned {} point(s), expected 0 or 4",
                other.len()
            ))),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Display-space layout rectangle of the overlay container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64, x: f64, y: f64) -> Self {
        Self {
            width,
            height,
            x,
            y,
        }
    }

    /// A viewport anchored at the origin.
    pub const fn sized(width: f64, height: f64) -> Self {
        Self::new(width, height, 0.0, 0.0)
    }

    /// True if either dimension is zero, negative, or not a finite number.
    /// The initial `Default` viewport (before any layout pass) is degenerate.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// Opaque handle to a photo file produced by the native layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File-system path of the photo, without any `file://` scheme.
    /// Native detectors and croppers expect bare paths.
    pub fn path(&self) -> &str {
        self.0.strip_prefix("file://").unwrap_or(&self.0)
    }
}

impl From<String> for PhotoRef {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

impl std::fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A photo handed back by the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedPhoto {
    pub photo: PhotoRef,
    /// Pixel width of the stored photo.
    pub width: u32,
    /// Pixel height of the stored photo.
    pub height: u32,
}

/// Options forwarded verbatim to the camera. The scanner never interprets
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptureOptions(pub serde_json::Map<String, serde_json::Value>);

impl CaptureOptions {
    /// An empty option set, without the defaults.
    pub fn empty() -> Self {
        Self(serde_json::Map::new())
    }

    /// These options with every key of `overrides` replacing ours.
    pub fn merged(&self, overrides: &CaptureOptions) -> Self {
        let mut map = self.0.clone();
        for (key, value) in &overrides.0 {
            map.insert(key.clone(), value.clone());
        }
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

impl Default for CaptureOptions {
    /// No base64 payload, orientation fixed by the camera.
    fn default() -> Self {
        let mut map = serde_json::Map::new();
        map.insert("base64".into(), serde_json::Value::Bool(false));
        map.insert("fixOrientation".into(), serde_json::Value::Bool(true));
        Self(map)
    }
}

/// Coarse lifecycle phase of a scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanPhase {
    /// No photo; the live camera is shown.
    Idle,
    /// Photo captured; corners may be adjusted or the photo cropped.
    Editing,
}

/// Notification fired once per successful capture + detection cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureEvent {
    pub session: SessionId,
    pub photo: PhotoRef,
    /// Whether the detector found a document outline.
    pub document_found: bool,
    pub captured_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_accepts_zero_or_four_points() {
        assert_eq!(Detection::from_points(&[]).unwrap(), Detection::NotFound);

        let corners = [
            Point::new(10.0, 10.0),
            Point::new(100.0, 10.0),
            Point::new(100.0, 100.0),
            Point::new(10.0, 100.0),
        ];
        match Detection::from_points(&corners).unwrap() {
            Detection::Found(quad) => assert_eq!(quad.corners(), &corners),
            Detection::NotFound => panic!("expected corners"),
        }
    }

    #[test]
    fn detection_rejects_partial_results() {
        let err = Detection::from_points(&[Point::new(1.0, 1.0), Point::new(2.0, 2.0)])
            .unwrap_err();
        assert!(matches!(err, ScanError::DetectionFailed(_)));
    }

    #[test]
    fn default_viewport_is_degenerate() {
        assert!(Viewport::default().is_degenerate());
        assert!(Viewport::sized(0.0, 100.0).is_degenerate());
        assert!(Viewport::sized(f64::NAN, 100.0).is_degenerate());
        assert!(!Viewport::new(400.0, 300.0, 10.0, 20.0).is_degenerate());
    }

    #[test]
    fn photo_ref_path_strips_file_scheme() {
        let photo = PhotoRef::new("file:///data/cache/img1.jpg");
        assert_eq!(photo.path(), "/data/cache/img1.jpg");
        assert_eq!(PhotoRef::new("/tmp/img.jpg").path(), "/tmp/img.jpg");
    }

    #[test]
    fn capture_options_merge_overrides_defaults() {
        let mut overrides = CaptureOptions::empty();
        overrides
            .0
            .insert("fixOrientation".into(), serde_json::Value::Bool(false));
        overrides
            .0
            .insert("quality".into(), serde_json::json!(0.8));

        let merged = CaptureOptions::default().merged(&overrides);
        assert_eq!(merged.get("base64"), Some(&serde_json::Value::Bool(false)));
        assert_eq!(merged.get("fixOrientation"), Some(&serde_json::Value::Bool(false)));
        assert_eq!(merged.get("quality"), Some(&serde_json::json!(0.8)));
    }

    #[test]
    fn point_display_is_svg_pair() {
        assert_eq!(Point::new(12.5, 20.0).to_string(), "12.5,20");
    }
}
