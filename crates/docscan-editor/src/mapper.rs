// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Coordinate mapping between detection space (photo pixels) and display space
// (overlay layout).
//
// The mapping is a per-axis scale plus offset. Every layout change yields a
// step transform from the previous viewport to the new one; steps compose by
// multiplying scales, and the origin always follows the latest layout.

use docscan_core::types::{Point, Viewport};
use serde::{Deserialize, Serialize};

/// Per-axis affine map from detection space to display space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale_x: 1.0,
        scale_y: 1.0,
        origin_x: 0.0,
        origin_y: 0.0,
    };

    /// Step transform for a layout change from `old` to `new`.
    ///
    /// Scales are the ratio of the new dimensions to the old ones. A zero or
    /// non-finite previous dimension (first layout pass) gives a ratio of 1,
    /// so a scale is never 0.
    pub fn between(old: &Viewport, new: &Viewport) -> Self {
        Self {
            scale_x: ratio(new.width, old.width),
            scale_y: ratio(new.height, old.height),
            origin_x: new.x,
            origin_y: new.y,
        }
    }

    /// This transform followed by `step`: scales multiply, the origin is
    /// taken from `step`.
    pub fn then(self, step: Transform) -> Self {
        Self {
            scale_x: self.scale_x * step.scale_x,
            scale_y: self.scale_y * step.scale_y,
            origin_x: step.origin_x,
            origin_y: step.origin_y,
        }
    }

    pub fn to_display(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale_x + self.origin_x,
            p.y * self.scale_y + self.origin_y,
        )
    }

    pub fn to_detection(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.origin_x) / self.scale_x,
            (p.y - self.origin_y) / self.scale_y,
        )
    }
}

fn ratio(new: f64, old: f64) -> f64 {
    let r = new / old;
    if r.is_finite() && r != 0.0 { r } else { 1.0 }
}

/// The current viewport together with the transform accumulated over every
/// layout seen so far.
///
/// A value type: a layout change produces a new mapper, and points held in
/// the old display space are carried over with [`CoordinateMapper::remap`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapper {
    viewport: Viewport,
    transform: Transform,
}

impl CoordinateMapper {
    /// Identity mapper with no layout yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// The mapper after the overlay is laid out at `viewport`.
    pub fn relayout(&self, viewport: Viewport) -> Self {
        Self {
            viewport,
            transform: self
                .transform
                .then(Transform::between(&self.viewport, &viewport)),
        }
    }

    pub fn to_display(&self, p: Point) -> Point {
        self.transform.to_display(p)
    }

    pub fn to_detection(&self, p: Point) -> Point {
        self.transform.to_detection(p)
    }

    /// Move a point from this mapper's display space into `next`'s.
    pub fn remap(&self, next: &CoordinateMapper, p: Point) -> Point {
        next.to_display(self.to_detection(p))
    }
}
