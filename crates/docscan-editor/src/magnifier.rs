// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Zoomed preview under the finger while a corner is dragged.
//
// The preview is a circular window showing the photo at display size, shifted
// so the dragged point sits under the crosshair in the window's centre.

use docscan_core::config::MagnifierGeometry;
use docscan_core::types::{PhotoRef, Point, Viewport};
use serde::{Deserialize, Serialize};

/// Margins to apply to the photo inside the zoom window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnifierOffset {
    pub margin_left: f64,
    pub margin_top: f64,
}

/// Everything a renderer needs to draw the zoom window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnifierView {
    pub photo: PhotoRef,
    /// The dragged point, in display space.
    pub focus: Point,
    pub offset: MagnifierOffset,
    /// Size to draw the photo at inside the window (the overlay size).
    pub image_width: f64,
    pub image_height: f64,
    pub geometry: MagnifierGeometry,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Magnifier {
    geometry: MagnifierGeometry,
}

impl Magnifier {
    pub fn new(geometry: MagnifierGeometry) -> Self {
        Self { geometry }
    }

    /// Photo offset that puts `focus` under the crosshair. The crosshair's
    /// horizontal arm is inset by its line thickness and its vertical arm
    /// is raised by half its length.
    pub fn offset_for(&self, focus: Point) -> MagnifierOffset {
        let half = self.geometry.container_size / 2.0;
        MagnifierOffset {
            margin_left: -focus.x + half - self.geometry.cursor_border,
            margin_top: -focus.y + half - self.geometry.cursor_size / 2.0,
        }
    }

    /// Build the view for a drag at `focus` over `photo`.
    pub fn view(&self, photo: &PhotoRef, focus: Point, viewport: &Viewport) -> MagnifierView {
        MagnifierView {
            photo: photo.clone(),
            focus,
            offset: self.offset_for(focus),
            image_width: viewport.width,
            image_height: viewport.height,
            geometry: self.geometry,
        }
    }
}
