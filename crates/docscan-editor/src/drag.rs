// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-touch drag handling for correction points.
//
// The controller is addressed by point index and never keeps a copy of the
// point set: every call receives the owner's current points, so a re-render or
// layout change mid-gesture cannot leave it working on stale positions.

use docscan_core::error::{Result, ScanError};
use docscan_core::types::Point;
use serde::{Deserialize, Serialize};

use crate::points::PointSet;

/// The point currently under the user's finger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveDrag {
    pub index: usize,
    /// Position of the point when the gesture started.
    pub origin: Point,
    /// Position after the latest move.
    pub position: Point,
}

/// Tracks at most one active drag.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    /// Start dragging point `index`.
    ///
    /// Fails with `DragInProgress` while another drag (or the same one) is
    /// active; the running gesture is left intact.
    pub fn begin(&mut self, index: usize, points: &PointSet) -> Result<ActiveDrag> {
        if let Some(active) = &self.active {
            return Err(ScanError::DragInProgress {
                active: active.index,
            });
        }
        let origin = points.get(index).ok_or(ScanError::PointIndexOutOfRange {
            index,
            len: points.len(),
        })?;
        let drag = ActiveDrag {
            index,
            origin,
            position: origin,
        };
        self.active = Some(drag);
        Ok(drag)
    }

    /// Move point `index` to the gesture origin plus `(dx, dy)`, the total
    /// displacement since the gesture began. Returns the updated set.
    pub fn update(&mut self, index: usize, dx: f64, dy: f64, points: &PointSet) -> Result<PointSet> {
        let drag = match self.active.as_mut() {
            Some(drag) if drag.index == index => drag,
            _ => return Err(ScanError::NoActiveDrag { index }),
        };
        let position = drag.origin.translate(dx, dy);
        let updated = points.replace_at(index, position)?;
        drag.position = position;
        Ok(updated)
    }

    /// Finish the drag on point `index`. The point stays wherever it was
    /// released, even outside the photo.
    pub fn end(&mut self, index: usize) -> Result<ActiveDrag> {
        match self.active {
            Some(drag) if drag.index == index => {
                self.active = None;
                Ok(drag)
            }
            _ => Err(ScanError::NoActiveDrag { index }),
        }
    }

    /// Drop any active drag without finishing it.
    pub fn cancel(&mut self) -> Option<ActiveDrag> {
        self.active.take()
    }

    /// Carry the active drag into a new coordinate space, alongside the
    /// points it refers to.
    pub fn remap(&mut self, f: impl Fn(Point) -> Point) {
        if let Some(drag) = self.active.as_mut() {
            drag.origin = f(drag.origin);
            drag.position = f(drag.position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_core::types::Quad;

    fn points() -> PointSet {
        PointSet::from_quad(Quad([
            Point::new(20.0, 20.0),
            Point::new(200.0, 20.0),
            Point::new(200.0, 200.0),
            Point::new(20.0, 200.0),
        ]))
    }

    #[test]
    fn displacement_is_relative_to_gesture_start() {
        let mut drag = DragController::new();
        let mut set = points();
        drag.begin(0, &set).unwrap();

        set = drag.update(0, 2.0, 2.0, &set).unwrap();
        set = drag.update(0, 5.0, 5.0, &set).unwrap();

        // Cumulative, not 2 + 5.
        assert_eq!(set.get(0), Some(Point::new(25.0, 25.0)));
        assert_eq!(drag.active().unwrap().position, Point::new(25.0, 25.0));
        assert_eq!(drag.active().unwrap().origin, Point::new(20.0, 20.0));
        assert_eq!(set.get(1), Some(Point::new(200.0, 20.0)));
    }

    #[test]
    fn second_drag_is_rejected() {
        let mut drag = DragController::new();
        let set = points();
        drag.begin(1, &set).unwrap();

        let err = drag.begin(2, &set).unwrap_err();
        assert!(matches!(err, ScanError::DragInProgress { active: 1 }));
        assert_eq!(drag.active().unwrap().index, 1);

        // Moving a point that is not being dragged is refused too.
        assert!(matches!(
            drag.update(2, 1.0, 1.0, &set),
            Err(ScanError::NoActiveDrag { index: 2 })
        ));
    }

    #[test]
    fn end_clears_and_allows_new_drag() {
        let mut drag = DragController::new();
        let set = points();
        drag.begin(3, &set).unwrap();
        let finished = drag.end(3).unwrap();
        assert_eq!(finished.index, 3);
        assert!(drag.active().is_none());
        assert!(drag.begin(0, &set).is_ok());
    }

    #[test]
    fn end_without_drag_fails() {
        let mut drag = DragController::new();
        assert!(matches!(drag.end(0), Err(ScanError::NoActiveDrag { index: 0 })));
    }

    #[test]
    fn begin_out_of_range() {
        let mut drag = DragController::new();
        let err = drag.begin(0, &PointSet::empty()).unwrap_err();
        assert!(matches!(err, ScanError::PointIndexOutOfRange { index: 0, len: 0 }));
        assert!(drag.active().is_none());
    }

    #[test]
    fn points_may_leave_the_photo() {
        let mut drag = DragController::new();
        let set = points();
        drag.begin(0, &set).unwrap();
        let set = drag.update(0, -500.0, -500.0, &set).unwrap();
        drag.end(0).unwrap();
        assert_eq!(set.get(0), Some(Point::new(-480.0, -480.0)));
    }

    #[test]
    fn remap_moves_origin_and_position() {
        let mut drag = DragController::new();
        let set = points();
        drag.begin(0, &set).unwrap();
        drag.update(0, 4.0, 0.0, &set).unwrap();
        drag.remap(|p| Point::new(p.x * 2.0, p.y * 2.0));

        let active = drag.active().unwrap();
        assert_eq!(active.origin, Point::new(40.0, 40.0));
        assert_eq!(active.position, Point::new(48.0, 40.0));
    }
}
