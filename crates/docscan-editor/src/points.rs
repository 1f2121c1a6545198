// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ordered set of correction points, plus the overlay geometry derived from it.

use docscan_core::config::HandleGeometry;
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{Point, Quad};
use serde::{Deserialize, Serialize};

/// The correction points of a document, in winding order.
///
/// Index `i` always names the same corner: every operation preserves order
/// and count. Sessions hold either no points (nothing detected) or four.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointSet(Vec<Point>);

impl PointSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn from_quad(quad: Quad) -> Self {
        Self(quad.0.to_vec())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.0
    }

    /// A new set with `f` applied to every point.
    pub fn project(&self, f: impl Fn(Point) -> Point) -> Self {
        Self(self.0.iter().map(|p| f(*p)).collect())
    }

    /// A new set equal to this one except at `index`.
    pub fn replace_at(&self, index: usize, point: Point) -> Result<Self> {
        if index >= self.0.len() {
            return Err(ScanError::PointIndexOutOfRange {
                index,
                len: self.0.len(),
            });
        }
        let mut points = self.0.clone();
        points[index] = point;
        Ok(Self(points))
    }

    /// The four corners, or `InsufficientPoints` when the set is not a full
    /// outline.
    pub fn as_quad(&self) -> Result<Quad> {
        match self.0.as_slice() {
            [a, b, c, d] => Ok(Quad([*a, *b, *c, *d])),
            other => Err(ScanError::InsufficientPoints { found: other.len() }),
        }
    }

    /// SVG `points` attribute for the closed outline: `"x,y x,y ..."` in set
    /// order. Empty when there are fewer than 3 points, meaning "draw
    /// nothing".
    pub fn to_polygon_path(&self) -> String {
        if self.0.len() < 3 {
            return String::new();
        }
        self.0
            .iter()
            .map(Point::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Touch targets for every point, in set order.
    pub fn handles(&self, geometry: &HandleGeometry) -> Vec<HandleLayout> {
        self.0
            .iter()
            .enumerate()
            .map(|(index, p)| HandleLayout::centred(index, *p, geometry))
            .collect()
    }
}

impl From<Vec<Point>> for PointSet {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

/// Placement of the draggable handle for one point: a square touch target
/// centred on the point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandleLayout {
    pub index: usize,
    pub left: f64,
    pub top: f64,
    /// Side of the touch target.
    pub size: f64,
    /// Diameter of the visible dot inside it.
    pub dot_size: f64,
}

impl HandleLayout {
    fn centred(index: usize, p: Point, geometry: &HandleGeometry) -> Self {
        let half = geometry.container_size / 2.0;
        Self {
            index,
            left: p.x - half,
            top: p.y - half,
            size: geometry.container_size,
            dot_size: geometry.point_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> PointSet {
        PointSet::from_quad(Quad([
            Point::new(20.0, 20.0),
            Point::new(200.0, 20.0),
            Point::new(200.0, 200.0),
            Point::new(20.0, 200.0),
        ]))
    }

    #[test]
    fn project_preserves_order_and_count() {
        let points = square();
        let shifted = points.project(|p| p.translate(1.0, -1.0));
        assert_eq!(shifted.len(), 4);
        for (before, after) in points.as_slice().iter().zip(shifted.as_slice()) {
            assert_eq!(after, &before.translate(1.0, -1.0));
        }
        assert!(PointSet::empty().project(|p| p).is_empty());
    }

    #[test]
    fn replace_at_touches_one_point() {
        let points = square();
        let moved = points.replace_at(2, Point::new(0.0, 0.0)).unwrap();
        assert_eq!(moved.get(2), Some(Point::new(0.0, 0.0)));
        assert_eq!(moved.get(0), points.get(0));
        assert_eq!(moved.get(3), points.get(3));
        // The original is untouched.
        assert_eq!(points.get(2), Some(Point::new(200.0, 200.0)));
    }

    #[test]
    fn replace_at_rejects_out_of_range() {
        let err = square().replace_at(4, Point::default()).unwrap_err();
        assert!(matches!(err, ScanError::PointIndexOutOfRange { index: 4, len: 4 }));
        assert!(PointSet::empty().replace_at(0, Point::default()).is_err());
    }

    #[test]
    fn polygon_path_in_set_order() {
        assert_eq!(square().to_polygon_path(), "20,20 200,20 200,200 20,200");
    }

    #[test]
    fn polygon_path_empty_below_three_points() {
        assert_eq!(PointSet::empty().to_polygon_path(), "");
        let two = PointSet::from(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
        assert_eq!(two.to_polygon_path(), "");
        let three = PointSet::from(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        assert_eq!(three.to_polygon_path(), "0,0 1,0 0,1");
    }

    #[test]
    fn as_quad_needs_four_points() {
        for n in 0..4 {
            let partial = PointSet::from(vec![Point::default(); n]);
            let err = partial.as_quad().unwrap_err();
            assert!(matches!(err, ScanError::InsufficientPoints { found } if found == n));
        }
        assert!(square().as_quad().is_ok());
    }

    #[test]
    fn handles_are_centred_on_points() {
        let handles = square().handles(&HandleGeometry::default());
        assert_eq!(handles.len(), 4);
        assert_eq!((handles[0].left, handles[0].top), (0.0, 0.0));
        assert_eq!((handles[2].left, handles[2].top), (180.0, 180.0));
        assert_eq!(handles[1].size, 40.0);
        assert_eq!(handles[1].dot_size, 20.0);
    }
}
