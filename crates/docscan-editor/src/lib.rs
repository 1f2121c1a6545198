// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-editor — The corner-correction editor behind the scanner overlay.
//
// Tracks the four correction points of a captured document, lets the user drag
// them one at a time with a magnified preview, and keeps them consistent
// between the detector's pixel space and the overlay's layout space while the
// layout changes. `ScanSession` ties this to the native capture, detection and
// crop services.

pub mod drag;
pub mod magnifier;
pub mod mapper;
pub mod points;
pub mod session;

pub use drag::{ActiveDrag, DragController};
pub use magnifier::{Magnifier, MagnifierOffset, MagnifierView};
pub use mapper::{CoordinateMapper, Transform};
pub use points::{HandleLayout, PointSet};
pub use session::{EditorSnapshot, ScanSession, SessionState, SessionTimeouts};
