// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drives one scan session through layout → capture → drags → crop, the way an
// overlay host would.

use docscan_bridge::ScannerBridge;
use docscan_core::error::Result;
use docscan_core::types::{CaptureEvent, PhotoRef, SessionId, Viewport};
use docscan_editor::{EditorSnapshot, ScanSession};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::DragStep;

/// What to do in the session, in order.
#[derive(Debug, Clone, Default)]
pub struct ScanPlan {
    pub layouts: Vec<Viewport>,
    pub drags: Vec<DragStep>,
    pub crop: bool,
}

/// Outcome of a run, printed as JSON.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub session: SessionId,
    pub capture: CaptureEvent,
    /// The overlay as last rendered before the crop.
    pub overlay: EditorSnapshot,
    pub cropped: Option<PhotoRef>,
}

pub async fn run_scan<B>(session: &ScanSession<B>, plan: &ScanPlan) -> Result<ScanReport>
where
    B: ScannerBridge + ?Sized + 'static,
{
    for layout in &plan.layouts {
        // A degenerate layout is reported by the session and ignored.
        if let Err(err) = session.on_layout_changed(*layout) {
            warn!(error = %err, "layout skipped");
        }
    }

    let capture = session.capture().await?;

    if plan.layouts.is_empty() {
        let viewport = photo_viewport(session);
        info!(width = viewport.width, height = viewport.height, "laying out at photo size");
        session.on_layout_changed(viewport)?;
    }

    for step in &plan.drags {
        session.begin_drag(step.index)?;
        session.drag_to(step.index, step.dx, step.dy)?;
        let released = session.end_drag(step.index)?;
        info!(index = step.index, x = released.x, y = released.y, "corner moved");
    }

    let overlay = session.snapshot();
    let cropped = if plan.crop {
        Some(session.crop().await?)
    } else {
        None
    };

    Ok(ScanReport {
        session: session.id(),
        capture,
        overlay,
        cropped,
    })
}

fn photo_viewport<B>(session: &ScanSession<B>) -> Viewport
where
    B: ScannerBridge + ?Sized + 'static,
{
    match session.state().photo() {
        Some(photo) => Viewport::sized(f64::from(photo.width), f64::from(photo.height)),
        None => Viewport::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use docscan_bridge::DesktopBridge;
    use docscan_core::types::{Point, Quad, ScanPhase};
    use docscan_core::{ScanError, ScannerConfig};
    use image::{Rgb, RgbImage};

    fn page(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("page.png");
        let mut img = RgbImage::from_pixel(200, 200, Rgb([20, 20, 20]));
        for y in 10..100 {
            for x in 10..100 {
                img.put_pixel(x, y, Rgb([250, 250, 250]));
            }
        }
        img.save(&path).unwrap();
        path
    }

    fn quad() -> Quad {
        Quad([
            Point::new(10.0, 10.0),
            Point::new(100.0, 10.0),
            Point::new(100.0, 100.0),
            Point::new(10.0, 100.0),
        ])
    }

    #[tokio::test]
    async fn full_scan_with_drag_and_crop() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = DesktopBridge::new(page(dir.path()), dir.path().join("scans"))
            .unwrap()
            .with_corners(quad());
        let session = ScanSession::new(Arc::new(bridge), ScannerConfig::default());
        let plan = ScanPlan {
            layouts: vec![Viewport::sized(200.0, 200.0), Viewport::sized(400.0, 400.0)],
            drags: vec![DragStep { index: 0, dx: 5.0, dy: 5.0 }],
            crop: true,
        };

        let report = run_scan(&session, &plan).await.unwrap();
        assert!(report.capture.document_found);
        assert_eq!(report.overlay.points.get(0), Some(Point::new(25.0, 25.0)));
        assert_eq!(report.overlay.points.get(2), Some(Point::new(200.0, 200.0)));

        let cropped = report.cropped.unwrap();
        assert!(std::path::Path::new(cropped.path()).is_file());
    }

    #[tokio::test]
    async fn no_corners_fails_at_crop() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = DesktopBridge::new(page(dir.path()), dir.path().join("scans")).unwrap();
        let session = ScanSession::new(Arc::new(bridge), ScannerConfig::default());
        let plan = ScanPlan { crop: true, ..ScanPlan::default() };

        let err = run_scan(&session, &plan).await.unwrap_err();
        assert!(matches!(err, ScanError::InsufficientPoints { found: 0 }));
        assert_eq!(session.phase(), ScanPhase::Editing);
        assert_eq!(session.viewport(), Viewport::sized(200.0, 200.0));
    }
}
