// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan session: the capture → edit → crop flow around the native bridge.
//
// Editor state (viewport, transform, points, active drag) sits behind one
// mutex that is never held across an `.await`, so a layout change or a drag
// is always applied as a single step. Capture and crop call the bridge on the
// blocking pool, bounded by a timeout, and only one of them may be outstanding
// at a time. Drags and layout changes keep working while one is.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use docscan_bridge::ScannerBridge;
use docscan_core::ScannerConfig;
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{
    CaptureEvent, CapturedPhoto, Detection, PhotoRef, Point, ScanPhase, SessionId, Viewport,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::drag::{ActiveDrag, DragController};
use crate::magnifier::{Magnifier, MagnifierView};
use crate::mapper::{CoordinateMapper, Transform};
use crate::points::{HandleLayout, PointSet};

/// Capacity of the capture notification channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Where the session is in the scan flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    /// No photo; the live camera is shown.
    Idle,
    /// A photo is on screen with its correction points in display space.
    /// `points` is empty when no document was detected.
    Editing {
        photo: CapturedPhoto,
        points: PointSet,
    },
}

impl SessionState {
    pub fn phase(&self) -> ScanPhase {
        match self {
            Self::Idle => ScanPhase::Idle,
            Self::Editing { .. } => ScanPhase::Editing,
        }
    }

    pub fn photo(&self) -> Option<&CapturedPhoto> {
        match self {
            Self::Idle => None,
            Self::Editing { photo, .. } => Some(photo),
        }
    }
}

/// Upper bounds on the external calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimeouts {
    pub capture: Duration,
    pub detect: Duration,
    pub crop: Duration,
}

impl SessionTimeouts {
    pub fn from_config(config: &ScannerConfig) -> Self {
        Self {
            capture: config.capture_timeout(),
            detect: config.detect_timeout(),
            crop: config.crop_timeout(),
        }
    }
}

/// Immutable view of the editor for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    pub phase: ScanPhase,
    /// The live camera is shown only while no photo is being edited.
    pub camera_visible: bool,
    pub photo: Option<CapturedPhoto>,
    pub viewport: Viewport,
    pub transform: Transform,
    pub points: PointSet,
    /// SVG outline; empty means "draw no polygon".
    pub polygon: String,
    pub handles: Vec<HandleLayout>,
    pub active_drag: Option<ActiveDrag>,
    pub magnifier: Option<MagnifierView>,
}

struct Editor {
    mapper: CoordinateMapper,
    state: SessionState,
    drag: DragController,
    /// Bumped by every restart; a capture started under an older generation
    /// must not commit.
    generation: u64,
}

/// Holds the in-flight flag. The operation and every native call it starts
/// share one guard; the flag clears when the last of them lets go, so a
/// native call abandoned after a timeout still blocks the next operation
/// until it returns.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Arc<Self>> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ScanError::OperationInProgress)?;
        Ok(Arc::new(Self(Arc::clone(flag))))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One scanner overlay: owns the viewport, the correction points and the
/// active drag, and talks to the native bridge `B`.
pub struct ScanSession<B: ScannerBridge + ?Sized + 'static> {
    id: SessionId,
    bridge: Arc<B>,
    config: ScannerConfig,
    timeouts: SessionTimeouts,
    magnifier: Magnifier,
    editor: Mutex<Editor>,
    in_flight: Arc<AtomicBool>,
    events: broadcast::Sender<CaptureEvent>,
}

impl<B: ScannerBridge + ?Sized + 'static> ScanSession<B> {
    pub fn new(bridge: Arc<B>, config: ScannerConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let id = SessionId::new();
        info!(session = %id, platform = bridge.platform_name(), "scan session created");
        Self {
            id,
            timeouts: SessionTimeouts::from_config(&config),
            magnifier: Magnifier::new(config.magnifier),
            bridge,
            config,
            editor: Mutex::new(Editor {
                mapper: CoordinateMapper::new(),
                state: SessionState::Idle,
                drag: DragController::new(),
                generation: 0,
            }),
            in_flight: Arc::new(AtomicBool::new(false)),
            events,
        }
    }

    /// Override the timeouts taken from the configuration.
    pub fn with_timeouts(mut self, timeouts: SessionTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Receive a `CaptureEvent` after every successful capture.
    pub fn subscribe(&self) -> broadcast::Receiver<CaptureEvent> {
        self.events.subscribe()
    }

    /// Whether a capture or crop is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn state(&self) -> SessionState {
        self.editor().state.clone()
    }

    pub fn phase(&self) -> ScanPhase {
        self.editor().state.phase()
    }

    /// Current correction points in display space (empty when idle).
    pub fn points(&self) -> PointSet {
        match &self.editor().state {
            SessionState::Idle => PointSet::empty(),
            SessionState::Editing { points, .. } => points.clone(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.editor().mapper.viewport()
    }

    pub fn transform(&self) -> Transform {
        self.editor().mapper.transform()
    }

    pub fn active_drag(&self) -> Option<ActiveDrag> {
        self.editor().drag.active().copied()
    }

    /// The zoom window to draw, present only while a point is dragged.
    pub fn magnifier_view(&self) -> Option<MagnifierView> {
        let editor = self.editor();
        self.magnifier_for(&editor)
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        let editor = self.editor();
        let phase = editor.state.phase();
        let (photo, points) = match &editor.state {
            SessionState::Idle => (None, PointSet::empty()),
            SessionState::Editing { photo, points } => (Some(photo.clone()), points.clone()),
        };
        EditorSnapshot {
            phase,
            camera_visible: phase == ScanPhase::Idle,
            photo,
            viewport: editor.mapper.viewport(),
            transform: editor.mapper.transform(),
            polygon: points.to_polygon_path(),
            handles: points.handles(&self.config.handles),
            points,
            active_drag: editor.drag.active().copied(),
            magnifier: self.magnifier_for(&editor),
        }
    }

    // -- Layout --------------------------------------------------------------

    /// Record a new overlay layout and carry the points (and any active drag)
    /// into it. Repeating the current layout changes nothing.
    ///
    /// A viewport with a non-positive or non-finite dimension is ignored and
    /// reported as `LayoutInvalid`. The session is left exactly as it was, so
    /// callers that only forward layout events may discard the error.
    pub fn on_layout_changed(&self, viewport: Viewport) -> Result<()> {
        if viewport.is_degenerate() {
            warn!(
                session = %self.id,
                width = viewport.width,
                height = viewport.height,
                "ignoring degenerate layout"
            );
            return Err(ScanError::LayoutInvalid {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let mut editor = self.editor();
        let current = editor.mapper;
        let next = current.relayout(viewport);
        if next == current {
            return Ok(());
        }

        if let SessionState::Editing { points, .. } = &mut editor.state {
            *points = points.project(|p| current.remap(&next, p));
        }
        editor.drag.remap(|p| current.remap(&next, p));
        editor.mapper = next;

        let t = next.transform();
        debug!(
            session = %self.id,
            width = viewport.width,
            height = viewport.height,
            scale_x = t.scale_x,
            scale_y = t.scale_y,
            "layout changed"
        );
        Ok(())
    }

    // -- Dragging ------------------------------------------------------------

    /// Start dragging point `index`; the magnifier appears on it.
    pub fn begin_drag(&self, index: usize) -> Result<Point> {
        let mut guard = self.editor();
        let Editor { state, drag, .. } = &mut *guard;
        let SessionState::Editing { points, .. } = state else {
            return Err(ScanError::NotEditing);
        };
        let active = drag.begin(index, points)?;
        debug!(session = %self.id, index, x = active.origin.x, y = active.origin.y, "drag started");
        Ok(active.position)
    }

    /// Move the dragged point by `(dx, dy)` from where the gesture started.
    /// Returns the point's new display position.
    pub fn drag_to(&self, index: usize, dx: f64, dy: f64) -> Result<Point> {
        let mut guard = self.editor();
        let Editor { state, drag, .. } = &mut *guard;
        let SessionState::Editing { points, .. } = state else {
            return Err(ScanError::NotEditing);
        };
        *points = drag.update(index, dx, dy, points)?;
        Ok(points.get(index).unwrap_or_default())
    }

    /// Release point `index` where it is; the magnifier hides.
    pub fn end_drag(&self, index: usize) -> Result<Point> {
        let finished = self.editor().drag.end(index)?;
        debug!(
            session = %self.id,
            index,
            x = finished.position.x,
            y = finished.position.y,
            "drag ended"
        );
        Ok(finished.position)
    }

    // -- External operations -------------------------------------------------

    /// Take a photo, detect the document in it, and start editing.
    ///
    /// A failed detection is not an error: editing starts with no points. A
    /// failed capture leaves the session idle.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn capture(&self) -> Result<CaptureEvent> {
        let flight = InFlight::acquire(&self.in_flight)?;

        let (generation, viewport) = {
            let editor = self.editor();
            if editor.state != SessionState::Idle {
                return Err(ScanError::NotIdle);
            }
            (editor.generation, editor.mapper.viewport())
        };

        let options = self.config.effective_capture_options();
        let captured = self
            .call_bridge(&flight, "capture", self.timeouts.capture, ScanError::CaptureFailed, move |b| {
                b.capture_photo(&options)
            })
            .await
            .inspect_err(|err| warn!(error = %err, "capture failed"))?;
        info!(
            photo = %captured.photo,
            width = captured.width,
            height = captured.height,
            "photo captured"
        );

        let photo = captured.photo.clone();
        let detection = match self
            .call_bridge(
                &flight,
                "edge detection",
                self.timeouts.detect,
                ScanError::DetectionFailed,
                move |b| b.detect_edges(&photo, &viewport),
            )
            .await
        {
            Ok(detection) => detection,
            Err(err) => {
                warn!(error = %err, "edge detection failed; editing without corners");
                Detection::NotFound
            }
        };

        let event = {
            let mut editor = self.editor();
            if editor.generation != generation {
                info!("capture superseded by restart; discarding photo");
                return Err(ScanError::Superseded);
            }

            let mapper = editor.mapper;
            let points = match detection {
                Detection::Found(quad) => PointSet::from_quad(quad.map(|p| mapper.to_display(p))),
                Detection::NotFound => PointSet::empty(),
            };
            info!(corners = points.len(), "editing started");

            let event = CaptureEvent {
                session: self.id,
                photo: captured.photo.clone(),
                document_found: !points.is_empty(),
                captured_at: Utc::now(),
            };
            editor.state = SessionState::Editing {
                photo: captured,
                points,
            };
            event
        };

        // No subscribers is fine.
        let _ = self.events.send(event.clone());
        Ok(event)
    }

    /// Crop the photo to the current points and return the cropped file.
    ///
    /// Needs all four corners; with fewer the crop service is not called.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn crop(&self) -> Result<PhotoRef> {
        let flight = InFlight::acquire(&self.in_flight)?;

        let (photo, corners) = {
            let editor = self.editor();
            let SessionState::Editing { photo, points } = &editor.state else {
                return Err(ScanError::NotEditing);
            };
            let mapper = editor.mapper;
            let corners = points
                .as_quad()
                .inspect_err(|err| warn!(error = %err, "crop refused"))?
                .map(|p| mapper.to_detection(p));
            (photo.photo.clone(), corners)
        };
        debug!(photo = %photo, corners = ?corners, "cropping");

        let cropped = self
            .call_bridge(&flight, "crop", self.timeouts.crop, ScanError::CropFailed, move |b| {
                b.crop(&photo, &corners)
            })
            .await
            .inspect_err(|err| warn!(error = %err, "crop failed"))?;
        info!(cropped = %cropped, "photo cropped");
        Ok(cropped)
    }

    /// Discard the photo, the points and any drag, and go back to the camera.
    /// The layout is kept. A capture still running will not commit.
    pub fn restart(&self) {
        let mut editor = self.editor();
        editor.state = SessionState::Idle;
        editor.drag.cancel();
        editor.generation += 1;
        info!(session = %self.id, "session restarted");
    }

    // -- Internals -----------------------------------------------------------

    fn editor(&self) -> MutexGuard<'_, Editor> {
        self.editor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn magnifier_for(&self, editor: &Editor) -> Option<MagnifierView> {
        let active = editor.drag.active()?;
        let photo = editor.state.photo()?;
        Some(
            self.magnifier
                .view(&photo.photo, active.position, &editor.mapper.viewport()),
        )
    }

    /// Run a blocking bridge call off the executor, bounded by `limit`.
    /// Every failure, the timeout included, is reported through `wrap`.
    ///
    /// The call keeps a share of `flight` until it returns, even when the
    /// caller has given up on it.
    async fn call_bridge<T, F>(
        &self,
        flight: &Arc<InFlight>,
        operation: &'static str,
        limit: Duration,
        wrap: fn(String) -> ScanError,
        call: F,
    ) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&B) -> Result<T> + Send + 'static,
    {
        let bridge = Arc::clone(&self.bridge);
        let flight = Arc::clone(flight);
        let task = tokio::task::spawn_blocking(move || {
            let _flight = flight;
            call(&*bridge)
        });
        match tokio::time::timeout(limit, task).await {
            Ok(Ok(result)) => result.map_err(|err| wrap(err.to_string())),
            Ok(Err(join_err)) => Err(wrap(format!("{operation} task failed: {join_err}"))),
            Err(_) => Err(wrap(format!("{operation} timed out after {limit:?}"))),
        }
    }
}
