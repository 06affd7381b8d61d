use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::graffiti::capture::{PointerType, StrokeCapture, MIN_POINT_DISTANCE};
use crate::graffiti::geometry::{PerspectiveCamera, Plane, Vec3, Viewport};
use crate::graffiti::stroke::Stroke;
use crate::peer::{PeerMessage, PeerService};

pub const DEFAULT_COLOR: &str = "#00ff88";

/// A pointer event on the scene's input surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub pointer_type: PointerType,
    #[serde(default)]
    pub button: u16,
    pub client_x: f64,
    pub client_y: f64,
    pub viewport: Viewport,
}

/// Shared drawing layer: local capture plus every stroke seen this session,
/// local or remote. The render list only grows.
#[derive(Clone)]
pub struct GraffitiScene {
    peers: PeerService,
    capture: Arc<Mutex<StrokeCapture>>,
    strokes: Arc<RwLock<Vec<Stroke>>>,
    color: String,
    camera: PerspectiveCamera,
    plane: Plane,
}

impl GraffitiScene {
    /// Builds the scene and subscribes it to inbound peer strokes.
    pub fn new(peers: PeerService, color: impl Into<String>) -> Self {
        let strokes: Arc<RwLock<Vec<Stroke>>> = Arc::default();

        let sink = Arc::clone(&strokes);
        peers.on_message(move |from, payload| {
            // Appended as received: no validation, no dedup.
            if let Some(PeerMessage::Stroke(stroke)) = PeerMessage::decode(payload) {
                debug!("Stroke {} from peer {from}", stroke.id);
                sink.write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(stroke);
            }
        });

        Self {
            peers,
            capture: Arc::new(Mutex::new(StrokeCapture::new(MIN_POINT_DISTANCE))),
            strokes,
            color: color.into(),
            camera: PerspectiveCamera::default(),
            plane: Plane::DRAWING,
        }
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Starts a stroke unless `is_over_ui` says the press belongs to an
    /// interactive element (card, link, button, input).
    pub fn pointer_down<F>(&self, event: &PointerEvent, is_over_ui: F) -> bool
    where
        F: FnOnce(&PointerEvent) -> bool,
    {
        let over_ui = is_over_ui(event);
        self.capture().pointer_down(event.pointer_type, event.button, over_ui)
    }

    pub fn pointer_move(&self, event: &PointerEvent) -> bool {
        let target = self.project(event);
        self.capture().pointer_move(target)
    }

    /// Finishes the gesture. A non-empty stroke is added to the render list
    /// and broadcast to every open peer.
    pub fn pointer_up(&self) -> Option<Stroke> {
        let points = self.capture().pointer_up()?;
        let stroke = Stroke::new(points, &self.color, self.peers.identity());

        self.strokes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(stroke.clone());

        match self
            .peers
            .broadcast_message(&PeerMessage::Stroke(stroke.clone()))
        {
            Ok(delivered) => debug!("Stroke {} sent to {delivered} peer(s)", stroke.id),
            Err(e) => warn!("Failed to broadcast stroke {}: {e}", stroke.id),
        }
        Some(stroke)
    }

    pub fn is_drawing(&self) -> bool {
        self.capture().is_drawing()
    }

    /// Points kept so far in the gesture in progress.
    pub fn pending_points(&self) -> usize {
        self.capture().points().len()
    }

    /// Snapshot of the render list in arrival order.
    pub fn strokes(&self) -> Vec<Stroke> {
        self.strokes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn project(&self, event: &PointerEvent) -> Option<Vec3> {
        let (x, y) = event.viewport.to_ndc(event.client_x, event.client_y)?;
        let ray = self.camera.ray_from_ndc(x, y, event.viewport.aspect());
        self.plane.intersect(&ray)
    }

    fn capture(&self) -> std::sync::MutexGuard<'_, StrokeCapture> {
        self.capture.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
