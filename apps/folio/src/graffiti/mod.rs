// Collaborative graffiti layer: freehand strokes on a fixed plane in scene
// space, shared with connected peers.

pub mod capture;
pub mod geometry;
pub mod handlers;
pub mod scene;
pub mod stroke;

pub use scene::{GraffitiScene, PointerEvent};
pub use stroke::Stroke;
