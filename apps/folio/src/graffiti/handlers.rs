use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::graffiti::{PointerEvent, Stroke};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerRequest {
    pub phase: PointerPhase,
    /// Required for `down` and `move`.
    pub event: Option<PointerEvent>,
    /// The press landed on a card, link, button or input.
    #[serde(default)]
    pub over_ui: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerResponse {
    pub accepted: bool,
    /// A gesture is in progress after this event.
    pub drawing: bool,
    /// Points kept so far in the gesture in progress.
    pub pending_points: usize,
    /// Set when an `up` finished a non-empty stroke.
    pub stroke: Option<Stroke>,
}

#[derive(Serialize)]
pub struct StrokeList {
    pub color: String,
    pub strokes: Vec<Stroke>,
}

/// GET /api/v1/graffiti/strokes
pub async fn handle_get_strokes(State(state): State<AppState>) -> Json<StrokeList> {
    Json(StrokeList {
        color: state.graffiti.color().to_string(),
        strokes: state.graffiti.strokes(),
    })
}

/// POST /api/v1/graffiti/pointer
pub async fn handle_pointer(
    State(state): State<AppState>,
    Json(req): Json<PointerRequest>,
) -> Result<Json<PointerResponse>, AppError> {
    let scene = &state.graffiti;
    let (accepted, stroke) = match (req.phase, req.event) {
        (PointerPhase::Down, Some(event)) => (scene.pointer_down(&event, |_| req.over_ui), None),
        (PointerPhase::Move, Some(event)) => (scene.pointer_move(&event), None),
        (PointerPhase::Up, _) => {
            let stroke = scene.pointer_up();
            (stroke.is_some(), stroke)
        }
        (_, None) => {
            return Err(AppError::Validation(
                "event is required for down and move".to_string(),
            ))
        }
    };
    Ok(Json(PointerResponse {
        accepted,
        drawing: scene.is_drawing(),
        pending_points: scene.pending_points(),
        stroke,
    }))
}
