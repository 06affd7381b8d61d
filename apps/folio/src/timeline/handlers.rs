use axum::{extract::State, Json};

use crate::resume::periods::current_year;
use crate::state::AppState;
use crate::timeline::{derive_timeline, Timeline};

/// GET /api/v1/timeline
pub async fn handle_get_timeline(State(state): State<AppState>) -> Json<Timeline> {
    Json(derive_timeline(state.resume.data(), current_year()))
}
