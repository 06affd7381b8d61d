use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::{page_layout, section_ids, PageLayout, SectionBounds, SectionId, SectionTracker};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LayoutQuery {
    #[serde(default)]
    pub desktop: bool,
    pub active: Option<SectionId>,
}

/// Sections currently on screen, measured by the client.
#[derive(Deserialize)]
pub struct ActiveSectionRequest {
    #[serde(default)]
    pub desktop: bool,
    pub viewport_height: f64,
    /// Section the navigation currently highlights.
    pub active: Option<SectionId>,
    pub sections: Vec<SectionBounds>,
}

#[derive(Serialize)]
pub struct ActiveSectionResponse {
    pub active: SectionId,
    pub layout: PageLayout,
}

/// GET /api/v1/layout
pub async fn handle_get_layout(
    State(_state): State<AppState>,
    Query(params): Query<LayoutQuery>,
) -> Json<PageLayout> {
    let active = params.active.unwrap_or(SectionId::About);
    Json(page_layout(params.desktop, active))
}

/// POST /api/v1/layout/active
pub async fn handle_active_section(
    State(_state): State<AppState>,
    Json(req): Json<ActiveSectionRequest>,
) -> Result<Json<ActiveSectionResponse>, AppError> {
    if !req.viewport_height.is_finite() || req.viewport_height <= 0.0 {
        return Err(AppError::Validation(
            "viewport_height must be a positive number".to_string(),
        ));
    }

    let mut tracker = SectionTracker::new(section_ids(req.desktop));
    if let Some(active) = req.active {
        tracker.scroll_to(active);
    }
    let active = tracker
        .measure(&req.sections, req.viewport_height)
        .unwrap_or_else(|| tracker.active());

    Ok(Json(ActiveSectionResponse {
        active,
        layout: page_layout(req.desktop, active),
    }))
}
