use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::resume::cards::{education_cards, experience_cards, ExpansionState, ExperienceCard};
use crate::resume::images::ImageResolution;
use crate::resume::periods::current_year;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ExperienceQuery {
    /// Experience whose project story is open.
    pub expanded: Option<String>,
    /// Card whose expand/collapse control was activated.
    pub toggle: Option<String>,
}

#[derive(Serialize)]
pub struct ExperienceView<'a> {
    /// Experience expanded after applying `toggle`.
    pub expanded: Option<&'a str>,
    pub cards: Vec<ExperienceCard<'a>>,
}

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<ResumeData> {
    Json(state.resume.data().clone())
}

/// GET /api/v1/experience
pub async fn handle_get_experience(
    State(state): State<AppState>,
    Query(params): Query<ExperienceQuery>,
) -> Response {
    let mut expansion = ExpansionState::new(params.expanded);
    if let Some(id) = params.toggle.as_deref() {
        expansion.toggle(id);
    }
    Json(ExperienceView {
        expanded: expansion.expanded(),
        cards: experience_cards(&state.resume, &expansion, current_year()),
    })
    .into_response()
}

/// GET /api/v1/education
pub async fn handle_get_education(State(state): State<AppState>) -> Response {
    Json(education_cards(&state.resume, current_year())).into_response()
}

/// GET /api/v1/projects/:id/image
pub async fn handle_project_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ImageResolution>, AppError> {
    let project = state
        .resume
        .project(&id)
        .ok_or_else(|| AppError::NotFound(format!("Project '{id}' not found")))?;
    Ok(Json(state.assets.resolve(project.image.as_deref()).await))
}
