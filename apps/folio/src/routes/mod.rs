pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::state::AppState;
use crate::{graffiti, layout, peer, resume, timeline};

pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.assets_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume content
        .route("/api/v1/resume", get(resume::handlers::handle_get_resume))
        .route(
            "/api/v1/experience",
            get(resume::handlers::handle_get_experience),
        )
        .route(
            "/api/v1/education",
            get(resume::handlers::handle_get_education),
        )
        .route(
            "/api/v1/projects/:id/image",
            get(resume::handlers::handle_project_image),
        )
        .route(
            "/api/v1/timeline",
            get(timeline::handlers::handle_get_timeline),
        )
        // Layout shell
        .route("/api/v1/layout", get(layout::handlers::handle_get_layout))
        .route(
            "/api/v1/layout/active",
            post(layout::handlers::handle_active_section),
        )
        // Peers and graffiti
        .route("/api/v1/peer", get(peer::handlers::handle_get_peer))
        .route("/api/v1/peer/connect", post(peer::handlers::handle_connect))
        .route(
            "/api/v1/peer/connections/:id",
            delete(peer::handlers::handle_disconnect),
        )
        .route(
            "/api/v1/graffiti/strokes",
            get(graffiti::handlers::handle_get_strokes),
        )
        .route(
            "/api/v1/graffiti/pointer",
            post(graffiti::handlers::handle_pointer),
        )
        .fallback_service(assets)
        .with_state(state)
}
