use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::peer::{ConnectionId, ConnectionInfo, PeerId};
use crate::state::AppState;

#[derive(Serialize)]
pub struct PeerSummary {
    pub identity: PeerId,
    pub address: String,
    pub running: bool,
    pub open: usize,
    pub connections: Vec<ConnectionInfo>,
}

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub address: String,
}

#[derive(Serialize)]
pub struct ConnectResponse {
    pub connected: bool,
    pub connection_id: Option<ConnectionId>,
}

/// GET /api/v1/peer
pub async fn handle_get_peer(State(state): State<AppState>) -> Json<PeerSummary> {
    let peers = &state.peers;
    Json(PeerSummary {
        identity: peers.identity().clone(),
        address: peers.local_address(),
        running: peers.is_running(),
        open: peers.open_count(),
        connections: peers.connections(),
    })
}

/// POST /api/v1/peer/connect
///
/// An unreachable peer is not an HTTP error: the failure is logged by the
/// service and reported as `connected: false`.
pub async fn handle_connect(
    State(state): State<AppState>,
    Json(req): Json<ConnectRequest>,
) -> Result<Json<ConnectResponse>, AppError> {
    let address = req.address.trim();
    if address.is_empty() {
        return Err(AppError::Validation("address must not be empty".to_string()));
    }

    let connection_id = state.peers.connect(address).await;
    Ok(Json(ConnectResponse {
        connected: connection_id.is_some(),
        connection_id,
    }))
}

/// DELETE /api/v1/peer/connections/:id
pub async fn handle_disconnect(
    State(state): State<AppState>,
    Path(id): Path<ConnectionId>,
) -> Result<Json<ConnectResponse>, AppError> {
    if !state.peers.disconnect(id) {
        return Err(AppError::NotFound(format!("Connection {id} not found")));
    }
    Ok(Json(ConnectResponse {
        connected: false,
        connection_id: Some(id),
    }))
}
