use std::sync::Arc;

use crate::config::Config;
use crate::graffiti::GraffitiScene;
use crate::peer::PeerService;
use crate::resume::images::AssetResolver;
use crate::resume::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup.
    pub resume: Arc<ResumeStore>,
    pub assets: AssetResolver,
    pub peers: PeerService,
    pub graffiti: GraffitiScene,
    pub config: Config,
}
