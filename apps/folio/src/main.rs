mod config;
mod errors;
mod graffiti;
mod layout;
mod models;
mod peer;
mod resume;
mod routes;
mod state;
mod timeline;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::graffiti::GraffitiScene;
use crate::peer::{MemoryTransport, PeerService, PeerTransport, TcpTransport};
use crate::resume::images::AssetResolver;
use crate::resume::store::ResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting folio v{}", env!("CARGO_PKG_VERSION"));

    // Resume content is read once and never reloaded
    let resume = Arc::new(ResumeStore::load(&config.resume_path).await?);
    let assets = AssetResolver::new(&config.assets_dir);
    info!("Serving assets from {}", assets.root().display());

    // Peer transport: TCP when a listen address is configured, otherwise
    // an in-process endpoint with nobody else on it
    let transport: Arc<dyn PeerTransport> = match config.peer_listen_addr {
        Some(addr) => Arc::new(
            TcpTransport::new(addr).with_handshake_timeout(config.peer_handshake_timeout),
        ),
        None => {
            info!("PEER_LISTEN_ADDR not set; peer broadcast stays local");
            Arc::new(MemoryTransport::new())
        }
    };
    let peers = PeerService::new(transport);
    peers.start().await?;
    info!("Peer address: {}", peers.local_address());

    let graffiti = GraffitiScene::new(peers.clone(), config.graffiti_color.clone());

    for address in &config.peer_connect {
        if peers.connect(address).await.is_none() {
            warn!("Bootstrap peer {address} unreachable; continuing without it");
        }
    }

    // Build app state
    let state = AppState {
        resume,
        assets,
        peers: peers.clone(),
        graffiti,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    peers.stop().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
