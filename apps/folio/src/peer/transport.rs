use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::peer::{PeerError, PeerId};

/// An established connection as handed over by a transport.
///
/// Payloads are untyped JSON at this boundary. Dropping `outbound` or
/// `inbound` closes the link; the other side observes `inbound` ending.
#[derive(Debug)]
pub struct PeerLink {
    pub remote: PeerId,
    pub outbound: mpsc::UnboundedSender<Value>,
    pub inbound: mpsc::UnboundedReceiver<Value>,
}

impl PeerLink {
    /// Two connected halves: the first is held by `a` and talks to `b`.
    pub fn pair(a: PeerId, b: PeerId) -> (PeerLink, PeerLink) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        (
            PeerLink {
                remote: b,
                outbound: a_tx,
                inbound: a_rx,
            },
            PeerLink {
                remote: a,
                outbound: b_tx,
                inbound: b_rx,
            },
        )
    }
}

/// How peers reach each other. Swapped at startup: in-process for tests and
/// solo sessions, TCP when a listen address is configured.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Binds the local endpoint. Inbound links arrive on the returned
    /// channel until it is dropped.
    async fn listen(&self, local: &PeerId) -> Result<mpsc::UnboundedReceiver<PeerLink>, PeerError>;

    /// Dials `address`. No timeout: a peer that never answers stalls here.
    async fn dial(&self, local: &PeerId, address: &str) -> Result<PeerLink, PeerError>;

    /// The address other peers should dial to reach `local`.
    fn local_address(&self, local: &PeerId) -> String;
}
