//! In-process transport. Every service sharing one `MemoryTransport` can
//! dial the others by peer id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::peer::transport::{PeerLink, PeerTransport};
use crate::peer::{PeerError, PeerId};

#[derive(Clone, Default)]
pub struct MemoryTransport {
    endpoints: Arc<Mutex<HashMap<PeerId, mpsc::UnboundedSender<PeerLink>>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PeerTransport for MemoryTransport {
    async fn listen(&self, local: &PeerId) -> Result<mpsc::UnboundedReceiver<PeerLink>, PeerError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.endpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(local.clone(), tx);
        debug!("Memory endpoint bound for {local}");
        Ok(rx)
    }

    async fn dial(&self, local: &PeerId, address: &str) -> Result<PeerLink, PeerError> {
        let remote: PeerId = address
            .parse()
            .map_err(|_| PeerError::Unreachable(address.to_string()))?;

        let mut endpoints = self.endpoints.lock().unwrap_or_else(PoisonError::into_inner);
        let endpoint = endpoints
            .get(&remote)
            .ok_or_else(|| PeerError::Unreachable(address.to_string()))?;

        let (ours, theirs) = PeerLink::pair(local.clone(), remote.clone());
        if endpoint.send(theirs).is_err() {
            // Listener went away; forget it.
            endpoints.remove(&remote);
            return Err(PeerError::Unreachable(address.to_string()));
        }
        Ok(ours)
    }

    fn local_address(&self, local: &PeerId) -> String {
        local.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_dial_hands_other_half_to_listener() {
        let transport = MemoryTransport::new();
        let a = PeerId::generate();
        let b = PeerId::generate();
        let mut incoming = transport.listen(&b).await.unwrap();

        let ours = transport.dial(&a, &b.to_string()).await.unwrap();
        assert_eq!(ours.remote, b);

        let mut theirs = incoming.recv().await.unwrap();
        assert_eq!(theirs.remote, a);

        ours.outbound.send(json!({"hello": 1})).unwrap();
        assert_eq!(theirs.inbound.recv().await.unwrap(), json!({"hello": 1}));
    }

    #[tokio::test]
    async fn test_dial_unknown_peer_is_unreachable() {
        let transport = MemoryTransport::new();
        let err = transport
            .dial(&PeerId::generate(), &PeerId::generate().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, PeerError::Unreachable(_)));

        let err = transport
            .dial(&PeerId::generate(), "not-a-peer-id")
            .await
            .unwrap_err();
        assert!(matches!(err, PeerError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_dropped_listener_is_unreachable() {
        let transport = MemoryTransport::new();
        let b = PeerId::generate();
        drop(transport.listen(&b).await.unwrap());

        let err = transport
            .dial(&PeerId::generate(), &b.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, PeerError::Unreachable(_)));
    }
}
