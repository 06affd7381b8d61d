// Peer-to-peer broadcast: direct connections between visitor sessions, no
// relay and no signaling. Peers are reached by explicit address only.

pub mod handlers;
pub mod memory;
pub mod message;
pub mod service;
pub mod tcp;
pub mod transport;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryTransport;
pub use message::PeerMessage;
pub use service::{ConnectionId, ConnectionInfo, PeerService};
pub use tcp::TcpTransport;
pub use transport::PeerTransport;

/// Identity of one peer session. Generated once per service instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(Uuid);

impl PeerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PeerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Pending,
    Open,
    Closed,
}

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("Peer '{0}' is not reachable")]
    Unreachable(String),

    #[error("Peer service is already started")]
    AlreadyStarted,

    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
