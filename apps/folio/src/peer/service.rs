//! The peer broadcast service.
//!
//! # Lifecycle
//! - Constructed explicitly and injected; there is no process-wide instance.
//! - `start` binds the transport endpoint and accepts inbound connections.
//! - `stop` cancels the accept loop and every connection task.
//!
//! # Connections
//! `pending -> open -> closed`. Outbound connections are pending while the
//! transport dials; inbound ones are registered open. A closed connection is
//! removed from the set and never retried.
//!
//! Shared state sits behind short `std::sync` critical sections that are
//! never held across an `.await`.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::peer::transport::{PeerLink, PeerTransport};
use crate::peer::{ConnectionState, PeerError, PeerId, PeerMessage};

pub type MessageHandler = Arc<dyn Fn(&PeerId, &Value) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionInfo {
    pub id: ConnectionId,
    pub remote: Option<PeerId>,
    /// Dialled address; `None` for inbound connections.
    pub address: Option<String>,
    pub state: ConnectionState,
}

struct Connection {
    remote: Option<PeerId>,
    address: Option<String>,
    state: ConnectionState,
    outbound: Option<mpsc::UnboundedSender<Value>>,
    reader: Option<JoinHandle<()>>,
}

impl Connection {
    fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
            && self.outbound.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    fn info(&self, id: ConnectionId) -> ConnectionInfo {
        ConnectionInfo {
            id,
            remote: self.remote.clone(),
            address: self.address.clone(),
            state: if self.state == ConnectionState::Open && !self.is_open() {
                ConnectionState::Closed
            } else {
                self.state
            },
        }
    }
}

struct Inner {
    id: PeerId,
    transport: Arc<dyn PeerTransport>,
    connections: Mutex<HashMap<ConnectionId, Connection>>,
    handlers: RwLock<Vec<MessageHandler>>,
    accept_task: Mutex<Option<JoinHandle<()>>>,
    next_connection: AtomicU64,
    running: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Inner {
    fn next_id(&self) -> ConnectionId {
        ConnectionId(self.next_connection.fetch_add(1, Ordering::Relaxed))
    }

    fn dispatch(&self, from: &PeerId, payload: &Value) {
        let handlers: Vec<MessageHandler> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for handler in handlers {
            handler(from, payload);
        }
    }

    fn remove(&self, id: ConnectionId) -> Option<Connection> {
        lock(&self.connections).remove(&id)
    }
}

/// Best-effort JSON broadcast to every open peer connection.
#[derive(Clone)]
pub struct PeerService {
    inner: Arc<Inner>,
}

impl PeerService {
    pub fn new(transport: Arc<dyn PeerTransport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: PeerId::generate(),
                transport,
                connections: Mutex::new(HashMap::new()),
                handlers: RwLock::new(Vec::new()),
                accept_task: Mutex::new(None),
                next_connection: AtomicU64::new(1),
                running: AtomicBool::new(false),
            }),
        }
    }

    /// This session's peer id; fixed for the lifetime of the service.
    pub fn identity(&self) -> &PeerId {
        &self.inner.id
    }

    /// The address other peers should pass to [`Self::connect`].
    pub fn local_address(&self) -> String {
        self.inner.transport.local_address(&self.inner.id)
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    pub async fn start(&self) -> Result<(), PeerError> {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            return Err(PeerError::AlreadyStarted);
        }
        let mut incoming = match self.inner.transport.listen(&self.inner.id).await {
            Ok(rx) => rx,
            Err(e) => {
                self.inner.running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let weak = Arc::downgrade(&self.inner);
        let task = tokio::spawn(async move {
            while let Some(link) = incoming.recv().await {
                let Some(inner) = weak.upgrade() else { break };
                info!("Connected to peer: {}", link.remote);
                let id = inner.next_id();
                register_open(&inner, id, link, None);
            }
        });
        *lock(&self.inner.accept_task) = Some(task);

        info!("Peer service started as {}", self.inner.id);
        Ok(())
    }

    /// Connects to the peer at `address`.
    ///
    /// Returns the connection id once open. Failures are logged and yield
    /// `None`; nothing is retried.
    pub async fn connect(&self, address: &str) -> Option<ConnectionId> {
        let id = self.inner.next_id();
        lock(&self.inner.connections).insert(
            id,
            Connection {
                remote: None,
                address: Some(address.to_string()),
                state: ConnectionState::Pending,
                outbound: None,
                reader: None,
            },
        );
        // Covers the caller dropping this future mid-dial as well as dial errors.
        let _pending = PendingGuard {
            inner: &self.inner,
            id,
        };

        match self.inner.transport.dial(&self.inner.id, address).await {
            Ok(link) => {
                let mut connections = lock(&self.inner.connections);
                // `stop` (or `disconnect`) while dialling discards the attempt.
                if !connections.contains_key(&id) {
                    debug!("Dropping late connection to {address}");
                    return None;
                }
                info!("Connected to peer: {} at {address}", link.remote);
                let connection = open_connection(&self.inner, id, link, Some(address.to_string()));
                connections.insert(id, connection);
                Some(id)
            }
            Err(e) => {
                warn!("Peer connection to {address} failed: {e}");
                None
            }
        }
    }

    /// Sends `payload` to every open connection and returns how many it was
    /// handed to. Pending and closed connections are skipped.
    pub fn broadcast(&self, payload: &Value) -> usize {
        let connections = lock(&self.inner.connections);
        connections
            .values()
            .filter(|c| c.is_open())
            .filter_map(|c| c.outbound.as_ref())
            .filter(|tx| tx.send(payload.clone()).is_ok())
            .count()
    }

    pub fn broadcast_message(&self, message: &PeerMessage) -> Result<usize, PeerError> {
        let payload = serde_json::to_value(message)?;
        Ok(self.broadcast(&payload))
    }

    /// Registers a handler for every inbound payload. Handlers run in
    /// registration order, once per message, in arrival order per connection.
    pub fn on_message<F>(&self, handler: F)
    where
        F: Fn(&PeerId, &Value) + Send + Sync + 'static,
    {
        self.inner
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(handler));
    }

    pub fn connections(&self) -> Vec<ConnectionInfo> {
        let connections = lock(&self.inner.connections);
        let mut infos: Vec<_> = connections.iter().map(|(&id, c)| c.info(id)).collect();
        infos.sort_by_key(|i| i.id.0);
        infos
    }

    pub fn open_count(&self) -> usize {
        lock(&self.inner.connections)
            .values()
            .filter(|c| c.is_open())
            .count()
    }

    /// Closes one connection. Returns false if it was not known.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        match self.inner.remove(id) {
            Some(connection) => {
                if let Some(reader) = connection.reader {
                    reader.abort();
                }
                true
            }
            None => false,
        }
    }

    /// Stops accepting and closes every connection.
    pub async fn stop(&self) {
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            return;
        }
        // Accept loop first, so nothing registers behind the drain below.
        let accept = lock(&self.inner.accept_task).take();
        if let Some(task) = accept {
            task.abort();
            let _ = task.await;
        }

        let drained: Vec<Connection> = lock(&self.inner.connections)
            .drain()
            .map(|(_, c)| c)
            .collect();
        let readers: Vec<JoinHandle<()>> = drained.into_iter().filter_map(|c| c.reader).collect();
        for reader in &readers {
            reader.abort();
        }
        for reader in readers {
            // Cancelled tasks resolve once their futures (and channels) are dropped.
            let _ = reader.await;
        }
        info!("Peer service stopped");
    }
}

/// Removes a connection record that is still pending when dropped.
struct PendingGuard<'a> {
    inner: &'a Inner,
    id: ConnectionId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut connections = lock(&self.inner.connections);
        let pending = connections
            .get(&self.id)
            .is_some_and(|c| c.state == ConnectionState::Pending);
        if pending {
            connections.remove(&self.id);
        }
    }
}

fn register_open(inner: &Arc<Inner>, id: ConnectionId, link: PeerLink, address: Option<String>) {
    let mut connections = lock(&inner.connections);
    let connection = open_connection(inner, id, link, address);
    connections.insert(id, connection);
}

/// Spawns the reader for `link`. Callers hold the connections lock, so the
/// reader cannot observe a missing entry before it is inserted.
fn open_connection(
    inner: &Arc<Inner>,
    id: ConnectionId,
    link: PeerLink,
    address: Option<String>,
) -> Connection {
    let PeerLink {
        remote,
        outbound,
        mut inbound,
    } = link;

    let weak: Weak<Inner> = Arc::downgrade(inner);
    let from = remote.clone();
    let reader = tokio::spawn(async move {
        while let Some(payload) = inbound.recv().await {
            let Some(inner) = weak.upgrade() else { return };
            inner.dispatch(&from, &payload);
        }
        if let Some(inner) = weak.upgrade() {
            if inner.remove(id).is_some() {
                info!("Peer {from} disconnected");
            }
        }
    });

    Connection {
        remote: Some(remote),
        address,
        state: ConnectionState::Open,
        outbound: Some(outbound),
        reader: Some(reader),
    }
}
