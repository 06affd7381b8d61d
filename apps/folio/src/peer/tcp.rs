//! Direct TCP transport. One JSON document per line; each side opens with a
//! hello line carrying its peer id.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::peer::transport::{PeerLink, PeerTransport};
use crate::peer::{PeerError, PeerId};

/// Longest accepted line, hello included.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, Deserialize)]
struct Hello {
    peer: PeerId,
}

pub struct TcpTransport {
    listen_addr: SocketAddr,
    handshake_timeout: Duration,
}

impl TcpTransport {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// How long either side waits for the other's hello line.
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }
}

#[async_trait]
impl PeerTransport for TcpTransport {
    async fn listen(&self, local: &PeerId) -> Result<mpsc::UnboundedReceiver<PeerLink>, PeerError> {
        let listener = TcpListener::bind(self.listen_addr).await?;
        info!("Peer endpoint listening on {}", listener.local_addr()?);

        let (tx, rx) = mpsc::unbounded_channel();
        let local = local.clone();
        let deadline = self.handshake_timeout;
        tokio::spawn(async move {
            loop {
                let accepted = tokio::select! {
                    accepted = listener.accept() => accepted,
                    _ = tx.closed() => break,
                };
                let (stream, addr) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        warn!("Peer accept failed: {e}");
                        continue;
                    }
                };
                let tx = tx.clone();
                let local = local.clone();
                tokio::spawn(async move {
                    match handshake(stream, &local, deadline).await {
                        Ok(link) => {
                            debug!("Accepted peer {} from {addr}", link.remote);
                            let _ = tx.send(link);
                        }
                        Err(e) => warn!("Handshake with {addr} failed: {e}"),
                    }
                });
            }
            debug!("Peer endpoint closed");
        });
        Ok(rx)
    }

    async fn dial(&self, local: &PeerId, address: &str) -> Result<PeerLink, PeerError> {
        let stream = TcpStream::connect(address)
            .await
            .map_err(|e| PeerError::Unreachable(format!("{address}: {e}")))?;
        handshake(stream, local, self.handshake_timeout).await
    }

    fn local_address(&self, _local: &PeerId) -> String {
        self.listen_addr.to_string()
    }
}

async fn handshake(
    stream: TcpStream,
    local: &PeerId,
    deadline: Duration,
) -> Result<PeerLink, PeerError> {
    stream.set_nodelay(true)?;
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let mut hello = serde_json::to_string(&Hello {
        peer: local.clone(),
    })?;
    hello.push('\n');
    write_half.write_all(hello.as_bytes()).await?;

    let line = tokio::time::timeout(deadline, read_bounded_line(&mut reader))
        .await
        .map_err(|_| PeerError::Handshake("timed out waiting for hello".to_string()))??
        .ok_or_else(|| PeerError::Handshake("connection closed before hello".to_string()))?;
    let remote: Hello =
        serde_json::from_str(&line).map_err(|e| PeerError::Handshake(e.to_string()))?;

    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    tokio::spawn(write_loop(write_half, out_rx));
    tokio::spawn(read_loop(reader, in_tx));

    Ok(PeerLink {
        remote: remote.peer,
        outbound: out_tx,
        inbound: in_rx,
    })
}

/// Reads one `\n`-terminated line of at most [`MAX_LINE_BYTES`].
/// `Ok(None)` at end of stream; an over-long line is an `InvalidData` error.
async fn read_bounded_line<R>(reader: &mut R) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let limit = MAX_LINE_BYTES as u64 + 1;
    let read = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;
    if read == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if buf.len() > MAX_LINE_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "peer line exceeds size limit",
        ));
    }
    String::from_utf8(buf)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

async fn write_loop(mut writer: OwnedWriteHalf, mut outbound: mpsc::UnboundedReceiver<Value>) {
    while let Some(payload) = outbound.recv().await {
        let mut line = match serde_json::to_string(&payload) {
            Ok(line) => line,
            Err(e) => {
                warn!("Dropping unserializable payload: {e}");
                continue;
            }
        };
        line.push('\n');
        if let Err(e) = writer.write_all(line.as_bytes()).await {
            debug!("Peer write failed: {e}");
            break;
        }
    }
    let _ = writer.shutdown().await;
}

async fn read_loop(mut reader: BufReader<OwnedReadHalf>, inbound: mpsc::UnboundedSender<Value>) {
    loop {
        let line = match read_bounded_line(&mut reader).await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                debug!("Peer read failed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line) {
            Ok(payload) => {
                if inbound.send(payload).is_err() {
                    break;
                }
            }
            Err(e) => warn!("Ignoring malformed peer payload: {e}"),
        }
    }
}
