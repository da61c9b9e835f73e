//! Line-delimited JSON transport.
//!
//! A [`Connection`] pairs a [`Gateway`] with two tasks over its stream:
//! a writer fed by the gateway's outbound channel and a reader that routes
//! decoded replies back into the gateway. Both start as soon as the
//! connection is accepted, so a player who leaves while still waiting for
//! an opponent is noticed before pairing.

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::protocol::{ClientMessage, ServerMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// The read half of a player connection.
struct Inbound {
    name: String,
    reader: BufReader<BoxedReader>,
}

impl Inbound {
    /// Decodes lines until the stream ends, delivering each to `gateway`.
    ///
    /// End of stream or a read error closes the gateway; an undecodable line
    /// or an unmatched reply fails it with a protocol desync. Returns the
    /// error that ended the connection.
    #[instrument(skip_all, fields(player = %self.name))]
    async fn run(mut self, gateway: Arc<Gateway>) -> GatewayError {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("Player disconnected");
                    gateway.close();
                    return self.closed();
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(%error, "Read failed");
                    gateway.close();
                    return self.closed();
                }
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            debug!(line = trimmed, "Received line");

            let message = match serde_json::from_str::<ClientMessage>(trimmed) {
                Ok(message) => message,
                Err(error) => {
                    warn!(%error, "Undecodable line");
                    let desync = GatewayError::ProtocolDesync {
                        player: self.name.clone(),
                        detail: format!("undecodable message: {error}"),
                    };
                    gateway.fail(desync.clone());
                    return desync;
                }
            };

            if let Err(desync) = gateway.deliver(message) {
                return desync;
            }
        }
    }

    fn closed(&self) -> GatewayError {
        GatewayError::TransportClosed {
            player: self.name.clone(),
        }
    }
}

/// A connected player: its gateway and the task reading its replies.
pub struct Connection {
    gateway: Arc<Gateway>,
    reader: JoinHandle<GatewayError>,
}

impl Connection {
    /// Wraps a reader/writer pair and starts the reader and writer tasks.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new<R, W>(
        name: impl Into<String>,
        reader: R,
        writer: W,
        move_timeout: Option<Duration>,
    ) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let name = name.into();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_lines(name.clone(), writer, rx));
        let gateway = Arc::new(Gateway::new(name.clone(), tx, move_timeout));
        let inbound = Inbound {
            name,
            reader: BufReader::new(Box::new(reader)),
        };
        let reader = tokio::spawn(inbound.run(Arc::clone(&gateway)));
        Self { gateway, reader }
    }

    /// Wraps an accepted TCP stream, named after the peer address.
    pub fn tcp(stream: TcpStream, move_timeout: Option<Duration>) -> Self {
        let name = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown-peer".to_string());
        let (reader, writer) = stream.into_split();
        Self::new(name, reader, writer, move_timeout)
    }

    /// The player's gateway.
    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    /// Returns true once the reader has stopped: the peer left or broke
    /// the protocol.
    pub fn is_closed(&self) -> bool {
        self.reader.is_finished()
    }

    /// Splits into the gateway and its reader task, which resolves to the
    /// error that ended the connection.
    pub fn into_parts(self) -> (Arc<Gateway>, JoinHandle<GatewayError>) {
        (self.gateway, self.reader)
    }
}

#[instrument(skip(writer, rx))]
async fn write_lines<W>(name: String, mut writer: W, mut rx: mpsc::UnboundedReceiver<ServerMessage>)
where
    W: AsyncWrite + Send + Unpin,
{
    while let Some(message) = rx.recv().await {
        let mut line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(error) => {
                warn!(%error, "Failed to encode message");
                continue;
            }
        };
        line.push('\n');
        if let Err(error) = writer.write_all(line.as_bytes()).await {
            warn!(%error, "Write failed; stopping writer");
            break;
        }
        if let Err(error) = writer.flush().await {
            warn!(%error, "Flush failed; stopping writer");
            break;
        }
    }
    debug!("Writer finished");
}
