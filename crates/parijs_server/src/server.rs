//! TCP accept loop pairing players in arrival order.

use crate::config::ServerConfig;
use crate::supervisor::MatchSupervisor;
use crate::transport::Connection;
use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Listens on the configured address until Ctrl+C.
///
/// The first connection of each pair plays Blue, the second Orange. A
/// waiting player who disconnects is forgotten rather than paired. Each
/// pair runs on its own task; the loop goes straight back to accepting.
#[instrument(skip(config), fields(address = %config.bind_address()))]
pub async fn serve(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Parijs server listening");
    run(listener, config).await
}

/// Runs the accept loop on an already bound listener.
pub async fn run(listener: TcpListener, config: ServerConfig) -> Result<()> {
    let supervisor = MatchSupervisor::new(&config);
    let mut waiting: Option<Connection> = None;

    loop {
        let (stream, addr) = tokio::select! {
            accepted = listener.accept() => accepted?,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down server");
                return Ok(());
            }
        };
        info!(%addr, "Player connected");
        let connection = Connection::tcp(stream, config.move_timeout());

        // Drop a waiting player whose connection ended before an opponent came.
        if waiting.as_ref().is_some_and(Connection::is_closed) {
            info!("Waiting player left before pairing");
            waiting = None;
        }

        match waiting.take() {
            None => {
                info!(%addr, "Waiting for an opponent");
                waiting = Some(connection);
            }
            Some(blue) => {
                let handle = supervisor.start(blue, connection);
                tokio::spawn(async move {
                    match handle.await {
                        Ok(Ok(outcome)) => info!(?outcome, "Match completed"),
                        Ok(Err(error)) => warn!(%error, "Match ended early"),
                        Err(error) => warn!(%error, "Match task panicked"),
                    }
                });
            }
        }
    }
}
