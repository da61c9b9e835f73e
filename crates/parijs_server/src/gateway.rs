//! Per-player gateway correlating outbound asks with inbound replies.
//!
//! Each gateway owns a single pending slot. An ask registers the slot,
//! sends the request and awaits a oneshot; the inbound reader fills the
//! slot when the reply with the same request id arrives. The slot is
//! cleared on every exit path by a drop guard, so a timed-out or
//! cancelled ask never leaves a stale registration behind.

use crate::error::GatewayError;
use crate::player::Player;
use crate::protocol::{ClientMessage, MoveRequest, Notification, ProposedMove, ServerMessage};
use parijs_game::MoveResponse;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

type Reply = Result<ProposedMove, GatewayError>;

struct Pending {
    request_id: u64,
    reply: oneshot::Sender<Reply>,
}

#[derive(Default)]
struct Slot {
    pending: Option<Pending>,
    last_request_id: u64,
    failure: Option<GatewayError>,
}

/// Façade over one connected player.
pub struct Gateway {
    name: String,
    outbound: mpsc::UnboundedSender<ServerMessage>,
    slot: Mutex<Slot>,
    next_request_id: AtomicU64,
    move_timeout: Option<Duration>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("name", &self.name)
            .field("move_timeout", &self.move_timeout)
            .finish_non_exhaustive()
    }
}

/// Deregisters the pending ask when the asking future finishes or is dropped.
struct PendingGuard<'a> {
    gateway: &'a Gateway,
    request_id: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut slot = self.gateway.lock();
        if slot
            .pending
            .as_ref()
            .is_some_and(|p| p.request_id == self.request_id)
        {
            slot.pending = None;
        }
    }
}

impl Gateway {
    /// Creates a gateway that writes outbound messages to `outbound`.
    ///
    /// With `move_timeout` unset an unresponsive player stalls its match
    /// until the connection closes.
    pub fn new(
        name: impl Into<String>,
        outbound: mpsc::UnboundedSender<ServerMessage>,
        move_timeout: Option<Duration>,
    ) -> Self {
        Self {
            name: name.into(),
            outbound,
            slot: Mutex::new(Slot::default()),
            next_request_id: AtomicU64::new(1),
            move_timeout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn closed(&self) -> GatewayError {
        GatewayError::TransportClosed {
            player: self.name.clone(),
        }
    }

    fn desync(&self, detail: String) -> GatewayError {
        GatewayError::ProtocolDesync {
            player: self.name.clone(),
            detail,
        }
    }

    fn send(&self, message: ServerMessage) -> Result<(), GatewayError> {
        self.outbound.send(message).map_err(|_| self.closed())
    }

    /// Returns true while an ask is waiting for its reply.
    pub fn is_awaiting(&self) -> bool {
        self.lock().pending.is_some()
    }

    /// Routes one decoded inbound message to the pending ask.
    ///
    /// A reply with no outstanding ask, or with a different request id, is a
    /// protocol desync: the gateway is failed and every later ask errors.
    #[instrument(skip(self), fields(player = %self.name))]
    pub fn deliver(&self, message: ClientMessage) -> Result<(), GatewayError> {
        let ClientMessage::Move { request_id, mv } = message;
        let mut slot = self.lock();
        match slot.pending.take() {
            Some(pending) if pending.request_id == request_id => {
                debug!(request_id, ?mv, "Reply matched pending ask");
                // The asker may have timed out between take() and send().
                let _ = pending.reply.send(Ok(mv));
                Ok(())
            }
            Some(pending) => {
                let error = self.desync(format!(
                    "reply to request {request_id} while request {} is pending",
                    pending.request_id
                ));
                warn!(%error, "Mismatched reply");
                slot.failure.get_or_insert_with(|| error.clone());
                let _ = pending.reply.send(Err(error.clone()));
                Err(error)
            }
            None => {
                let error = self.desync(format!(
                    "reply to request {request_id} with no request outstanding"
                ));
                warn!(%error, "Unsolicited reply");
                slot.failure.get_or_insert_with(|| error.clone());
                Err(error)
            }
        }
    }

    /// Fails the gateway: the pending ask and every later ask return `error`.
    #[instrument(skip(self), fields(player = %self.name))]
    pub fn fail(&self, error: GatewayError) {
        let mut slot = self.lock();
        if slot.failure.is_none() {
            info!(%error, "Gateway failed");
            slot.failure = Some(error.clone());
        }
        if let Some(pending) = slot.pending.take() {
            let _ = pending.reply.send(Err(error));
        }
    }

    /// Marks the transport as closed.
    pub fn close(&self) {
        self.fail(self.closed());
    }
}

#[async_trait::async_trait]
impl Player for Gateway {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, request), fields(player = %self.name))]
    async fn ask_move(&self, request: MoveRequest) -> Result<ProposedMove, GatewayError> {
        let (tx, rx) = oneshot::channel();
        let request_id = {
            let mut slot = self.lock();
            if let Some(failure) = &slot.failure {
                return Err(failure.clone());
            }
            if let Some(pending) = &slot.pending {
                return Err(self.desync(format!(
                    "second ask issued while request {} is pending",
                    pending.request_id
                )));
            }
            let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
            slot.pending = Some(Pending {
                request_id,
                reply: tx,
            });
            slot.last_request_id = request_id;
            request_id
        };
        let _guard = PendingGuard {
            gateway: self,
            request_id,
        };

        debug!(request_id, "Asking for move");
        self.send(ServerMessage::ask(request_id, request))?;

        let received = match self.move_timeout {
            Some(limit) => tokio::time::timeout(limit, rx).await.map_err(|_| {
                warn!(request_id, "Move request timed out");
                GatewayError::Timeout {
                    player: self.name.clone(),
                    request_id,
                    seconds: limit.as_secs(),
                }
            })?,
            None => rx.await,
        };

        // A dropped sender means the slot was torn down without a verdict.
        received.unwrap_or_else(|_| Err(self.closed()))
    }

    fn respond(&self, response: MoveResponse) -> Result<(), GatewayError> {
        let request_id = self.lock().last_request_id;
        self.send(ServerMessage::MoveResponse {
            request_id,
            response,
        })
    }

    fn notify(&self, notification: Notification) -> Result<(), GatewayError> {
        self.send(notification.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsolicited_reply_fails_gateway() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let gateway = Gateway::new("solo", tx, None);
        let result = gateway.deliver(ClientMessage::Move {
            request_id: 1,
            mv: ProposedMove::Pass,
        });
        assert!(matches!(result, Err(GatewayError::ProtocolDesync { .. })));
        assert!(!gateway.is_awaiting());
    }

    #[test]
    fn test_notify_after_writer_gone_is_closed() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let gateway = Gateway::new("gone", tx, None);
        assert_eq!(
            gateway.notify(Notification::MatchAborted {
                reason: "bye".into()
            }),
            Err(GatewayError::TransportClosed {
                player: "gone".into()
            })
        );
    }
}
