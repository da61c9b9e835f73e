//! The seam between the turn loop and whoever supplies moves.

use crate::error::GatewayError;
use crate::protocol::{MoveRequest, Notification, ProposedMove};
use parijs_game::MoveResponse;

/// A participant the orchestrator can ask for moves.
///
/// `ask_move` suspends until exactly one reply arrives; `respond` and
/// `notify` never wait on the remote.
#[async_trait::async_trait]
pub trait Player: Send + Sync {
    /// Display name used in logs and lobby announcements.
    fn name(&self) -> &str;

    /// Asks for one move and waits for the matching reply.
    async fn ask_move(&self, request: MoveRequest) -> Result<ProposedMove, GatewayError>;

    /// Sends the verdict on the most recent reply.
    fn respond(&self, response: MoveResponse) -> Result<(), GatewayError>;

    /// Pushes an update.
    fn notify(&self, notification: Notification) -> Result<(), GatewayError>;
}
