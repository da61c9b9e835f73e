//! Error types for gateways, matches and configuration.

use derive_more::{Display, Error};
use parijs_game::Color;
use tracing::instrument;

/// Failure of a player gateway. Every variant is fatal to the match.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GatewayError {
    /// The remote end disconnected or its writer stopped.
    #[display("Connection to {player} closed")]
    TransportClosed {
        /// Gateway name.
        player: String,
    },
    /// A reply could not be matched to the outstanding request.
    #[display("Protocol desync with {player}: {detail}")]
    ProtocolDesync {
        /// Gateway name.
        player: String,
        /// What went wrong.
        detail: String,
    },
    /// The remote did not answer in time.
    #[display("{player} did not answer request {request_id} within {seconds}s")]
    Timeout {
        /// Gateway name.
        player: String,
        /// The unanswered request.
        request_id: u64,
        /// Configured limit.
        seconds: u64,
    },
}

impl GatewayError {
    /// Returns true if the remote went away.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, GatewayError::TransportClosed { .. })
    }
}

/// Failure that ends a match early.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{color} player failed: {source}")]
pub struct MatchError {
    /// Color whose gateway failed.
    pub color: Color,
    /// Underlying gateway failure.
    pub source: GatewayError,
}

impl MatchError {
    /// Wraps a gateway failure of `color`.
    pub fn new(color: Color, source: GatewayError) -> Self {
        Self { color, source }
    }
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
