//! Parijs match server.
//!
//! Pairs network-connected players, asks each for moves in turn through a
//! [`Gateway`], validates them against a [`parijs_game::Game`] and relays
//! accepted moves to the opponent in its own color frame.
//!
//! # Architecture
//!
//! - [`Connection`] wraps a byte stream: a writer task drains the gateway's
//!   outbound queue and a reader task routes replies back into it.
//! - [`Gateway`] implements [`Player`], turning an ask into an awaited reply
//!   correlated by request id.
//! - [`Orchestrator`] runs the setup-phase turn loop over two players.
//! - [`MatchSupervisor`] starts one orchestrator task per pair.
//! - [`serve`] accepts TCP connections and pairs them in arrival order.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bot;
mod config;
mod error;
mod gateway;
mod orchestrator;
mod player;
mod protocol;
mod server;
mod supervisor;
mod transport;

pub use bot::{BotBrain, run_bot};
pub use config::ServerConfig;
pub use error::{ConfigError, GatewayError, MatchError};
pub use gateway::Gateway;
pub use orchestrator::{MatchOutcome, Orchestrator};
pub use player::Player;
pub use protocol::{ClientMessage, MoveRequest, Notification, ProposedMove, ServerMessage};
pub use server::{run, serve};
pub use supervisor::MatchSupervisor;
pub use transport::Connection;
