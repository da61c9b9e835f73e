//! A minimal automated client.
//!
//! The bot places its head block at the first anchor it has not seen
//! covered or denied, claims the first available building once its blocks
//! run out, and passes when nothing else is possible.

use crate::protocol::{ClientMessage, ServerMessage};
use anyhow::{Context, Result};
use parijs_game::{BuildingName, Move, MoveResponse, Phase, Position, TileBlock};
use std::collections::HashSet;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, instrument, warn};

/// Move selection state for the bot.
#[derive(Debug, Default)]
pub struct BotBrain {
    covered: HashSet<Position>,
    denied: HashSet<Position>,
    refused_buildings: HashSet<BuildingName>,
    last_proposal: Option<Move>,
}

impl BotBrain {
    /// Chooses a move for an ask.
    pub fn choose(&mut self, available_buildings: &[BuildingName], block: Option<&TileBlock>) -> Move {
        let mv = if block.is_some() {
            Position::block_anchors()
                .find(|anchor| !self.covered.contains(anchor) && !self.denied.contains(anchor))
                .map(|position| Move::PlaceBlockAt { position })
                .unwrap_or(Move::Pass)
        } else {
            available_buildings
                .iter()
                .find(|name| !self.refused_buildings.contains(*name))
                .map(|name| Move::PickBuilding { name: *name })
                .unwrap_or(Move::Pass)
        };
        self.last_proposal = Some(mv);
        mv
    }

    /// Learns from the verdict on the last proposal.
    pub fn observe_response(&mut self, response: &MoveResponse) {
        let Some(proposal) = self.last_proposal.take() else {
            return;
        };
        match (response, proposal) {
            (MoveResponse::Accept, Move::PlaceBlockAt { position }) => {
                self.covered.insert(position);
                self.denied.clear();
            }
            (MoveResponse::Deny { .. }, Move::PlaceBlockAt { position }) => {
                self.denied.insert(position);
            }
            (MoveResponse::Deny { .. }, Move::PickBuilding { name }) => {
                self.refused_buildings.insert(name);
            }
            _ => {}
        }
    }

    /// Learns from the opponent's move.
    pub fn observe_opponent(&mut self, mv: Move) {
        if let Move::PlaceBlockAt { position } = mv {
            self.covered.insert(position);
        }
    }
}

/// Connects to `addr` and plays until the setup phase ends or the match aborts.
#[instrument]
pub async fn run_bot(addr: &str) -> Result<()> {
    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("Failed to connect to {addr}"))?;
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    let mut brain = BotBrain::default();

    while let Some(line) = lines.next_line().await? {
        let message: ServerMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(error) => {
                warn!(%error, %line, "Ignoring undecodable line");
                continue;
            }
        };
        debug!(?message, "Received");

        match message {
            ServerMessage::MatchStarted { color, opponent } => {
                info!(%color, %opponent, "Match started");
            }
            ServerMessage::AskMove {
                request_id,
                available_buildings,
                block,
            } => {
                let mv = brain.choose(&available_buildings, block.as_ref());
                let reply = ClientMessage::Move {
                    request_id,
                    mv: mv.into(),
                };
                let mut encoded = serde_json::to_string(&reply)?;
                encoded.push('\n');
                writer.write_all(encoded.as_bytes()).await?;
                writer.flush().await?;
            }
            ServerMessage::MoveResponse { response, .. } => {
                if let MoveResponse::Deny { reason } = &response {
                    debug!(%reason, "Proposal denied");
                }
                brain.observe_response(&response);
            }
            ServerMessage::OpponentMoved { update } => brain.observe_opponent(update.mv()),
            ServerMessage::PhaseStarted { phase: Phase::Setup } => info!("Setup phase started"),
            ServerMessage::PhaseStarted {
                phase: Phase::Building { first_player },
            } => {
                info!(%first_player, "Building phase reached");
                return Ok(());
            }
            ServerMessage::Winner { color } => {
                info!(%color, "Winner declared");
                return Ok(());
            }
            ServerMessage::MatchAborted { reason } => {
                warn!(%reason, "Match aborted");
                return Ok(());
            }
        }
    }

    info!("Server closed the connection");
    Ok(())
}
