//! Wire messages exchanged with connected players.
//!
//! Every message is one JSON object on its own line, tagged by `"type"`.
//! Tiles inside outbound messages are already expressed in the receiving
//! player's frame.

use derive_getters::Getters;
use derive_new::new;
use parijs_game::{
    AppliedMove, BuildingName, Color, Move, MoveError, MoveResponse, Phase, Position, TileBlock,
};
use serde::{Deserialize, Serialize};

/// What a player is shown when asked for a move.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Buildings still in the shared pool.
    available_buildings: Vec<BuildingName>,
    /// The player's placeable block, in its own frame; `None` once drained.
    block: Option<TileBlock>,
}

/// Fire-and-forget updates pushed to a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The match was formed.
    MatchStarted {
        /// The receiver's color.
        color: Color,
        /// The opponent's display name.
        opponent: String,
    },
    /// A phase began.
    PhaseStarted {
        /// The new phase.
        phase: Phase,
    },
    /// The opponent's move was accepted.
    OpponentMoved {
        /// The move, in the receiver's frame.
        update: AppliedMove,
    },
    /// The match was won. Scoring is not modelled, so nothing sends this yet.
    Winner {
        /// Winning color.
        color: Color,
    },
    /// The match ended early.
    MatchAborted {
        /// Why the match ended.
        reason: String,
    },
}

/// Server → player messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Lobby announcement.
    MatchStarted {
        /// The receiver's color.
        color: Color,
        /// The opponent's display name.
        opponent: String,
    },
    /// A request for exactly one move reply carrying the same id.
    AskMove {
        /// Correlation id; the reply must echo it.
        request_id: u64,
        /// Buildings still in the shared pool.
        available_buildings: Vec<BuildingName>,
        /// The player's placeable block, in its own frame.
        block: Option<TileBlock>,
    },
    /// Verdict on the reply to `request_id`.
    MoveResponse {
        /// The request the verdict answers.
        request_id: u64,
        /// Accept or Deny.
        response: MoveResponse,
    },
    /// The opponent's accepted move.
    OpponentMoved {
        /// The move, in the receiver's frame.
        update: AppliedMove,
    },
    /// A phase began.
    PhaseStarted {
        /// The new phase.
        phase: Phase,
    },
    /// Winner declaration.
    Winner {
        /// Winning color.
        color: Color,
    },
    /// The match ended early.
    MatchAborted {
        /// Why the match ended.
        reason: String,
    },
}

impl ServerMessage {
    /// Builds the ask for `request`, tagged with `request_id`.
    pub fn ask(request_id: u64, request: MoveRequest) -> Self {
        let MoveRequest {
            available_buildings,
            block,
        } = request;
        ServerMessage::AskMove {
            request_id,
            available_buildings,
            block,
        }
    }
}

impl From<Notification> for ServerMessage {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::MatchStarted { color, opponent } => {
                ServerMessage::MatchStarted { color, opponent }
            }
            Notification::PhaseStarted { phase } => ServerMessage::PhaseStarted { phase },
            Notification::OpponentMoved { update } => ServerMessage::OpponentMoved { update },
            Notification::Winner { color } => ServerMessage::Winner { color },
            Notification::MatchAborted { reason } => ServerMessage::MatchAborted { reason },
        }
    }
}

/// A move as a player proposed it, before building names are checked.
///
/// Picks keep the raw name so an unrecognized building is denied like any
/// other unavailable one instead of failing the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProposedMove {
    /// Do nothing this turn.
    Pass,
    /// Claim a building by name.
    PickBuilding {
        /// Building name as sent.
        name: String,
    },
    /// Place the head block.
    PlaceBlockAt {
        /// Top-left anchor of the 2×2 block.
        position: Position,
    },
}

impl ProposedMove {
    /// Resolves building names into a typed [`Move`].
    pub fn resolve(self) -> Result<Move, MoveError> {
        match self {
            ProposedMove::Pass => Ok(Move::Pass),
            ProposedMove::PickBuilding { name } => name
                .parse::<BuildingName>()
                .map(|name| Move::PickBuilding { name })
                .map_err(|_| MoveError::UnknownBuildingName { name }),
            ProposedMove::PlaceBlockAt { position } => Ok(Move::PlaceBlockAt { position }),
        }
    }
}

impl From<Move> for ProposedMove {
    fn from(mv: Move) -> Self {
        match mv {
            Move::Pass => ProposedMove::Pass,
            Move::PickBuilding { name } => ProposedMove::PickBuilding {
                name: name.to_string(),
            },
            Move::PlaceBlockAt { position } => ProposedMove::PlaceBlockAt { position },
        }
    }
}

/// Player → server messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Reply to an [`ServerMessage::AskMove`].
    Move {
        /// Id of the request being answered.
        request_id: u64,
        /// The proposed move.
        #[serde(rename = "move")]
        mv: ProposedMove,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_move_line_shape() {
        let message = ServerMessage::ask(4, MoveRequest::new(vec![BuildingName::Gare], None));
        let json = serde_json::to_value(&message).expect("serializable");
        assert_eq!(json["type"], "ask_move");
        assert_eq!(json["request_id"], 4);
        assert_eq!(json["available_buildings"][0], "Gare");
        assert!(json["block"].is_null());
    }

    #[test]
    fn test_client_move_parses() {
        let line = r#"{"type":"move","request_id":9,"move":{"kind":"place_block_at","position":{"x":2,"y":4}}}"#;
        let parsed: ClientMessage = serde_json::from_str(line).expect("valid line");
        assert_eq!(
            parsed,
            ClientMessage::Move {
                request_id: 9,
                mv: ProposedMove::PlaceBlockAt {
                    position: Position::new(2, 4)
                },
            }
        );
    }

    #[test]
    fn test_unrecognized_building_parses_and_resolves_to_deny() {
        let line = r#"{"type":"move","request_id":1,"move":{"kind":"pick_building","name":"Eiffel"}}"#;
        let ClientMessage::Move { mv, .. } = serde_json::from_str(line).expect("valid line");
        assert_eq!(
            mv.resolve(),
            Err(MoveError::UnknownBuildingName {
                name: "Eiffel".to_string()
            })
        );
    }

    #[test]
    fn test_known_building_resolves() {
        let proposed = ProposedMove::from(Move::PickBuilding {
            name: BuildingName::Opera,
        });
        assert_eq!(
            proposed,
            ProposedMove::PickBuilding {
                name: "Opera".to_string()
            }
        );
        assert_eq!(
            proposed.resolve(),
            Ok(Move::PickBuilding {
                name: BuildingName::Opera
            })
        );
    }

    #[test]
    fn test_notification_maps_to_message() {
        let message: ServerMessage = Notification::MatchAborted {
            reason: "gone".to_string(),
        }
        .into();
        assert_eq!(
            message,
            ServerMessage::MatchAborted {
                reason: "gone".to_string()
            }
        );
    }
}
