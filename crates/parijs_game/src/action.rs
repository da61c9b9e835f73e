//! First-class move and verdict types.
//!
//! Moves carry positions and names only, so they read the same in either
//! color frame. Applied updates also carry the placed block, whose tiles
//! are inverted for Orange; positions are never transformed.

use crate::block::TileBlock;
use crate::board::PlacementError;
use crate::geometry::Position;
use crate::piece::BuildingName;
use crate::tile::Color;
use serde::{Deserialize, Serialize};

/// A player's intended action during the setup phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Move {
    /// Do nothing this turn.
    Pass,
    /// Claim a building from the shared pool.
    PickBuilding {
        /// Building to claim.
        name: BuildingName,
    },
    /// Place the head of the acting color's block sequence.
    PlaceBlockAt {
        /// Top-left anchor of the 2×2 block.
        position: Position,
    },
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Pass => write!(f, "pass"),
            Move::PickBuilding { name } => write!(f, "pick {name}"),
            Move::PlaceBlockAt { position } => write!(f, "place block at {position}"),
        }
    }
}

/// The arbiter's verdict on a proposed move.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum MoveResponse {
    /// The move was applied.
    Accept,
    /// The move was rejected; the same player is asked again.
    Deny {
        /// Human-readable reason, shown only to the acting player.
        reason: String,
    },
}

impl MoveResponse {
    /// Builds a denial from any displayable reason.
    pub fn deny(reason: impl std::fmt::Display) -> Self {
        MoveResponse::Deny {
            reason: reason.to_string(),
        }
    }

    /// Returns true for [`MoveResponse::Accept`].
    pub fn is_accept(&self) -> bool {
        matches!(self, MoveResponse::Accept)
    }
}

/// A validated move as it was applied to the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMove {
    color: Color,
    #[serde(rename = "move")]
    mv: Move,
    placed: Option<TileBlock>,
}

impl AppliedMove {
    pub(crate) fn new(color: Color, mv: Move, placed: Option<TileBlock>) -> Self {
        Self { color, mv, placed }
    }

    /// The color that moved.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The move itself.
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// The block written by a `PlaceBlockAt`.
    pub fn placed(&self) -> Option<TileBlock> {
        self.placed
    }

    /// Re-expresses the update in `viewer`'s frame.
    pub fn in_frame(&self, viewer: Color) -> Self {
        Self {
            color: self.color,
            mv: self.mv,
            placed: self.placed.map(|block| block.in_frame(viewer)),
        }
    }
}

/// Why a move cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// Block geometry is violated.
    #[display("{source}")]
    Placement {
        /// Underlying placement failure.
        source: PlacementError,
    },
    /// The acting color has no block left.
    #[display("No tile block left to place")]
    NoBlockRemaining,
    /// The name is not a building, or the building is no longer in the
    /// unpicked pool.
    #[display("Building {name} is not available")]
    UnknownBuildingName {
        /// The requested name as the player sent it.
        name: String,
    },
    /// A color moved out of turn.
    #[display("It is {expected}'s turn, not {actual}'s")]
    WrongTurn {
        /// Color whose turn it is.
        expected: Color,
        /// Color that tried to move.
        actual: Color,
    },
    /// The setup phase has ended.
    #[display("The setup phase is over")]
    PhaseOver,
}

impl From<PlacementError> for MoveError {
    fn from(source: PlacementError) -> Self {
        MoveError::Placement { source }
    }
}
