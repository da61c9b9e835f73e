//! Move validation.
//!
//! Validation is a standalone predicate over the board so stricter rule
//! sets (top pieces, card effects) can replace [`SetupRules`] without
//! touching the turn loop.

use crate::action::{Move, MoveError};
use crate::board::{Board, PlacementError};
use crate::geometry::Position;
use crate::piece::BuildingName;
use crate::tile::Color;
use tracing::{instrument, warn};

/// Decides whether a move by `color` is legal on `board`.
pub trait MoveValidator: std::fmt::Debug + Send + Sync {
    /// Returns `Ok(())` if the move may be applied.
    fn validate(&self, board: &Board, color: Color, mv: &Move) -> Result<(), MoveError>;
}

/// Precondition: a tile block anchor is on the board and on even coordinates.
pub struct BlockAligned;

impl BlockAligned {
    /// Checks the anchor geometry.
    #[instrument]
    pub fn check(position: Position) -> Result<(), PlacementError> {
        if !position.is_on_board() {
            return Err(PlacementError::OutOfBounds { position });
        }
        if !position.is_block_aligned() {
            return Err(PlacementError::Misaligned { position });
        }
        Ok(())
    }
}

/// Precondition: the acting color's head block covers only Bricks.
pub struct BlockFits;

impl BlockFits {
    /// Checks the head block of `color` against the tile layer.
    #[instrument(skip(board))]
    pub fn check(board: &Board, color: Color, position: Position) -> Result<(), MoveError> {
        let block = board.head_block(color).ok_or(MoveError::NoBlockRemaining)?;
        board.check_tile_block_fit(block, position)?;
        Ok(())
    }
}

/// Precondition: the building is still in the shared pool.
pub struct BuildingAvailable;

impl BuildingAvailable {
    /// Checks the unpicked pool.
    #[instrument(skip(board))]
    pub fn check(board: &Board, name: BuildingName) -> Result<(), MoveError> {
        if board.unpicked_buildings().contains(&name) {
            Ok(())
        } else {
            Err(MoveError::UnknownBuildingName {
                name: name.to_string(),
            })
        }
    }
}

/// Setup-phase rules: passing is always legal, picks need an unclaimed
/// building, and blocks must be aligned and cover only Bricks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetupRules;

impl MoveValidator for SetupRules {
    #[instrument(skip(self, board))]
    fn validate(&self, board: &Board, color: Color, mv: &Move) -> Result<(), MoveError> {
        let verdict = match *mv {
            Move::Pass => Ok(()),
            Move::PickBuilding { name } => BuildingAvailable::check(board, name),
            Move::PlaceBlockAt { position } => BlockAligned::check(position)
                .map_err(MoveError::from)
                .and_then(|()| BlockFits::check(board, color, position)),
        };
        if let Err(error) = &verdict {
            warn!(%color, %mv, %error, "Move failed validation");
        }
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_is_always_valid() {
        let board = Board::canonical();
        assert!(SetupRules.validate(&board, Color::Orange, &Move::Pass).is_ok());
    }

    #[test]
    fn test_odd_anchor_is_misaligned() {
        let board = Board::canonical();
        let mv = Move::PlaceBlockAt {
            position: Position::new(1, 1),
        };
        assert_eq!(
            SetupRules.validate(&board, Color::Blue, &mv),
            Err(MoveError::Placement {
                source: PlacementError::Misaligned {
                    position: Position::new(1, 1)
                }
            })
        );
    }

    #[test]
    fn test_anchor_off_board() {
        let board = Board::canonical();
        let mv = Move::PlaceBlockAt {
            position: Position::new(8, 0),
        };
        assert!(matches!(
            SetupRules.validate(&board, Color::Blue, &mv),
            Err(MoveError::Placement {
                source: PlacementError::OutOfBounds { .. }
            })
        ));
    }
}
