//! The two-phase game state machine.
//!
//! The setup phase alternates the two colors, each placing the head of its
//! block sequence or claiming buildings, until both sequences are empty.
//! The building phase is a terminal state here; its scoring is not modelled.

use crate::action::{AppliedMove, Move, MoveError};
use crate::block::TileBlock;
use crate::board::Board;
use crate::piece::BuildingName;
use crate::rules::{MoveValidator, SetupRules};
use crate::tile::Color;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Phase of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Tile blocks are being placed and buildings claimed.
    Setup,
    /// Both block sequences are exhausted.
    Building {
        /// Color that opens the building phase: the opponent of the last block placer.
        first_player: Color,
    },
}

/// Authoritative state of one match.
#[derive(Debug)]
pub struct Game {
    board: Board,
    phase: Phase,
    to_move: Color,
    last_block_placer: Option<Color>,
    rules: Box<dyn MoveValidator>,
}

impl Game {
    /// Starts a match: shuffled sequences, random cards and a random first player.
    #[instrument(skip(rng))]
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let board = Board::new_match(rng);
        let first_player = if rng.random_bool(0.5) {
            Color::Blue
        } else {
            Color::Orange
        };
        Self::from_board(board, first_player)
    }

    /// Starts a match on a prepared board with `first_player` to move.
    #[instrument(skip(board))]
    pub fn from_board(board: Board, first_player: Color) -> Self {
        info!(%first_player, "Setup phase begins");
        let mut game = Self {
            board,
            phase: Phase::Setup,
            to_move: first_player,
            last_block_placer: None,
            rules: Box::new(SetupRules),
        };
        game.advance_phase();
        game
    }

    /// Replaces the validation predicate.
    pub fn with_rules(mut self, rules: impl MoveValidator + 'static) -> Self {
        self.rules = Box::new(rules);
        self
    }

    /// The authoritative board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Color whose turn it is.
    pub fn to_move(&self) -> Color {
        self.to_move
    }

    /// Color that most recently placed a tile block.
    pub fn last_block_placer(&self) -> Option<Color> {
        self.last_block_placer
    }

    /// Head of `color`'s sequence, in absolute colors.
    pub fn head_block(&self, color: Color) -> Option<TileBlock> {
        self.board.head_block(color).copied()
    }

    /// Buildings still in the shared pool.
    pub fn unpicked_buildings(&self) -> &[BuildingName] {
        self.board.unpicked_buildings()
    }

    /// Checks phase, turn order and the rule set without changing anything.
    #[instrument(skip(self))]
    pub fn validate(&self, color: Color, mv: &Move) -> Result<(), MoveError> {
        if self.phase != Phase::Setup {
            return Err(MoveError::PhaseOver);
        }
        if color != self.to_move {
            return Err(MoveError::WrongTurn {
                expected: self.to_move,
                actual: color,
            });
        }
        self.rules.validate(&self.board, color, mv)
    }

    /// Evaluates `mv` on a copy of the board and returns the copy.
    ///
    /// The authoritative board is left untouched.
    #[instrument(skip(self))]
    pub fn preview(&self, color: Color, mv: &Move) -> Result<Board, MoveError> {
        self.validate(color, mv)?;
        let mut scratch = self.board.clone();
        Self::apply(&mut scratch, color, mv)?;
        Ok(scratch)
    }

    /// Validates and applies `mv`, then passes the turn.
    ///
    /// A rejected move leaves the board and the turn unchanged.
    #[instrument(skip(self))]
    pub fn submit(&mut self, color: Color, mv: Move) -> Result<AppliedMove, MoveError> {
        self.validate(color, &mv)?;
        let placed = Self::apply(&mut self.board, color, &mv)?;
        if placed.is_some() {
            self.last_block_placer = Some(color);
        }
        self.to_move = color.opponent();
        debug!(
            %color,
            %mv,
            blue_blocks = self.board.blocks(Color::Blue).len(),
            orange_blocks = self.board.blocks(Color::Orange).len(),
            "Move applied"
        );
        self.advance_phase();
        Ok(AppliedMove::new(color, mv, placed))
    }

    fn apply(board: &mut Board, color: Color, mv: &Move) -> Result<Option<TileBlock>, MoveError> {
        match *mv {
            Move::Pass => Ok(None),
            Move::PickBuilding { name } => {
                if board.claim_building(color, name) {
                    Ok(None)
                } else {
                    Err(MoveError::UnknownBuildingName {
                        name: name.to_string(),
                    })
                }
            }
            Move::PlaceBlockAt { position } => {
                let block = *board.head_block(color).ok_or(MoveError::NoBlockRemaining)?;
                board.place_tile_block(position, &block)?;
                board.pop_head_block(color);
                Ok(Some(block))
            }
        }
    }

    fn advance_phase(&mut self) {
        if self.phase != Phase::Setup {
            return;
        }
        let drained = self.board.blocks(Color::Blue).is_empty()
            && self.board.blocks(Color::Orange).is_empty();
        if drained {
            let first_player = self
                .last_block_placer
                .map(Color::opponent)
                .unwrap_or(self.to_move);
            info!(%first_player, "Building phase begins");
            self.phase = Phase::Building { first_player };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;

    #[test]
    fn test_deny_keeps_turn() {
        let mut game = Game::from_board(Board::canonical(), Color::Blue);
        let bad = Move::PlaceBlockAt {
            position: Position::new(1, 1),
        };
        assert!(game.submit(Color::Blue, bad).is_err());
        assert_eq!(game.to_move(), Color::Blue);
        assert_eq!(game.board().bricks_remaining(), 64);
    }

    #[test]
    fn test_wrong_turn_rejected() {
        let mut game = Game::from_board(Board::canonical(), Color::Blue);
        assert_eq!(
            game.submit(Color::Orange, Move::Pass),
            Err(MoveError::WrongTurn {
                expected: Color::Blue,
                actual: Color::Orange
            })
        );
    }

    #[test]
    fn test_preview_leaves_board_untouched() {
        let game = Game::from_board(Board::canonical(), Color::Blue);
        let mv = Move::PlaceBlockAt {
            position: Position::new(2, 2),
        };
        let preview = game.preview(Color::Blue, &mv).expect("fits");
        assert_eq!(preview.bricks_remaining(), 60);
        assert_eq!(preview.blocks(Color::Blue).len(), 7);
        assert_eq!(game.board().bricks_remaining(), 64);
        assert_eq!(game.board().blocks(Color::Blue).len(), 8);
    }
}
