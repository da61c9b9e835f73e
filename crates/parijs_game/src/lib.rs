//! Parijs game logic.
//!
//! Pure, synchronous model of the Parijs tile-placement game: the tile layer,
//! the top layer of buildings and decorations, the cards, and the
//! setup-phase state machine that arbitrates moves between the two colors.
//!
//! # Architecture
//!
//! - **Tiles**: [`Tile`] values and the Blue/Orange [`Color`] symmetry
//! - **Blocks**: 2×2 [`TileBlock`]s and each color's shuffled sequence
//! - **Pieces**: [`Piece`] shapes produced by the [`catalog`]
//! - **Board**: the 8×8 [`Board`] with fit checks and placement
//! - **Game**: the [`Game`] phase machine with swappable [`MoveValidator`]s
//!
//! # Example
//!
//! ```
//! use parijs_game::{Board, Color, Game, Move, Phase, Position};
//!
//! let mut game = Game::from_board(Board::canonical(), Color::Blue);
//! let applied = game
//!     .submit(Color::Blue, Move::PlaceBlockAt { position: Position::new(0, 0) })
//!     .expect("empty board accepts the first block");
//!
//! assert!(applied.placed().is_some());
//! assert_eq!(game.to_move(), Color::Orange);
//! assert_eq!(game.phase(), Phase::Setup);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod block;
mod board;
mod card;
pub mod catalog;
mod game;
mod geometry;
mod piece;
mod rules;
mod tile;

// Crate-level exports - Tile layer
pub use tile::{ByColor, Color, Tile};

// Crate-level exports - Geometry
pub use geometry::{BOARD_SIZE, Direction, Offset, Position};

// Crate-level exports - Tile blocks
pub use block::{BLOCKS_PER_COLOR, TileBlock, canonical_sequence, sequence_for};

// Crate-level exports - Pieces and cards
pub use card::{CARDS_PER_MATCH, Card, CardState, CardType};
pub use piece::{BuildingName, DecorationName, Piece, PieceName};

// Crate-level exports - Board
pub use board::{Board, PlacementError};

// Crate-level exports - Moves and validation
pub use action::{AppliedMove, Move, MoveError, MoveResponse};
pub use rules::{BlockAligned, BlockFits, BuildingAvailable, MoveValidator, SetupRules};

// Crate-level exports - Game state machine
pub use game::{Game, Phase};
