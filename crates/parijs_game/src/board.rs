//! The 8×8 board: tile layer, top layer, cards and per-color supplies.

use crate::block::{TileBlock, sequence_for, shuffled_sequence};
use crate::card::{CARDS_PER_MATCH, Card, CardState, CardType, draw_cards};
use crate::geometry::{BOARD_SIZE, Position};
use crate::piece::{BuildingName, DecorationName, Piece, PieceName};
use crate::tile::{ByColor, Color, Tile};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use strum::IntoEnumIterator;
use tracing::{debug, instrument, warn};

const CELLS: usize = BOARD_SIZE as usize;

/// Geometry violation when placing a block or piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlacementError {
    /// A target cell lies outside the board.
    #[display("Cell {position} is out of bounds")]
    OutOfBounds {
        /// The offending cell.
        position: Position,
    },
    /// A tile block anchor is not on even coordinates.
    #[display("Position {position} is out of bounds for a tile block: anchors must have even x and y")]
    Misaligned {
        /// The requested anchor.
        position: Position,
    },
    /// A target cell is already covered by a tile.
    #[display("Cell {position} is already covered")]
    Occupied {
        /// The offending cell.
        position: Position,
    },
    /// A top piece does not satisfy its placement rules.
    #[display("{name} cannot be placed at {position}")]
    InvalidTarget {
        /// The rejected piece.
        name: PieceName,
        /// The piece's origin.
        position: Position,
    },
}

/// Authoritative match state.
///
/// Cloning a board is deep: the clone shares no mutable state with the
/// original, so what-if evaluation can run on a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Tile layer, indexed `[y][x]`.
    tiles: [[Tile; CELLS]; CELLS],
    cards: Vec<Card>,
    blocks: ByColor<VecDeque<TileBlock>>,
    top_pieces: ByColor<Vec<Piece>>,
    inventories: ByColor<Vec<BuildingName>>,
    unpicked: Vec<BuildingName>,
}

impl Board {
    /// Creates an all-Bricks board with the given block sequences and cards.
    ///
    /// The building pool starts with all twelve names.
    pub fn new(blocks: ByColor<Vec<TileBlock>>, cards: Vec<Card>) -> Self {
        Self {
            tiles: [[Tile::Bricks; CELLS]; CELLS],
            cards,
            blocks: ByColor::new(blocks.blue.into(), blocks.orange.into()),
            top_pieces: ByColor::default(),
            inventories: ByColor::default(),
            unpicked: BuildingName::iter().collect(),
        }
    }

    /// Board with unshuffled sequences and the first eight card types.
    pub fn canonical() -> Self {
        let cards = CardType::iter().take(CARDS_PER_MATCH).map(Card::new).collect();
        Self::new(ByColor::from_fn(sequence_for), cards)
    }

    /// Board for a new match: independently shuffled sequences and a random card draw.
    #[instrument(skip(rng))]
    pub fn new_match<R: Rng>(rng: &mut R) -> Self {
        let blue = shuffled_sequence(Color::Blue, rng);
        let orange = shuffled_sequence(Color::Orange, rng);
        let cards = draw_cards(rng);
        Self::new(ByColor::new(blue.into(), orange.into()), cards)
    }

    // ─────────────────────────────────────────────────────────────
    //  Tile layer
    // ─────────────────────────────────────────────────────────────

    /// Returns true if (x, y) lies on the board.
    pub fn is_on_board(x: i32, y: i32) -> bool {
        Position::new(x, y).is_on_board()
    }

    /// Tile at (x, y), or `None` off the board.
    pub fn get_tile(&self, x: i32, y: i32) -> Option<Tile> {
        self.tile(Position::new(x, y))
    }

    /// Tile at `position`, or `None` off the board.
    pub fn tile(&self, position: Position) -> Option<Tile> {
        position
            .is_on_board()
            .then(|| self.tiles[position.y as usize][position.x as usize])
    }

    /// Checks that every cell under `block` anchored at `position` is on the board and Bricks.
    pub fn check_tile_block_fit(&self, block: &TileBlock, position: Position) -> Result<(), PlacementError> {
        for (cell, _) in block.cells(position) {
            match self.tile(cell) {
                None => return Err(PlacementError::OutOfBounds { position: cell }),
                Some(tile) if !tile.is_bricks() => {
                    return Err(PlacementError::Occupied { position: cell });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Returns true if `block` anchored at `position` covers only on-board Bricks cells.
    pub fn does_tile_block_fit(&self, block: &TileBlock, position: Position) -> bool {
        self.check_tile_block_fit(block, position).is_ok()
    }

    /// Writes `block` onto the four cells anchored at `position`.
    ///
    /// Only the anchor geometry is checked; callers confirm fit first.
    #[instrument(skip(self))]
    pub fn place_tile_block(&mut self, position: Position, block: &TileBlock) -> Result<(), PlacementError> {
        let far_corner = Position::new(position.x + 1, position.y + 1);
        if !position.is_on_board() || !far_corner.is_on_board() {
            warn!(%position, "Tile block anchor off the board");
            return Err(PlacementError::OutOfBounds { position });
        }
        if !position.is_block_aligned() {
            warn!(%position, "Tile block anchor misaligned");
            return Err(PlacementError::Misaligned { position });
        }
        for (cell, tile) in block.cells(position) {
            self.tiles[cell.y as usize][cell.x as usize] = tile;
        }
        debug!(%position, "Tile block written");
        Ok(())
    }

    /// Counts cells that still show Bricks.
    pub fn bricks_remaining(&self) -> usize {
        self.tiles.iter().flatten().filter(|t| t.is_bricks()).count()
    }

    // ─────────────────────────────────────────────────────────────
    //  Top layer
    // ─────────────────────────────────────────────────────────────

    /// The top piece covering `position` and its owner, if any.
    pub fn top_piece_at(&self, position: Position) -> Option<(Color, &Piece)> {
        [Color::Blue, Color::Orange].into_iter().find_map(|color| {
            self.top_pieces[color]
                .iter()
                .find(|piece| piece.covers(position))
                .map(|piece| (color, piece))
        })
    }

    /// Top pieces placed by `color`.
    pub fn top_pieces(&self, color: Color) -> &[Piece] {
        &self.top_pieces[color]
    }

    /// Returns true if `owner` may place `piece` here.
    ///
    /// No covered cell may host another top piece. Buildings need the owner's
    /// color or Shared under every cell; decorations follow their own tile
    /// table, and an Extension must face a building of the same owner.
    pub fn does_top_piece_fit(&self, piece: &Piece, owner: Color) -> bool {
        let accepts = |tile: Tile| match piece.name() {
            PieceName::Building(_) => tile == owner.tile() || tile == Tile::Shared,
            PieceName::Decoration(decoration) => decoration.accepts(tile, owner),
        };

        let cells_ok = piece.cells().all(|cell| {
            self.tile(cell).is_some_and(|tile| accepts(tile)) && self.top_piece_at(cell).is_none()
        });
        if !cells_ok {
            return false;
        }

        match piece.name() {
            PieceName::Decoration(DecorationName::Extension) => {
                let faced = piece.origin().offset(piece.facing().step());
                matches!(
                    self.top_piece_at(faced),
                    Some((color, neighbour)) if color == owner && neighbour.is_building()
                )
            }
            _ => true,
        }
    }

    /// Places `piece` for `owner` after checking [`Board::does_top_piece_fit`].
    #[instrument(skip(self, piece), fields(name = %piece.name(), origin = %piece.origin()))]
    pub fn place_top_piece(&mut self, piece: Piece, owner: Color) -> Result<(), PlacementError> {
        if !self.does_top_piece_fit(&piece, owner) {
            warn!(%owner, "Top piece rejected");
            return Err(PlacementError::InvalidTarget {
                name: piece.name(),
                position: piece.origin(),
            });
        }
        self.top_pieces[owner].push(piece);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Cards
    // ─────────────────────────────────────────────────────────────

    /// Cards in play this match.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Overwrites owner and state of the card of `card_type`; no-op if it is not in play.
    #[instrument(skip(self))]
    pub fn update_card(&mut self, card_type: CardType, owner: Option<Color>, state: CardState) {
        match self.cards.iter_mut().find(|c| *c.card_type() == card_type) {
            Some(card) => card.update(owner, state),
            None => debug!("Card not in play; ignoring update"),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Block sequences and buildings
    // ─────────────────────────────────────────────────────────────

    /// The only block `color` may place next.
    pub fn head_block(&self, color: Color) -> Option<&TileBlock> {
        self.blocks[color].front()
    }

    /// Blocks `color` has yet to place, head first.
    pub fn blocks(&self, color: Color) -> &VecDeque<TileBlock> {
        &self.blocks[color]
    }

    pub(crate) fn pop_head_block(&mut self, color: Color) -> Option<TileBlock> {
        self.blocks[color].pop_front()
    }

    /// Buildings nobody has claimed yet.
    pub fn unpicked_buildings(&self) -> &[BuildingName] {
        &self.unpicked
    }

    /// Buildings claimed by `color`, in claim order.
    pub fn inventory(&self, color: Color) -> &[BuildingName] {
        &self.inventories[color]
    }

    /// Moves `name` from the shared pool to `color`'s inventory. Returns false if it is not in the pool.
    pub(crate) fn claim_building(&mut self, color: Color, name: BuildingName) -> bool {
        match self.unpicked.iter().position(|n| *n == name) {
            Some(index) => {
                self.unpicked.remove(index);
                self.inventories[color].push(name);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.tiles.iter().enumerate() {
            let line: String = row.iter().map(|t| t.symbol()).collect();
            if y + 1 < CELLS {
                writeln!(f, "{line}")?;
            } else {
                write!(f, "{line}")?;
            }
        }
        Ok(())
    }
}
