//! Oriented 2×2 tile blocks and the per-color block sequences.

use crate::geometry::{Direction, Position};
use crate::tile::{Color, Tile};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Number of tile blocks each color places during the setup phase.
pub const BLOCKS_PER_COLOR: usize = 8;

/// A 2×2 arrangement of tiles with a facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileBlock {
    top_left: Tile,
    top_right: Tile,
    bottom_left: Tile,
    bottom_right: Tile,
    facing: Direction,
}

impl TileBlock {
    /// Creates a North-facing block.
    pub const fn new(top_left: Tile, top_right: Tile, bottom_left: Tile, bottom_right: Tile) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            facing: Direction::North,
        }
    }

    /// Top-left tile.
    pub fn top_left(&self) -> Tile {
        self.top_left
    }

    /// Top-right tile.
    pub fn top_right(&self) -> Tile {
        self.top_right
    }

    /// Bottom-left tile.
    pub fn bottom_left(&self) -> Tile {
        self.bottom_left
    }

    /// Bottom-right tile.
    pub fn bottom_right(&self) -> Tile {
        self.bottom_right
    }

    /// Current facing.
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Quarter turn clockwise: corners cycle topLeft → topRight → bottomRight → bottomLeft.
    pub fn rotated_clockwise(self) -> Self {
        Self {
            top_left: self.bottom_left,
            top_right: self.top_left,
            bottom_right: self.top_right,
            bottom_left: self.bottom_right,
            facing: self.facing.clockwise(),
        }
    }

    /// Swaps Blue and Orange on every corner; facing is kept.
    pub fn inverted(self) -> Self {
        Self {
            top_left: self.top_left.inverted(),
            top_right: self.top_right.inverted(),
            bottom_left: self.bottom_left.inverted(),
            bottom_right: self.bottom_right.inverted(),
            facing: self.facing,
        }
    }

    /// Expresses this block in the frame of `viewer`.
    pub fn in_frame(self, viewer: Color) -> Self {
        match viewer {
            Color::Blue => self,
            Color::Orange => self.inverted(),
        }
    }

    /// Corner tiles in reading order: top-left, top-right, bottom-left, bottom-right.
    pub fn tiles(&self) -> [Tile; 4] {
        [self.top_left, self.top_right, self.bottom_left, self.bottom_right]
    }

    /// The four cells covered when anchored at `position`, paired with their tiles.
    pub fn cells(&self, position: Position) -> [(Position, Tile); 4] {
        let Position { x, y } = position;
        [
            (Position::new(x, y), self.top_left),
            (Position::new(x + 1, y), self.top_right),
            (Position::new(x, y + 1), self.bottom_left),
            (Position::new(x + 1, y + 1), self.bottom_right),
        ]
    }
}

/// The eight canonical blocks, in Blue's frame.
pub fn canonical_sequence() -> Vec<TileBlock> {
    use Tile::{Blue, Lantern, Orange, Shared};
    vec![
        TileBlock::new(Blue, Orange, Shared, Blue),
        TileBlock::new(Orange, Blue, Blue, Lantern),
        TileBlock::new(Blue, Blue, Orange, Shared),
        TileBlock::new(Shared, Orange, Blue, Orange),
        TileBlock::new(Blue, Lantern, Orange, Orange),
        TileBlock::new(Orange, Shared, Blue, Blue),
        TileBlock::new(Blue, Orange, Orange, Blue),
        TileBlock::new(Lantern, Blue, Shared, Orange),
    ]
}

/// The unshuffled sequence owned by `color`; Orange's is the color inversion.
pub fn sequence_for(color: Color) -> Vec<TileBlock> {
    canonical_sequence()
        .into_iter()
        .map(|block| block.in_frame(color))
        .collect()
}

/// A freshly shuffled sequence for `color`.
#[instrument(skip(rng))]
pub(crate) fn shuffled_sequence<R: Rng>(color: Color, rng: &mut R) -> VecDeque<TileBlock> {
    let mut blocks = sequence_for(color);
    blocks.shuffle(rng);
    debug!(%color, count = blocks.len(), "Shuffled tile block sequence");
    blocks.into()
}
