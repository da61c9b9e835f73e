//! Grid coordinates, offsets and facing directions.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Width and height of the board in cells.
pub const BOARD_SIZE: i32 = 8;

/// Facing of a block or piece. Turning is cyclic: North, East, South, West.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    derive_more::Display,
)]
pub enum Direction {
    /// Canonical facing.
    #[default]
    North,
    /// One clockwise turn from North.
    East,
    /// Two turns from North.
    South,
    /// One counter-clockwise turn from North.
    West,
}

impl Direction {
    /// The next direction clockwise.
    pub fn clockwise(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// The next direction counter-clockwise.
    pub fn counter_clockwise(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// Unit step towards the faced neighbour (y grows downward).
    pub fn step(self) -> Offset {
        match self {
            Direction::North => Offset::new(0, -1),
            Direction::East => Offset::new(1, 0),
            Direction::South => Offset::new(0, 1),
            Direction::West => Offset::new(-1, 0),
        }
    }
}

/// Relative cell offset inside a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Offset {
    /// Horizontal component.
    pub dx: i32,
    /// Vertical component, positive downward.
    pub dy: i32,
}

impl Offset {
    /// Creates an offset.
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Quarter turn clockwise about the origin.
    pub fn rotated_clockwise(self) -> Self {
        Self::new(-self.dy, self.dx)
    }

    /// Quarter turn counter-clockwise about the origin.
    pub fn rotated_counter_clockwise(self) -> Self {
        Self::new(self.dy, -self.dx)
    }

    /// Shifts a shape so its minimum x and minimum y are both zero.
    pub fn normalize(offsets: &[Offset]) -> Vec<Offset> {
        let min_x = offsets.iter().map(|o| o.dx).min().unwrap_or(0);
        let min_y = offsets.iter().map(|o| o.dy).min().unwrap_or(0);
        offsets
            .iter()
            .map(|o| Offset::new(o.dx - min_x, o.dy - min_y))
            .collect()
    }
}

/// Absolute cell coordinate; (0, 0) is the top-left corner of the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Creates a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position moved by `offset`.
    pub fn offset(self, offset: Offset) -> Self {
        Self::new(self.x + offset.dx, self.y + offset.dy)
    }

    /// Returns true if the cell lies on the 8×8 board.
    pub fn is_on_board(self) -> bool {
        (0..BOARD_SIZE).contains(&self.x) && (0..BOARD_SIZE).contains(&self.y)
    }

    /// Returns true if a 2×2 block may be anchored here.
    pub fn is_block_aligned(self) -> bool {
        self.x % 2 == 0 && self.y % 2 == 0
    }

    /// Every even-aligned block anchor on the board, row by row.
    pub fn block_anchors() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE)
            .step_by(2)
            .flat_map(|y| (0..BOARD_SIZE).step_by(2).map(move |x| Position::new(x, y)))
    }
}
