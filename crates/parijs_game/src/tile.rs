//! Tile layer values and the Blue/Orange color symmetry.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use strum::EnumIter;

/// One of the two players.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, derive_more::Display,
)]
pub enum Color {
    /// The canonical color; every player reasons in Blue-relative terms.
    Blue,
    /// The inverted color.
    Orange,
}

impl Color {
    /// Returns the opposing color.
    pub fn opponent(self) -> Self {
        match self {
            Color::Blue => Color::Orange,
            Color::Orange => Color::Blue,
        }
    }

    /// Returns the tile painted in this color.
    pub fn tile(self) -> Tile {
        match self {
            Color::Blue => Tile::Blue,
            Color::Orange => Tile::Orange,
        }
    }
}

/// Value of a single 1×1 cell of the tile layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, derive_more::Display,
)]
pub enum Tile {
    /// Owned by Blue.
    Blue,
    /// Owned by Orange.
    Orange,
    /// Usable by both colors.
    Shared,
    /// A street lantern square.
    Lantern,
    /// Unoccupied cobblestones; no tile block covers this cell yet.
    Bricks,
}

impl Tile {
    /// Swaps Blue and Orange; every other tile is a fixed point.
    pub fn inverted(self) -> Self {
        match self {
            Tile::Blue => Tile::Orange,
            Tile::Orange => Tile::Blue,
            other => other,
        }
    }

    /// Expresses this tile in the frame of `viewer`.
    pub fn in_frame(self, viewer: Color) -> Self {
        match viewer {
            Color::Blue => self,
            Color::Orange => self.inverted(),
        }
    }

    /// Returns true if no tile block covers this cell.
    pub fn is_bricks(self) -> bool {
        matches!(self, Tile::Bricks)
    }

    /// Single-character symbol used by the board renderer.
    pub fn symbol(self) -> char {
        match self {
            Tile::Blue => 'B',
            Tile::Orange => 'O',
            Tile::Shared => 'S',
            Tile::Lantern => 'L',
            Tile::Bricks => '.',
        }
    }
}

/// A pair of values, one per color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByColor<T> {
    /// Blue's value.
    pub blue: T,
    /// Orange's value.
    pub orange: T,
}

impl<T> ByColor<T> {
    /// Creates a pair from both colors' values.
    pub fn new(blue: T, orange: T) -> Self {
        Self { blue, orange }
    }

    /// Builds a pair by calling `f` for each color.
    pub fn from_fn(mut f: impl FnMut(Color) -> T) -> Self {
        Self {
            blue: f(Color::Blue),
            orange: f(Color::Orange),
        }
    }
}

impl<T> Index<Color> for ByColor<T> {
    type Output = T;

    fn index(&self, color: Color) -> &T {
        match color {
            Color::Blue => &self.blue,
            Color::Orange => &self.orange,
        }
    }
}

impl<T> IndexMut<Color> for ByColor<T> {
    fn index_mut(&mut self, color: Color) -> &mut T {
        match color {
            Color::Blue => &mut self.blue,
            Color::Orange => &mut self.orange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_tile_inversion_is_involution() {
        for tile in Tile::iter() {
            assert_eq!(tile.inverted().inverted(), tile);
        }
    }

    #[test]
    fn test_only_player_colors_invert() {
        assert_eq!(Tile::Blue.inverted(), Tile::Orange);
        assert_eq!(Tile::Orange.inverted(), Tile::Blue);
        assert_eq!(Tile::Shared.inverted(), Tile::Shared);
        assert_eq!(Tile::Lantern.inverted(), Tile::Lantern);
        assert_eq!(Tile::Bricks.inverted(), Tile::Bricks);
    }

    #[test]
    fn test_by_color_indexing() {
        let mut pair = ByColor::new(1, 2);
        pair[Color::Orange] += 10;
        assert_eq!(pair[Color::Blue], 1);
        assert_eq!(pair[Color::Orange], 12);
        assert_eq!(Color::Blue.opponent(), Color::Orange);
    }
}
