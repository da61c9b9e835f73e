//! Top-layer pieces: buildings and decorations.

use crate::geometry::{Direction, Offset, Position};
use crate::tile::{Color, Tile};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

/// The twelve buildings shared by both colors; each is claimed at most once per match.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    derive_more::Display,
)]
pub enum BuildingName {
    /// One cell.
    Marche,
    /// Two cells in a line.
    Gare,
    /// Three cells in a line.
    Mairie,
    /// Three-cell corner.
    Eglise,
    /// Two by two square.
    Theatre,
    /// Four cells in a line.
    Bourse,
    /// Four-cell L.
    Musee,
    /// Four-cell T.
    Hotel,
    /// Four-cell S.
    Palais,
    /// Five-cell plus.
    Opera,
    /// Five-cell U.
    Pantheon,
    /// Five-cell V.
    Louvre,
}

/// Small top-layer ornaments with their own placement rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, derive_more::Display,
)]
pub enum DecorationName {
    /// Street lamp; stands on a lantern or the owner's color.
    Lampadaire,
    /// Newspaper kiosk; shared squares only.
    Kiosque,
    /// Bench; shared squares or the owner's color.
    Banc,
    /// Two-cell fountain; shared squares or the owner's color.
    Fontaine,
    /// Single-cell annex that must face one of the owner's buildings.
    Extension,
}

impl DecorationName {
    /// Returns true if this decoration may stand on `tile` for `owner`.
    pub fn accepts(self, tile: Tile, owner: Color) -> bool {
        let own = tile == owner.tile();
        match self {
            DecorationName::Lampadaire => tile == Tile::Lantern || own,
            DecorationName::Kiosque => tile == Tile::Shared,
            DecorationName::Banc | DecorationName::Fontaine | DecorationName::Extension => {
                tile == Tile::Shared || own
            }
        }
    }
}

/// Name of any top-layer piece.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(tag = "layer", content = "name", rename_all = "snake_case")]
pub enum PieceName {
    /// A building.
    Building(BuildingName),
    /// A decoration.
    Decoration(DecorationName),
}

impl From<BuildingName> for PieceName {
    fn from(name: BuildingName) -> Self {
        PieceName::Building(name)
    }
}

impl From<DecorationName> for PieceName {
    fn from(name: DecorationName) -> Self {
        PieceName::Decoration(name)
    }
}

/// A placed or candidate top-layer piece.
///
/// Offsets are normalized so the smallest x and y are zero; the covered
/// cells are the offsets translated by `origin`. Transforms return new
/// pieces and never mutate the shape they were derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    name: PieceName,
    origin: Position,
    facing: Direction,
    offsets: Vec<Offset>,
}

impl Piece {
    pub(crate) fn new(name: PieceName, origin: Position, facing: Direction, offsets: Vec<Offset>) -> Self {
        Self {
            name,
            origin,
            facing,
            offsets,
        }
    }

    /// The piece's name.
    pub fn name(&self) -> PieceName {
        self.name
    }

    /// Anchor of the normalized shape.
    pub fn origin(&self) -> Position {
        self.origin
    }

    /// Facing the shape was rotated to.
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Normalized shape offsets.
    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    /// Absolute cells covered by the piece.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.offsets.iter().map(|offset| self.origin.offset(*offset))
    }

    /// Returns true if the piece covers `position`.
    pub fn covers(&self, position: Position) -> bool {
        self.cells().any(|cell| cell == position)
    }

    /// Returns true for buildings.
    pub fn is_building(&self) -> bool {
        matches!(self.name, PieceName::Building(_))
    }

    /// The same shape anchored at a different origin.
    pub fn translated(&self, origin: Position) -> Self {
        Self {
            origin,
            ..self.clone()
        }
    }
}
