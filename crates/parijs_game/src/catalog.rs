//! Canonical shapes for every top-layer piece.
//!
//! Shapes are defined once, facing North, and turned into placed pieces by
//! [`piece`]: rotate the fewest quarter turns to reach the requested facing,
//! re-normalize, then anchor at the origin. Produced offsets are therefore
//! never negative relative to the origin.

use crate::geometry::{Direction, Offset, Position};
use crate::piece::{BuildingName, DecorationName, Piece, PieceName};
use tracing::instrument;

const MARCHE: &[Offset] = &[Offset::new(0, 0)];
const GARE: &[Offset] = &[Offset::new(0, 0), Offset::new(1, 0)];
const MAIRIE: &[Offset] = &[Offset::new(0, 0), Offset::new(1, 0), Offset::new(2, 0)];
const EGLISE: &[Offset] = &[Offset::new(0, 0), Offset::new(0, 1), Offset::new(1, 1)];
const THEATRE: &[Offset] = &[
    Offset::new(0, 0),
    Offset::new(1, 0),
    Offset::new(0, 1),
    Offset::new(1, 1),
];
const BOURSE: &[Offset] = &[
    Offset::new(0, 0),
    Offset::new(1, 0),
    Offset::new(2, 0),
    Offset::new(3, 0),
];
const MUSEE: &[Offset] = &[
    Offset::new(0, 0),
    Offset::new(0, 1),
    Offset::new(0, 2),
    Offset::new(1, 2),
];
const HOTEL: &[Offset] = &[
    Offset::new(0, 0),
    Offset::new(1, 0),
    Offset::new(2, 0),
    Offset::new(1, 1),
];
const PALAIS: &[Offset] = &[
    Offset::new(1, 0),
    Offset::new(2, 0),
    Offset::new(0, 1),
    Offset::new(1, 1),
];
const OPERA: &[Offset] = &[
    Offset::new(1, 0),
    Offset::new(0, 1),
    Offset::new(1, 1),
    Offset::new(2, 1),
    Offset::new(1, 2),
];
const PANTHEON: &[Offset] = &[
    Offset::new(0, 0),
    Offset::new(1, 0),
    Offset::new(2, 0),
    Offset::new(0, 1),
    Offset::new(2, 1),
];
const LOUVRE: &[Offset] = &[
    Offset::new(0, 0),
    Offset::new(0, 1),
    Offset::new(0, 2),
    Offset::new(1, 2),
    Offset::new(2, 2),
];

const SINGLE_CELL: &[Offset] = &[Offset::new(0, 0)];
const FONTAINE: &[Offset] = &[Offset::new(0, 0), Offset::new(1, 0)];

/// North-facing shape of a building.
pub fn building_shape(name: BuildingName) -> &'static [Offset] {
    match name {
        BuildingName::Marche => MARCHE,
        BuildingName::Gare => GARE,
        BuildingName::Mairie => MAIRIE,
        BuildingName::Eglise => EGLISE,
        BuildingName::Theatre => THEATRE,
        BuildingName::Bourse => BOURSE,
        BuildingName::Musee => MUSEE,
        BuildingName::Hotel => HOTEL,
        BuildingName::Palais => PALAIS,
        BuildingName::Opera => OPERA,
        BuildingName::Pantheon => PANTHEON,
        BuildingName::Louvre => LOUVRE,
    }
}

/// North-facing shape of a decoration.
pub fn decoration_shape(name: DecorationName) -> &'static [Offset] {
    match name {
        DecorationName::Fontaine => FONTAINE,
        DecorationName::Lampadaire
        | DecorationName::Kiosque
        | DecorationName::Banc
        | DecorationName::Extension => SINGLE_CELL,
    }
}

/// North-facing shape of any piece.
pub fn shape(name: PieceName) -> &'static [Offset] {
    match name {
        PieceName::Building(building) => building_shape(building),
        PieceName::Decoration(decoration) => decoration_shape(decoration),
    }
}

/// Rotates a North-facing shape to `facing` and normalizes it.
pub fn oriented_shape(canonical: &[Offset], facing: Direction) -> Vec<Offset> {
    let turned: Vec<Offset> = match facing {
        Direction::North => canonical.to_vec(),
        Direction::East => canonical.iter().map(|o| o.rotated_clockwise()).collect(),
        Direction::South => canonical
            .iter()
            .map(|o| o.rotated_clockwise().rotated_clockwise())
            .collect(),
        Direction::West => canonical
            .iter()
            .map(|o| o.rotated_counter_clockwise())
            .collect(),
    };
    Offset::normalize(&turned)
}

/// Builds the piece `name` facing `facing` with its normalized minimum at `origin`.
#[instrument]
pub fn piece(name: impl Into<PieceName> + std::fmt::Debug, origin: Position, facing: Direction) -> Piece {
    let name = name.into();
    Piece::new(name, Position::new(0, 0), facing, oriented_shape(shape(name), facing))
        .translated(origin)
}
