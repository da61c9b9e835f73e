//! Action cards drawn for a match.

use crate::tile::Color;
use derive_getters::Getters;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use tracing::{debug, instrument};

/// Number of card types in play for a single match.
pub const CARDS_PER_MATCH: usize = 8;

/// The twelve card types; a match uses eight of them.
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
    derive_more::Display,
)]
pub enum CardType {
    /// Street lamp decoration.
    Lampadaire,
    /// Metro entrance.
    Metropolitain,
    /// Fountain decoration.
    Fontaine,
    /// Kiosk decoration.
    Kiosque,
    /// Bench decoration.
    Banc,
    /// Building extension.
    Extension,
    /// The painter.
    Peintre,
    /// The bookseller.
    Bouquiniste,
    /// The pigeons.
    Pigeons,
    /// The circus.
    Cirque,
    /// The garden.
    Jardin,
    /// The bridge.
    Pont,
}

/// Lifecycle of a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardState {
    /// Still on the table.
    #[default]
    UnpickedAndUnused,
    /// Claimed but its effect not yet applied.
    PickedButUnused,
    /// Claimed and spent.
    PickedAndUsed,
}

/// A card of the match with its current state and owner.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Card {
    /// The card's type.
    card_type: CardType,
    /// The card's state.
    state: CardState,
    /// The owning color, if claimed.
    owner: Option<Color>,
}

impl Card {
    /// An unpicked card.
    pub fn new(card_type: CardType) -> Self {
        Self {
            card_type,
            state: CardState::UnpickedAndUnused,
            owner: None,
        }
    }

    pub(crate) fn update(&mut self, owner: Option<Color>, state: CardState) {
        self.owner = owner;
        self.state = state;
    }
}

/// Selects [`CARDS_PER_MATCH`] distinct card types at random, ordered by type.
#[instrument(skip(rng))]
pub(crate) fn draw_cards<R: Rng>(rng: &mut R) -> Vec<Card> {
    let mut types: Vec<CardType> = CardType::iter().collect();
    types.shuffle(rng);
    types.truncate(CARDS_PER_MATCH);
    types.sort();
    debug!(?types, "Drew cards for match");
    types.into_iter().map(Card::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_draw_selects_eight_distinct_types() {
        let mut rng = StdRng::seed_from_u64(7);
        let cards = draw_cards(&mut rng);
        let types: HashSet<CardType> = cards.iter().map(|card| *card.card_type()).collect();
        assert_eq!(cards.len(), CARDS_PER_MATCH);
        assert_eq!(types.len(), CARDS_PER_MATCH);
        assert!(cards.iter().all(|c| *c.state() == CardState::UnpickedAndUnused));
    }

    #[test]
    fn test_draw_varies_between_matches() {
        let draws: HashSet<Vec<CardType>> = (0..20)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                draw_cards(&mut rng).iter().map(|card| *card.card_type()).collect()
            })
            .collect();
        assert!(draws.len() > 1);
    }
}
