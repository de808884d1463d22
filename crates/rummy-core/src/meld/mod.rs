//! Meld types and detection over arbitrary card collections.

mod detector;

pub use detector::{can_extend_meld, find_all_melds};

use crate::model::card::{Card, join_cards};
use core::fmt;

/// Smallest group that counts as a meld.
pub const MIN_MELD_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeldKind {
    /// Three or more cards of one rank.
    Set,
    /// Three or more consecutive cards of one suit.
    Run,
}

/// A group of cards laid down together. Cards are kept in the order they were found.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Meld {
    kind: MeldKind,
    cards: Vec<Card>,
}

impl Meld {
    pub fn new(kind: MeldKind, cards: Vec<Card>) -> Self {
        Self { kind, cards }
    }

    pub fn kind(&self) -> MeldKind {
        self.kind
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Re-checks the set or run rule against the stored cards.
    pub fn is_valid(&self) -> bool {
        if self.cards.len() < MIN_MELD_SIZE {
            return false;
        }
        match self.kind {
            MeldKind::Set => {
                let rank = self.cards[0].rank;
                self.cards.iter().all(|card| card.rank == rank)
            }
            MeldKind::Run => {
                let suit = self.cards[0].suit;
                self.cards.iter().all(|card| card.suit == suit)
                    && self
                        .cards
                        .windows(2)
                        .all(|pair| pair[1].value() == pair[0].value() + 1)
            }
        }
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_cards(&self.cards))
    }
}
