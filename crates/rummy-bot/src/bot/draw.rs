use rummy_core::meld::can_extend_meld;
use rummy_core::model::card::Card;
use rummy_core::model::hand::Hand;
use std::fmt;

/// Where the next card comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawDecision {
    Discard,
    Stock,
}

impl DrawDecision {
    /// Wire form expected by the game server.
    pub const fn as_str(self) -> &'static str {
        match self {
            DrawDecision::Discard => "draw discard",
            DrawDecision::Stock => "draw stock",
        }
    }
}

impl fmt::Display for DrawDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct DrawPlanner;

impl DrawPlanner {
    /// Takes the visible discard only when it would complete a meld with cards
    /// already held.
    pub fn choose(hand: &Hand, top: Option<Card>) -> DrawDecision {
        match top {
            Some(card) if can_extend_meld(card, hand.cards()) => DrawDecision::Discard,
            _ => DrawDecision::Stock,
        }
    }
}
