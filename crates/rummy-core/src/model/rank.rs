use core::fmt;

use super::card::CardParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[repr(u8)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub const ORDERED: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '2' => Some(Rank::Two),
            '3' => Some(Rank::Three),
            '4' => Some(Rank::Four),
            '5' => Some(Rank::Five),
            '6' => Some(Rank::Six),
            '7' => Some(Rank::Seven),
            '8' => Some(Rank::Eight),
            '9' => Some(Rank::Nine),
            'T' => Some(Rank::Ten),
            'J' => Some(Rank::Jack),
            'Q' => Some(Rank::Queen),
            'K' => Some(Rank::King),
            'A' => Some(Rank::Ace),
            _ => None,
        }
    }

    /// Run adjacency and deadwood both use this value (ace is high, 14).
    pub const fn value(self) -> u8 {
        self as u8
    }

    pub const fn symbol(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

/// Maps a rank character to its numeric value.
pub fn rank_value(symbol: char) -> Result<u8, CardParseError> {
    Rank::from_symbol(symbol)
        .map(Rank::value)
        .ok_or(CardParseError::InvalidRank(symbol))
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::{Rank, rank_value};
    use crate::model::card::CardParseError;

    #[test]
    fn display_matches_symbols() {
        assert_eq!(Rank::Queen.to_string(), "Q");
        assert_eq!(Rank::Ten.to_string(), "T");
    }

    #[test]
    fn rank_value_is_total_over_valid_symbols() {
        for rank in Rank::ORDERED {
            assert_eq!(rank_value(rank.symbol()), Ok(rank.value()));
        }
        assert_eq!(rank_value('T'), Ok(10));
        assert_eq!(rank_value('A'), Ok(14));
    }

    #[test]
    fn rank_value_rejects_unknown_symbols() {
        assert_eq!(rank_value('1'), Err(CardParseError::InvalidRank('1')));
        assert_eq!(rank_value('t'), Err(CardParseError::InvalidRank('t')));
    }
}
