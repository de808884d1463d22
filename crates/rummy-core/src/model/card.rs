use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn value(self) -> u8 {
        self.rank.value()
    }

    /// Points this card costs when left unmelded.
    pub const fn deadwood(self) -> u32 {
        self.rank.value() as u32
    }

    /// Sort key used for canonical hand order: rank value first, suit second.
    pub const fn sort_key(self) -> (u8, u8) {
        (self.rank.value(), self.suit as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("card token must be exactly two characters, got {0:?}")]
    Length(String),
    #[error("invalid rank symbol {0:?}")]
    InvalidRank(char),
    #[error("invalid suit symbol {0:?}")]
    InvalidSuit(char),
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut chars = token.chars();
        let (Some(rank), Some(suit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(CardParseError::Length(token.to_string()));
        };
        let rank = Rank::from_symbol(rank).ok_or(CardParseError::InvalidRank(rank))?;
        let suit = Suit::from_symbol(suit).ok_or(CardParseError::InvalidSuit(suit))?;
        Ok(Card::new(rank, suit))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Parses a whitespace-delimited list of card tokens.
///
/// Returns the cards that parsed and, separately, each rejected token with its error.
pub fn parse_cards(text: &str) -> (Vec<Card>, Vec<(String, CardParseError)>) {
    let mut cards = Vec::new();
    let mut rejected = Vec::new();
    for token in text.split_whitespace() {
        match token.parse::<Card>() {
            Ok(card) => cards.push(card),
            Err(err) => rejected.push((token.to_string(), err)),
        }
    }
    (cards, rejected)
}

/// Joins cards into their space-separated token form.
pub fn join_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> String {
    cards
        .into_iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{Card, CardParseError, Rank, Suit, join_cards, parse_cards};

    #[test]
    fn parses_two_character_tokens() {
        assert_eq!("TD".parse::<Card>(), Ok(Card::new(Rank::Ten, Suit::Diamonds)));
        assert_eq!("AS".parse::<Card>(), Ok(Card::new(Rank::Ace, Suit::Spades)));
        assert_eq!("2C".parse::<Card>(), Ok(Card::new(Rank::Two, Suit::Clubs)));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!(
            "10H".parse::<Card>(),
            Err(CardParseError::Length("10H".to_string()))
        );
        assert_eq!("".parse::<Card>(), Err(CardParseError::Length(String::new())));
        assert_eq!("1H".parse::<Card>(), Err(CardParseError::InvalidRank('1')));
        assert_eq!("KX".parse::<Card>(), Err(CardParseError::InvalidSuit('X')));
    }

    #[test]
    fn display_round_trips() {
        for token in ["3C", "TH", "QS", "AD"] {
            let card: Card = token.parse().unwrap();
            assert_eq!(card.to_string(), token);
        }
    }

    #[test]
    fn deadwood_uses_rank_value() {
        assert_eq!(Card::new(Rank::Five, Suit::Clubs).deadwood(), 5);
        assert_eq!(Card::new(Rank::King, Suit::Diamonds).deadwood(), 13);
        assert_eq!(Card::new(Rank::Ace, Suit::Hearts).deadwood(), 14);
    }

    #[test]
    fn parse_cards_skips_bad_tokens() {
        let (cards, rejected) = parse_cards("3C 4C  ZZ 5C\n");
        assert_eq!(join_cards(&cards), "3C 4C 5C");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].0, "ZZ");
    }
}
