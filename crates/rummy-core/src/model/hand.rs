use crate::model::card::Card;
use std::vec::Vec;

/// Cards currently held by the player, kept in canonical (rank, suit) order.
///
/// A well-formed feed never produces two copies of a card, but duplicates are
/// kept rather than rejected so a garbled event cannot lose a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    /// Removes one copy of `card`; returns false when it was not held.
    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn count(&self, card: Card) -> usize {
        self.cards.iter().filter(|&&c| c == card).count()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn deadwood(&self) -> u32 {
        self.cards.iter().map(|card| card.deadwood()).sum()
    }

    fn sort(&mut self) {
        self.cards.sort_by_key(|card| card.sort_key());
    }
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn add_and_remove_cards() {
        let mut hand = Hand::new();
        let card = Card::new(Rank::Three, Suit::Clubs);
        hand.add(card);
        assert!(hand.contains(card));
        assert!(hand.remove(card));
        assert!(!hand.contains(card));
        assert!(!hand.remove(card));
    }

    #[test]
    fn cards_are_sorted_by_rank_then_suit() {
        let mut hand = Hand::new();
        hand.add(Card::new(Rank::King, Suit::Spades));
        hand.add(Card::new(Rank::Two, Suit::Hearts));
        hand.add(Card::new(Rank::Two, Suit::Clubs));
        hand.add(Card::new(Rank::Ten, Suit::Diamonds));
        let ordered: Vec<_> = hand.iter().map(|c| c.to_string()).collect();
        assert_eq!(ordered, ["2C", "2H", "TD", "KS"]);
    }

    #[test]
    fn duplicates_are_tolerated_and_removed_one_at_a_time() {
        let seven = Card::new(Rank::Seven, Suit::Hearts);
        let mut hand = Hand::with_cards(vec![seven, seven]);
        assert_eq!(hand.count(seven), 2);
        assert!(hand.remove(seven));
        assert_eq!(hand.count(seven), 1);
    }

    #[test]
    fn deadwood_sums_rank_values() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Five, Suit::Clubs),
            Card::new(Rank::King, Suit::Diamonds),
        ]);
        assert_eq!(hand.deadwood(), 18);
    }
}
