use crate::model::card::Card;
use std::collections::VecDeque;

/// Face-up discard pile, most recent card first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscardPile {
    cards: VecDeque<Card>,
}

impl DiscardPile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_front(&mut self, card: Card) {
        self.cards.push_front(card);
    }

    /// Takes the top card. An empty pile is not an error; it yields `None`.
    pub fn pop_front(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    pub fn top(&self) -> Option<Card> {
        self.cards.front().copied()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}
