use rummy_core::meld::{Meld, find_all_melds};
use rummy_core::model::card::Card;
use thiserror::Error;

/// Score for a finished arrangement with no deadwood.
pub const GIN_BONUS: f64 = 100.0;
/// Score substituted when a rollout ends on a state that cannot be scored.
pub const NONTERMINAL_PENALTY: f64 = -1000.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("evaluated a search state that has not finished")]
    NonterminalEvaluation,
}

/// One step of a lay-down plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Move {
    /// Commit a meld found among the remaining cards.
    Meld(Meld),
    /// Stop melding and throw this card away.
    Finish(Card),
}

/// A partial lay-down: cards still unassigned, melds committed so far, and
/// the discard once the plan is finished.
///
/// Every card of the starting hand is in exactly one of `remaining`, a meld,
/// or `discard`. States are never edited in place; [`SearchState::apply`]
/// returns a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    remaining: Vec<Card>,
    melds: Vec<Meld>,
    finished: bool,
    discard: Option<Card>,
}

impl SearchState {
    pub fn new(cards: &[Card]) -> Self {
        Self {
            remaining: cards.to_vec(),
            melds: Vec::new(),
            finished: false,
            discard: None,
        }
    }

    /// A finished state holding `cards` as deadwood, used to score a hand as it stands.
    pub fn settled(cards: &[Card]) -> Self {
        Self {
            remaining: cards.to_vec(),
            melds: Vec::new(),
            finished: true,
            discard: None,
        }
    }

    pub fn remaining(&self) -> &[Card] {
        &self.remaining
    }

    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    pub fn discard(&self) -> Option<Card> {
        self.discard
    }

    pub fn is_terminal(&self) -> bool {
        self.finished
    }

    /// Every card is melded but the plan was never finished.
    pub fn is_exhausted(&self) -> bool {
        !self.finished && self.remaining.is_empty()
    }

    /// Cards accounted for across remaining, melds and discard.
    pub fn card_count(&self) -> usize {
        self.remaining.len()
            + self.melds.iter().map(Meld::len).sum::<usize>()
            + usize::from(self.discard.is_some())
    }

    pub fn possible_moves(&self) -> Vec<Move> {
        if self.finished {
            return Vec::new();
        }
        let mut moves: Vec<Move> = find_all_melds(&self.remaining)
            .into_iter()
            .map(Move::Meld)
            .collect();
        moves.extend(self.remaining.iter().copied().map(Move::Finish));
        moves
    }

    /// Returns the state after `mv`. A move naming cards that are no longer
    /// remaining leaves the state unchanged.
    pub fn apply(&self, mv: &Move) -> SearchState {
        let mut next = self.clone();
        match mv {
            Move::Meld(meld) => {
                for card in meld.cards() {
                    match next.remaining.iter().position(|c| c == card) {
                        Some(index) => {
                            next.remaining.remove(index);
                        }
                        None => return self.clone(),
                    }
                }
                next.melds.push(meld.clone());
                next.finished = false;
            }
            Move::Finish(card) => {
                let Some(index) = next.remaining.iter().position(|c| c == card) else {
                    return self.clone();
                };
                next.remaining.remove(index);
                next.discard = Some(*card);
                next.finished = true;
            }
        }
        next
    }

    /// Finishes a state with nothing left to discard.
    pub fn finish_exhausted(&self) -> SearchState {
        let mut next = self.clone();
        next.finished = true;
        next
    }

    pub fn apply_sequence<'a>(&self, moves: impl IntoIterator<Item = &'a Move>) -> SearchState {
        moves
            .into_iter()
            .fold(self.clone(), |state, mv| state.apply(mv))
    }

    pub fn deadwood(&self) -> u32 {
        self.remaining.iter().map(|card| card.deadwood()).sum()
    }

    /// Negative deadwood, or [`GIN_BONUS`] when nothing is left over.
    pub fn evaluate(&self) -> Result<f64, PlanError> {
        if !self.finished {
            return Err(PlanError::NonterminalEvaluation);
        }
        let deadwood = self.deadwood();
        if deadwood == 0 {
            Ok(GIN_BONUS)
        } else {
            Ok(-f64::from(deadwood))
        }
    }
}
