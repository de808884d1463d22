use crate::search::{Move, SearchState, SearchStats};
use rummy_core::heuristic::choose_discard;
use rummy_core::meld::Meld;
use rummy_core::model::card::{Card, join_cards};
use std::fmt;

/// Melds to lay down and the card to throw away, ready to send.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayDownPlan {
    pub melds: Vec<Meld>,
    pub discard: Option<Card>,
    /// Present when the plan came out of a search.
    pub stats: Option<SearchStats>,
}

impl LayDownPlan {
    /// Reads the melds and discard off a search state. An unfinished state
    /// contributes its melds only.
    pub fn from_state(state: &SearchState) -> Self {
        Self {
            melds: state.melds().to_vec(),
            discard: state.discard().filter(|_| state.is_terminal()),
            stats: None,
        }
    }

    pub fn with_stats(mut self, stats: SearchStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Every card the plan takes out of the hand.
    pub fn consumed(&self) -> impl Iterator<Item = &Card> + '_ {
        self.melds
            .iter()
            .flat_map(|meld| meld.cards().iter())
            .chain(self.discard.iter())
    }

    /// `meld c c c ... discard X`, or an empty string for an empty plan.
    pub fn play_string(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.melds.len() + 1);
        for meld in &self.melds {
            parts.push(format!("meld {}", join_cards(meld.cards())));
        }
        if let Some(card) = self.discard {
            parts.push(format!("discard {card}"));
        }
        parts.join(" ")
    }
}

impl fmt::Display for LayDownPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.play_string())
    }
}

/// Finishes a plan the search left open, discarding by the singleton heuristic.
///
/// Finished and fully melded states come back unchanged.
pub fn finish_with_heuristic(state: SearchState, protected: Option<Card>) -> SearchState {
    if state.is_terminal() || state.remaining().is_empty() {
        return state;
    }
    match choose_discard(state.remaining(), protected) {
        Some(card) => state.apply(&Move::Finish(card)),
        None => state,
    }
}

#[cfg(test)]
mod tests {
    use super::{LayDownPlan, finish_with_heuristic};
    use crate::search::{Move, SearchState};
    use rummy_core::model::card::{Card, parse_cards};

    fn cards(tokens: &str) -> Vec<Card> {
        parse_cards(tokens).0
    }

    fn card(token: &str) -> Card {
        token.parse().unwrap()
    }

    fn melded(tokens: &str) -> SearchState {
        let state = SearchState::new(&cards(tokens));
        let first = state.possible_moves().into_iter().next().unwrap();
        state.apply(&first)
    }

    #[test]
    fn play_string_lists_melds_then_discard() {
        let state = melded("3C 4C 5C KD").apply(&Move::Finish(card("KD")));
        let plan = LayDownPlan::from_state(&state);
        assert_eq!(plan.play_string(), "meld 3C 4C 5C discard KD");
        assert_eq!(plan.consumed().count(), 4);
    }

    #[test]
    fn discard_only_plan() {
        let state = SearchState::new(&cards("2S")).apply(&Move::Finish(card("2S")));
        assert_eq!(LayDownPlan::from_state(&state).to_string(), "discard 2S");
    }

    #[test]
    fn empty_plan_is_empty_string() {
        let plan = LayDownPlan::from_state(&SearchState::new(&[]));
        assert_eq!(plan.play_string(), "");
        assert_eq!(plan.consumed().count(), 0);
    }

    #[test]
    fn guard_finishes_open_plans() {
        let open = melded("3C 4C 5C 9D KD KH");
        let finished = finish_with_heuristic(open, None);
        assert!(finished.is_terminal());
        assert_eq!(finished.discard(), Some(card("9D")));
    }

    #[test]
    fn guard_skips_protected_pick() {
        let open = SearchState::new(&cards("2C 9D KD"));
        let finished = finish_with_heuristic(open, Some(card("KD")));
        assert_eq!(finished.discard(), Some(card("9D")));
    }

    #[test]
    fn guard_leaves_fully_melded_state_alone() {
        let open = melded("3C 4C 5C");
        let same = finish_with_heuristic(open.clone(), None);
        assert_eq!(same, open);
        assert_eq!(LayDownPlan::from_state(&same).play_string(), "meld 3C 4C 5C");
    }
}
