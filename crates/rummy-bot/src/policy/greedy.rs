use super::{LayDownPolicy, PolicyContext};
use crate::bot::{LayDownPlan, finish_with_heuristic};
use crate::search::{Move, SearchState};

/// Lays down the first meld found until none are left, then discards by the
/// singleton heuristic. Used when the search is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl LayDownPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn plan(&mut self, ctx: &PolicyContext<'_>) -> LayDownPlan {
        let mut state = SearchState::new(ctx.hand.cards());
        while let Some(meld) = state.possible_moves().into_iter().find_map(|mv| match mv {
            Move::Meld(meld) => Some(meld),
            Move::Finish(_) => None,
        }) {
            state = state.apply(&Move::Meld(meld));
        }
        LayDownPlan::from_state(&finish_with_heuristic(state, ctx.protected))
    }
}

#[cfg(test)]
mod tests {
    use super::GreedyPolicy;
    use crate::policy::{LayDownPolicy, PolicyContext};
    use rummy_core::model::card::parse_cards;
    use rummy_core::model::hand::Hand;

    fn plan_for(tokens: &str, protected: Option<&str>) -> String {
        let hand = Hand::with_cards(parse_cards(tokens).0);
        let ctx = PolicyContext {
            hand: &hand,
            protected: protected.map(|token| token.parse().unwrap()),
        };
        GreedyPolicy.plan(&ctx).play_string()
    }

    #[test]
    fn melds_everything_it_can_then_discards() {
        assert_eq!(
            plan_for("7H 7D 7S 3C 4C 5C 2S KD", None),
            "meld 7D 7H 7S meld 3C 4C 5C discard KD"
        );
    }

    #[test]
    fn respects_the_protected_pick() {
        assert_eq!(plan_for("3C 4C 5C 2S KD", Some("KD")), "meld 3C 4C 5C discard 2S");
    }

    #[test]
    fn empty_hand_plans_nothing() {
        assert_eq!(plan_for("", None), "");
    }
}
