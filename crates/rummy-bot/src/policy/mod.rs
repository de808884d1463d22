mod greedy;
mod mcts;

pub use greedy::GreedyPolicy;
pub use mcts::MctsPolicy;

use crate::bot::LayDownPlan;
use rummy_core::model::card::Card;
use rummy_core::model::hand::Hand;

/// What a policy sees when asked for a lay-down.
pub struct PolicyContext<'a> {
    pub hand: &'a Hand,
    /// Card picked up this turn; policies avoid throwing it straight back.
    pub protected: Option<Card>,
}

/// Interface for lay-down decision makers.
pub trait LayDownPolicy: Send {
    fn name(&self) -> &'static str;

    /// Every card in the returned plan must come from `ctx.hand`, each at most once.
    fn plan(&mut self, ctx: &PolicyContext<'_>) -> LayDownPlan;
}
