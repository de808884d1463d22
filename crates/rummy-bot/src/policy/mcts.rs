use super::{LayDownPolicy, PolicyContext};
use crate::bot::{LayDownPlan, finish_with_heuristic};
use crate::search::{SearchConfig, SearchState, plan};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{Level, event};

/// Plans lay-downs with Monte Carlo tree search.
///
/// Owns its random source so a fixed seed replays the same decisions.
pub struct MctsPolicy<R = StdRng> {
    config: SearchConfig,
    rng: R,
}

impl MctsPolicy<StdRng> {
    pub fn seeded(config: SearchConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> MctsPolicy<R> {
    pub fn with_rng(config: SearchConfig, rng: R) -> Self {
        Self { config, rng }
    }
}

impl<R: Rng + Send> LayDownPolicy for MctsPolicy<R> {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn plan(&mut self, ctx: &PolicyContext<'_>) -> LayDownPlan {
        let root = SearchState::new(ctx.hand.cards());
        let outcome = plan(&root, &self.config, &mut self.rng);
        let finished = &outcome.final_state;
        if !finished.is_terminal() && !finished.remaining().is_empty() {
            event!(
                target: "rummy_bot::mcts",
                Level::DEBUG,
                iterations = outcome.stats.iterations,
                remaining = finished.remaining().len(),
                "search line left cards unassigned; finishing with heuristic discard"
            );
        }
        let state = finish_with_heuristic(outcome.final_state, ctx.protected);
        event!(
            target: "rummy_bot::mcts",
            Level::DEBUG,
            iterations = outcome.stats.iterations,
            nodes = outcome.stats.nodes,
            elapsed_ms = outcome.stats.elapsed_ms,
            best_visits = outcome.stats.best_visits,
            best_mean = outcome.stats.best_mean,
            "lay-down search finished"
        );
        LayDownPlan::from_state(&state).with_stats(outcome.stats)
    }
}
