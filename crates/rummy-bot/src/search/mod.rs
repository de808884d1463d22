//! Monte Carlo tree search over lay-down arrangements of a single hand.

mod config;
mod mcts;
mod state;

pub use config::SearchConfig;
pub use mcts::{SearchOutcome, SearchStats, SearchTree, plan, rollout};
pub use state::{GIN_BONUS, Move, NONTERMINAL_PENALTY, PlanError, SearchState};
