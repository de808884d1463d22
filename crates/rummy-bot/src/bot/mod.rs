mod draw;
mod lay_down;

pub use draw::{DrawDecision, DrawPlanner};
pub use lay_down::{LayDownPlan, finish_with_heuristic};
