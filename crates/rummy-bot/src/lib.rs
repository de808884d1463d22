//! Turn decisions for a Gin Rummy player: draw choice, lay-down planning and
//! the controller that ties them to a game session.

pub mod bot;
pub mod controller;
pub mod policy;
pub mod search;

pub use bot::{DrawDecision, DrawPlanner, LayDownPlan};
pub use controller::TurnController;
pub use policy::{GreedyPolicy, LayDownPolicy, MctsPolicy, PolicyContext};
pub use search::{PlanError, SearchConfig, SearchStats};
