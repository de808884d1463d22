//! Card model, game session state and meld detection for a two-player Gin Rummy player.
//! Keep this crate free of IO and logging.

pub mod game;
pub mod heuristic;
pub mod meld;
pub mod model;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "rummy-player"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
