use super::history::{GameHistory, LearningWeights};
use super::session::GameSession;
use crate::model::card::Card;
use serde::{Deserialize, Serialize};

/// Read-only view of a session, with cards rendered as tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSnapshot {
    pub player: String,
    pub game_id: Option<String>,
    pub opponent: Option<String>,
    pub hand: Vec<String>,
    pub discard_pile: Vec<String>,
    pub pending_pick: Option<String>,
    pub opponent_picks: Vec<String>,
    pub history: GameHistory,
    pub weights: LearningWeights,
}

impl SessionSnapshot {
    pub fn capture(session: &GameSession) -> Self {
        SessionSnapshot {
            player: session.player().to_string(),
            game_id: session.game_id().map(str::to_string),
            opponent: session.opponent().map(str::to_string),
            hand: tokens(session.hand().iter()),
            discard_pile: tokens(session.pile().iter()),
            pending_pick: session.pending_pick().map(|card| card.to_string()),
            opponent_picks: tokens(session.opponent_picks().iter()),
            history: session.history().clone(),
            weights: *session.weights(),
        }
    }

    pub fn to_json(session: &GameSession) -> serde_json::Result<String> {
        let snapshot = Self::capture(session);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn tokens<'a>(cards: impl Iterator<Item = &'a Card>) -> Vec<String> {
    cards.map(Card::to_string).collect()
}
