use serde::{Deserialize, Serialize};

/// Outcome of one finished hand as seen by this player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandRecord {
    pub result: String,
    pub score: i32,
}

/// Running totals across the hands of a game.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameHistory {
    pub hands_played: u32,
    pub hands_won: u32,
    pub total_score: i64,
    pub hands: Vec<HandRecord>,
}

impl GameHistory {
    /// A positive score counts as a won hand.
    pub fn record(&mut self, result: impl Into<String>, score: i32) {
        self.hands_played += 1;
        self.total_score += i64::from(score);
        if score > 0 {
            self.hands_won += 1;
        }
        self.hands.push(HandRecord {
            result: result.into(),
            score,
        });
    }
}

const PENALTY_THRESHOLD: i32 = -20;
const BONUS_THRESHOLD: i32 = 20;
const PENALTY_STEP: f64 = 0.1;
const BONUS_STEP: f64 = 0.5;

/// Tunables nudged after every hand. Tracked for reporting; the planner does not read them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LearningWeights {
    pub meld_bonus: f64,
    pub discard_penalty: f64,
}

impl Default for LearningWeights {
    fn default() -> Self {
        Self {
            meld_bonus: 10.0,
            discard_penalty: 1.0,
        }
    }
}

impl LearningWeights {
    pub fn adjust(&mut self, hand_score: i32) {
        if hand_score < PENALTY_THRESHOLD {
            self.discard_penalty += PENALTY_STEP;
        } else if hand_score > BONUS_THRESHOLD {
            self.meld_bonus += BONUS_STEP;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GameHistory, LearningWeights};

    #[test]
    fn record_tracks_wins_and_totals() {
        let mut history = GameHistory::default();
        history.record("P1 Ends: gin", 100);
        history.record("P2 Ends: knock", -18);
        assert_eq!(history.hands_played, 2);
        assert_eq!(history.hands_won, 1);
        assert_eq!(history.total_score, 82);
        assert_eq!(history.hands[1].score, -18);
    }

    #[test]
    fn weights_move_only_outside_the_neutral_band() {
        let mut weights = LearningWeights::default();
        weights.adjust(-5);
        weights.adjust(20);
        assert_eq!(weights, LearningWeights::default());

        weights.adjust(-40);
        assert!((weights.discard_penalty - 1.1).abs() < 1e-9);
        weights.adjust(100);
        assert!((weights.meld_bonus - 10.5).abs() < 1e-9);
    }
}
