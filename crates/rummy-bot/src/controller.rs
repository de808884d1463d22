use crate::bot::{DrawDecision, DrawPlanner};
use crate::policy::{GreedyPolicy, LayDownPolicy, MctsPolicy, PolicyContext};
use crate::search::{SearchConfig, SearchState};
use rummy_core::game::serialization::SessionSnapshot;
use rummy_core::game::session::{FeedReport, GameSession};
use rummy_core::model::card::CardParseError;
use tracing::{Level, event};

/// Drives one player's decisions for one game.
///
/// Every entry point first applies the event feed it was handed, so the
/// session reflects the server's view before anything is decided.
pub struct TurnController {
    session: GameSession,
    policy: Box<dyn LayDownPolicy>,
}

impl TurnController {
    /// Uses the tree search, or the greedy planner when `config.iterations` is zero.
    pub fn new(player: impl Into<String>, config: SearchConfig, seed: u64) -> Self {
        let policy: Box<dyn LayDownPolicy> = if config.iterations == 0 {
            Box::new(GreedyPolicy)
        } else {
            Box::new(MctsPolicy::seeded(config, seed))
        };
        Self::with_policy(player, policy)
    }

    pub fn with_policy(player: impl Into<String>, policy: Box<dyn LayDownPolicy>) -> Self {
        Self {
            session: GameSession::new(player),
            policy,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.session)
    }

    pub fn start_game(&mut self, game_id: &str, opponent: &str, hand: &str) {
        let rejected = self.session.start_game(game_id, opponent, hand);
        log_rejected(&rejected);
        event!(
            target: "rummy_bot::controller",
            Level::INFO,
            game_id,
            opponent,
            hand = %hand.trim(),
            held = self.session.hand().len(),
            "game started"
        );
    }

    pub fn start_hand(&mut self, hand: &str) {
        let rejected = self.session.start_hand(hand);
        log_rejected(&rejected);
        event!(
            target: "rummy_bot::controller",
            Level::INFO,
            game_id = self.session.game_id().unwrap_or(""),
            held = self.session.hand().len(),
            "hand started"
        );
    }

    /// Applies `events`, then chooses between the visible discard and the stock.
    pub fn decide_draw(&mut self, events: &str) -> DrawDecision {
        self.session.set_pending_pick(None);
        self.ingest(events);
        let top = self.session.pile().top();
        let decision = DrawPlanner::choose(self.session.hand(), top);
        if decision == DrawDecision::Discard {
            self.session.set_pending_pick(top);
        }
        event!(
            target: "rummy_bot::controller",
            Level::INFO,
            decision = decision.as_str(),
            top = %top.map(|card| card.to_string()).unwrap_or_default(),
            held = self.session.hand().len(),
            "draw decided"
        );
        decision
    }

    /// Applies `events`, plans a lay-down and removes the played cards from the hand.
    pub fn decide_lay_down(&mut self, events: &str) -> String {
        self.ingest(events);
        let ctx = PolicyContext {
            hand: self.session.hand(),
            protected: self.session.pending_pick(),
        };
        let plan = self.policy.plan(&ctx);
        let play = plan.play_string();

        let missing = self.session.remove_cards(plan.consumed());
        for card in &missing {
            event!(
                target: "rummy_bot::controller",
                Level::WARN,
                card = %card,
                "planned card was not in hand"
            );
        }

        event!(
            target: "rummy_bot::controller",
            Level::INFO,
            policy = self.policy.name(),
            play = %play,
            melds = plan.melds.len(),
            iterations = plan.stats.map(|stats| stats.iterations).unwrap_or(0),
            held = self.session.hand().len(),
            "lay-down decided"
        );
        play
    }

    /// Applies an event feed with no decision attached.
    pub fn update(&mut self, events: &str) -> FeedReport {
        self.ingest(events)
    }

    fn ingest(&mut self, events: &str) -> FeedReport {
        let report = self.session.apply_events(events);
        for bad in &report.malformed {
            event!(
                target: "rummy_bot::controller",
                Level::WARN,
                line = bad.line,
                text = %bad.text,
                error = %bad.error,
                "skipped malformed event line"
            );
        }
        if report.empty_pile_takes > 0 {
            event!(
                target: "rummy_bot::controller",
                Level::DEBUG,
                count = report.empty_pile_takes,
                "take reported with an empty discard pile"
            );
        }
        for result in &report.hand_ends {
            self.finish_hand(result);
        }
        report
    }

    fn finish_hand(&mut self, result: &str) {
        let score = SearchState::settled(self.session.hand().cards())
            .evaluate()
            .map(|value| value as i32)
            .unwrap_or(0);
        self.session.record_hand(result, score);
        let history = self.session.history();
        event!(
            target: "rummy_bot::controller",
            Level::INFO,
            result,
            score,
            hands_played = history.hands_played,
            hands_won = history.hands_won,
            total_score = history.total_score,
            "hand finished"
        );
    }
}

fn log_rejected(rejected: &[(String, CardParseError)]) {
    for (token, error) in rejected {
        event!(
            target: "rummy_bot::controller",
            Level::WARN,
            token = %token,
            error = %error,
            "skipped unreadable card in dealt hand"
        );
    }
}
