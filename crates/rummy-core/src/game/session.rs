use crate::game::history::{GameHistory, LearningWeights};
use crate::model::card::{Card, CardParseError, parse_cards};
use crate::model::hand::Hand;
use crate::model::pile::DiscardPile;

/// Marker the server puts on the line that closes a hand.
pub const HAND_END_MARKER: &str = " Ends:";

/// A feed line whose card token could not be read. The line was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    pub line: usize,
    pub text: String,
    pub error: CardParseError,
}

/// What a batch of feed lines did to the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedReport {
    /// Cards this player drew or took, in feed order.
    pub drawn: Vec<Card>,
    pub discarded: Vec<Card>,
    pub opponent_took: Vec<Card>,
    /// Take lines that found the pile already empty.
    pub empty_pile_takes: usize,
    pub hand_ends: Vec<String>,
    pub malformed: Vec<MalformedLine>,
}

impl FeedReport {
    pub fn hand_ended(&self) -> bool {
        !self.hand_ends.is_empty()
    }
}

/// All mutable state for one game, owned by whoever serializes calls for it.
#[derive(Debug, Clone)]
pub struct GameSession {
    player: String,
    game_id: Option<String>,
    opponent: Option<String>,
    hand: Hand,
    pile: DiscardPile,
    pending_pick: Option<Card>,
    opponent_picks: Vec<Card>,
    history: GameHistory,
    weights: LearningWeights,
}

impl GameSession {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            game_id: None,
            opponent: None,
            hand: Hand::new(),
            pile: DiscardPile::new(),
            pending_pick: None,
            opponent_picks: Vec::new(),
            history: GameHistory::default(),
            weights: LearningWeights::default(),
        }
    }

    /// Resets the session for a new game. Returns the hand tokens that failed to parse.
    pub fn start_game(
        &mut self,
        game_id: impl Into<String>,
        opponent: impl Into<String>,
        hand_tokens: &str,
    ) -> Vec<(String, CardParseError)> {
        self.game_id = Some(game_id.into());
        let opponent: String = opponent.into();
        self.opponent = (!opponent.is_empty()).then_some(opponent);
        self.history = GameHistory::default();
        self.weights = LearningWeights::default();
        self.start_hand(hand_tokens)
    }

    /// Deals a new hand within the current game; history and opponent are kept.
    pub fn start_hand(&mut self, hand_tokens: &str) -> Vec<(String, CardParseError)> {
        let (cards, rejected) = parse_cards(hand_tokens);
        self.hand = Hand::with_cards(cards);
        self.pile.clear();
        self.pending_pick = None;
        self.opponent_picks.clear();
        rejected
    }

    /// Applies feed lines top to bottom.
    ///
    /// A line may trigger several effects: this player's own "takes" line both
    /// adds the card to the hand and removes it from the pile. The last card
    /// this player drew becomes the pending pick. A line that should carry a
    /// card but ends in an unreadable token is reported and has no effect.
    pub fn apply_events(&mut self, text: &str) -> FeedReport {
        let mut report = FeedReport::default();

        for (index, line) in text.lines().enumerate() {
            let own = !self.player.is_empty()
                && (names_actor(line, &self.player, "draws")
                    || names_actor(line, &self.player, "takes"));
            let discards = line.contains("discards");
            let takes = line.contains("takes");

            let card = if own || discards || takes {
                let token = line.split_whitespace().next_back().unwrap_or("");
                match token.parse::<Card>() {
                    Ok(card) => Some(card),
                    Err(error) => {
                        report.malformed.push(MalformedLine {
                            line: index,
                            text: line.to_string(),
                            error,
                        });
                        continue;
                    }
                }
            } else {
                None
            };

            if let Some(card) = card.filter(|_| own) {
                self.hand.add(card);
                self.pending_pick = Some(card);
                report.drawn.push(card);
            }

            if let Some(card) = card.filter(|_| discards) {
                self.pile.push_front(card);
                report.discarded.push(card);
            }

            if takes {
                let by_opponent = self
                    .opponent
                    .as_deref()
                    .is_some_and(|name| names_actor(line, name, "takes"));
                if let Some(card) = card.filter(|_| by_opponent) {
                    self.opponent_picks.push(card);
                    report.opponent_took.push(card);
                }
                if self.pile.pop_front().is_none() {
                    report.empty_pile_takes += 1;
                }
            }

            if line.contains(HAND_END_MARKER) {
                report.hand_ends.push(line.to_string());
            }
        }

        report
    }

    /// Removes each card that is still held. Returns the cards that were missing.
    pub fn remove_cards<'a>(&mut self, cards: impl IntoIterator<Item = &'a Card>) -> Vec<Card> {
        cards
            .into_iter()
            .copied()
            .filter(|&card| !self.hand.remove(card))
            .collect()
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }

    pub fn opponent(&self) -> Option<&str> {
        self.opponent.as_deref()
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn pile(&self) -> &DiscardPile {
        &self.pile
    }

    pub fn pending_pick(&self) -> Option<Card> {
        self.pending_pick
    }

    pub fn set_pending_pick(&mut self, card: Option<Card>) {
        self.pending_pick = card;
    }

    pub fn opponent_picks(&self) -> &[Card] {
        &self.opponent_picks
    }

    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    pub fn weights(&self) -> &LearningWeights {
        &self.weights
    }

    /// Records a finished hand and nudges the learning weights.
    pub fn record_hand(&mut self, result: &str, score: i32) {
        self.history.record(result, score);
        self.weights.adjust(score);
    }
}

/// True when `name` appears as a whole word directly followed by `verb`.
fn names_actor(line: &str, name: &str, verb: &str) -> bool {
    let mut words = line.split_whitespace();
    let mut previous = words.next();
    for word in words {
        if previous == Some(name) && word == verb {
            return true;
        }
        previous = Some(word);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::GameSession;
    use crate::model::card::{Card, join_cards};

    fn card(token: &str) -> Card {
        token.parse().unwrap()
    }

    fn session() -> GameSession {
        let mut session = GameSession::new("P1");
        session.start_game("g1", "P2", "3C 4C 5C 7H 7D 2S 9S TS KH AD");
        session
    }

    #[test]
    fn start_game_sorts_hand_and_clears_pile() {
        let session = session();
        assert_eq!(
            join_cards(session.hand().cards()),
            "2S 3C 4C 5C 7D 7H 9S TS KH AD"
        );
        assert!(session.pile().is_empty());
        assert_eq!(session.opponent(), Some("P2"));
        assert_eq!(session.game_id(), Some("g1"));
    }

    #[test]
    fn start_game_reports_bad_tokens() {
        let mut session = GameSession::new("P1");
        let rejected = session.start_game("g1", "P2", "3C XX 4C");
        assert_eq!(session.hand().len(), 2);
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn opponent_discard_then_take() {
        let mut session = session();
        let report = session.apply_events("P2 discards 9H");
        assert_eq!(session.pile().top(), Some(card("9H")));
        assert_eq!(report.discarded, vec![card("9H")]);

        let mut other = GameSession::new("P2");
        other.start_game("g1", "P1", "2C");
        other.apply_events("P2 discards 9H");
        let report = other.apply_events("P1 takes 9H");
        assert!(other.pile().is_empty());
        assert_eq!(other.opponent_picks(), &[card("9H")]);
        assert_eq!(report.opponent_took, vec![card("9H")]);
    }

    #[test]
    fn own_take_adds_to_hand_and_pops_pile() {
        let mut session = session();
        session.apply_events("P2 discards 6H\nP1 takes 6H");
        assert!(session.hand().contains(card("6H")));
        assert!(session.pile().is_empty());
        assert_eq!(session.pending_pick(), Some(card("6H")));
        assert!(session.opponent_picks().is_empty());
    }

    #[test]
    fn own_draw_from_stock_sets_pending_pick() {
        let mut session = session();
        let report = session.apply_events("P1 draws QC");
        assert_eq!(report.drawn, vec![card("QC")]);
        assert_eq!(session.pending_pick(), Some(card("QC")));
        assert_eq!(session.hand().len(), 11);
    }

    #[test]
    fn take_from_empty_pile_is_a_no_op() {
        let mut session = session();
        let report = session.apply_events("P2 takes 4D");
        assert_eq!(report.empty_pile_takes, 1);
        assert!(session.pile().is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped_and_rest_of_feed_applies() {
        let mut session = session();
        let report = session.apply_events("P2 discards ??\nP1 draws 1Z\nP2 discards 8C");
        assert_eq!(report.malformed.len(), 2);
        assert_eq!(report.malformed[0].line, 0);
        assert_eq!(session.pile().top(), Some(card("8C")));
        assert_eq!(session.pile().len(), 1);
        assert_eq!(session.hand().len(), 10);
    }

    #[test]
    fn take_with_bad_token_leaves_pile_alone() {
        let mut session = session();
        session.apply_events("P2 discards 9H");
        let report = session.apply_events("P2 takes 9X");
        assert_eq!(report.malformed.len(), 1);
        assert_eq!(report.empty_pile_takes, 0);
        assert_eq!(session.pile().len(), 1);
        assert_eq!(session.pile().top(), Some(card("9H")));
        assert!(session.opponent_picks().is_empty());
    }

    #[test]
    fn own_name_must_be_a_whole_word() {
        let mut session = GameSession::new("bot");
        session.start_game("g1", "rival", "2C 3C");
        session.apply_events("rival discards 5H");
        let report = session.apply_events("robot takes 5H");
        assert!(report.drawn.is_empty());
        assert!(!session.hand().contains(card("5H")));
        assert!(session.pile().is_empty());
        assert!(session.opponent_picks().is_empty());

        session.apply_events("rival discards 6H\nbot takes 6H");
        assert!(session.hand().contains(card("6H")));
        assert_eq!(session.pending_pick(), Some(card("6H")));
    }

    #[test]
    fn hand_end_is_surfaced_without_mutation() {
        let mut session = session();
        let report = session.apply_events("Hand Ends: P2 wins");
        assert!(report.hand_ended());
        assert_eq!(session.hand().len(), 10);
        assert!(session.pile().is_empty());
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        let mut session = session();
        let report = session.apply_events("P2 is thinking\n\n");
        assert_eq!(report, Default::default());
    }

    #[test]
    fn remove_cards_reports_missing() {
        let mut session = session();
        let missing = session.remove_cards(&[card("3C"), card("QD")]);
        assert_eq!(missing, vec![card("QD")]);
        assert!(!session.hand().contains(card("3C")));
    }

    #[test]
    fn start_hand_keeps_history() {
        let mut session = session();
        session.record_hand("Hand Ends", 12);
        session.start_hand("2C 3C");
        assert_eq!(session.history().hands_played, 1);
        assert_eq!(session.hand().len(), 2);
    }
}
