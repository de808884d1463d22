use rummy_core::heuristic::choose_discard;
use rummy_core::meld::{MeldKind, can_extend_meld, find_all_melds};
use rummy_core::model::card::Card;
use rummy_core::model::deck::{Deck, GIN_HAND_SIZE};
use std::collections::HashSet;

fn dealt_hands() -> impl Iterator<Item = (u64, Vec<Card>)> {
    (0u64..64).map(|seed| {
        let mut deck = Deck::shuffled_with_seed(seed);
        (seed, deck.deal(GIN_HAND_SIZE + 1))
    })
}

#[test]
fn detected_melds_are_valid_and_drawn_from_the_hand() {
    for (seed, hand) in dealt_hands() {
        for meld in find_all_melds(&hand) {
            assert!(meld.is_valid(), "seed {seed}: {meld}");
            assert!(meld.len() >= 3);
            assert!(meld.cards().iter().all(|card| hand.contains(card)));
            match meld.kind() {
                MeldKind::Set => {
                    let rank = meld.cards()[0].rank;
                    assert!(meld.cards().iter().all(|c| c.rank == rank));
                }
                MeldKind::Run => {
                    for pair in meld.cards().windows(2) {
                        assert_eq!(pair[0].suit, pair[1].suit);
                        assert_eq!(pair[0].value() + 1, pair[1].value());
                    }
                }
            }
        }
    }
}

#[test]
fn runs_are_maximal_and_never_repeat_cards() {
    for (seed, hand) in dealt_hands() {
        let mut seen = HashSet::new();
        for meld in find_all_melds(&hand).iter().filter(|m| m.kind() == MeldKind::Run) {
            for card in meld.cards() {
                assert!(seen.insert(*card), "seed {seed}: {card} in two runs");
            }
            let first = meld.cards()[0];
            let last = meld.cards()[meld.len() - 1];
            let extends = |value: u8| {
                hand.iter()
                    .any(|c| c.suit == first.suit && c.value() == value)
            };
            assert!(!extends(first.value() - 1), "seed {seed}: {meld} not maximal");
            assert!(!extends(last.value() + 1), "seed {seed}: {meld} not maximal");
        }
    }
}

#[test]
fn draw_oracle_agrees_with_detector() {
    for (seed, hand) in dealt_hands() {
        let (held, rest) = hand.split_at(GIN_HAND_SIZE);
        let candidate = rest[0];
        let mut extended = held.to_vec();
        extended.push(candidate);
        let detected = find_all_melds(&extended)
            .iter()
            .any(|meld| meld.contains(candidate));
        assert_eq!(
            can_extend_meld(candidate, held),
            detected,
            "seed {seed}: {candidate}"
        );
    }
}

#[test]
fn discard_heuristic_always_picks_a_held_card() {
    for (seed, hand) in dealt_hands() {
        let protected = hand.first().copied();
        let choice = choose_discard(&hand, protected);
        assert!(choice.is_some_and(|card| hand.contains(&card)), "seed {seed}");
    }
    assert_eq!(choose_discard(&[], None), None);
}
