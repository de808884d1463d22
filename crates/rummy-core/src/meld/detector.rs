use super::{MIN_MELD_SIZE, Meld, MeldKind};
use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use std::collections::BTreeMap;

/// Finds every set and every maximal run in `cards`.
///
/// Each rank group of three or more is one set (sub-combinations are not
/// listed). Each maximal run of consecutive values in a suit is one run; a
/// run of five is not split into its shorter runs. A card may appear in both
/// a set and a run; choosing between them is left to the caller. A repeated
/// card inside a run is listed once and does not break the run.
///
/// Sets come first by ascending rank, then runs by suit and start value.
pub fn find_all_melds(cards: &[Card]) -> Vec<Meld> {
    let mut melds = Vec::new();

    let mut by_rank: BTreeMap<Rank, Vec<Card>> = BTreeMap::new();
    for &card in cards {
        by_rank.entry(card.rank).or_default().push(card);
    }
    for (_, mut group) in by_rank {
        if group.len() >= MIN_MELD_SIZE {
            group.sort_by_key(|card| card.sort_key());
            melds.push(Meld::new(MeldKind::Set, group));
        }
    }

    for suit in Suit::ALL {
        let mut suited: Vec<Card> = cards.iter().copied().filter(|c| c.suit == suit).collect();
        suited.sort_by_key(|card| card.value());

        let mut run: Vec<Card> = Vec::new();
        for card in suited {
            if run.last().is_some_and(|last| last.value() == card.value()) {
                continue;
            }
            let extends = run
                .last()
                .is_some_and(|last| card.value() == last.value() + 1);
            if !extends {
                flush_run(&mut run, &mut melds);
            }
            run.push(card);
        }
        flush_run(&mut run, &mut melds);
    }

    melds
}

fn flush_run(run: &mut Vec<Card>, melds: &mut Vec<Meld>) {
    let cards = std::mem::take(run);
    if cards.len() >= MIN_MELD_SIZE {
        melds.push(Meld::new(MeldKind::Run, cards));
    }
}

/// Returns true when adding `card` to `hand` would form a meld that includes it.
///
/// Neither input is modified.
pub fn can_extend_meld(card: Card, hand: &[Card]) -> bool {
    let same_rank = hand.iter().filter(|c| c.rank == card.rank).count();
    if same_rank + 1 >= MIN_MELD_SIZE {
        return true;
    }

    let mut present = [false; 16];
    for c in hand.iter().filter(|c| c.suit == card.suit) {
        present[c.value() as usize] = true;
    }

    let value = card.value() as usize;
    let mut length = 1;
    let mut below = value - 1;
    while present[below] {
        length += 1;
        below -= 1;
    }
    let mut above = value + 1;
    while present[above] {
        length += 1;
        above += 1;
    }
    length >= MIN_MELD_SIZE
}
