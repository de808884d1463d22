//! Greedy discard selection used when the planner is skipped or leaves cards unassigned.

use crate::model::card::Card;

/// Picks the card to throw away from `cards`.
///
/// Prefers the highest-value card whose rank appears only once and which is
/// not `protected` (normally the card just picked up). When every such card
/// is protected, or no rank is isolated, falls back to the highest-value card
/// in the hand regardless of protection. Ties go to the higher suit.
pub fn choose_discard(cards: &[Card], protected: Option<Card>) -> Option<Card> {
    let mut rank_counts = [0u8; 16];
    for card in cards {
        let slot = &mut rank_counts[card.value() as usize];
        *slot = slot.saturating_add(1);
    }

    let isolated = cards
        .iter()
        .copied()
        .filter(|card| rank_counts[card.value() as usize] == 1)
        .filter(|card| Some(*card) != protected)
        .max_by_key(|card| card.sort_key());

    isolated.or_else(|| cards.iter().copied().max_by_key(|card| card.sort_key()))
}
