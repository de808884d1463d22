pub mod card;
pub mod deck;
pub mod hand;
pub mod pile;
pub mod rank;
pub mod suit;
