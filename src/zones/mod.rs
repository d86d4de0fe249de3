//! Card piles.
//!
//! Every pile is a `FieldDeck`; which role it plays (idle, hand, battling,
//! dead, common pool) is decided by whoever owns it.

pub mod field_deck;

pub use field_deck::FieldDeck;
