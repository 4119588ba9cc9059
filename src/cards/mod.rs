//! Card model: identity, score values, powers and the deck.
//!
//! - `Card`: immutable `(rank, suit)` value with `value()` and `power()`
//! - `Deck`: draw pile and discard pile with discard reclamation

pub mod card;
pub mod deck;

pub use card::{Card, PowerKind, Rank, Suit};
pub use deck::{Deck, DECK_SIZE};
