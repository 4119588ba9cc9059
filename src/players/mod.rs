//! Seated players and the views of their hands.

pub mod player;

pub use player::{HandSlotView, Player, PublicPlayerView};
