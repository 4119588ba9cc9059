//! The match engine.
//!
//! `Match` owns the deck and the seated players and exposes every game
//! action as a synchronous method returning `Result<Outcome, ActionError>`.
//! It never blocks and never schedules anything itself; the coordinator
//! drives timers and serializes calls.
//!
//! ## Layout
//!
//! - `game`: state, seating, dealing and initial peek
//! - `turn`: draw, swap, discard, double drop, cobra, turn advancement
//! - `powers`: pending power resolution
//! - `reactions`: snap and steal
//! - `round`: arbitration and scoring
//! - `view`: per-viewer projection

pub mod game;
pub mod outcome;
pub mod phase;
pub mod powers;
pub mod reactions;
pub mod round;
pub mod turn;
pub mod view;

pub use game::{CobraCall, Match};
pub use outcome::{
    CardsSwapped, CobraOutcome, DiscardOutcome, DoubleDropOutcome, DrawOutcome, MultiPeekOutcome, PeekOutcome,
    PeekedCard, PowerOutcome, RemoveOutcome, RoundEnd, RoundResult, RoundSummary, SlotRef, SnapOutcome,
    StartOutcome, StealOutcome, SwapOutcome, TurnOutcome,
};
pub use phase::{BlackJackStep, PendingPower, Phase, TurnStep};
pub use round::{arbitrate, Arbitration};
pub use view::{MatchView, SeatView, TurnHolder};
