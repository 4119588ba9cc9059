//! # cobra-engine
//!
//! Authoritative server-side engine for Cobra, a real-time memory and
//! matching card game. Players hold face-down hands, race to discard
//! matching ranks, trigger powers from special ranks and end a round by
//! calling "cobra".
//!
//! ## Design Principles
//!
//! 1. **Hidden information stays on the server**: players only ever receive
//!    `MatchView` projections built for them.
//!
//! 2. **Validate, then mutate**: every engine operation checks all of its
//!    preconditions and returns an `ActionError` before touching state.
//!
//! 3. **One owner per match**: the engine is synchronous; the coordinator
//!    runs each match on its own actor task and owns all timers.
//!
//! ## Modules
//!
//! - `core`: ids, RNG, rules configuration, errors
//! - `cards`: card values and powers, the deck
//! - `players`: hands, knowledge masks, scores
//! - `engine`: the `Match` state machine
//! - `coordinator`: per-room actors, lobby, timers, outbound messages
//! - `telemetry`: tracing setup

pub mod core;
pub mod cards;
pub mod players;
pub mod engine;
pub mod coordinator;
pub mod telemetry;

pub use crate::core::{ActionError, GameRng, GameRngState, MatchConfig, PlayerId, RoomCode, SessionId};

pub use crate::cards::{Card, Deck, PowerKind, Rank, Suit, DECK_SIZE};

pub use crate::players::{HandSlotView, Player, PublicPlayerView};

pub use crate::engine::{
    arbitrate, Arbitration, BlackJackStep, CardsSwapped, CobraCall, CobraOutcome, DiscardOutcome,
    DoubleDropOutcome, DrawOutcome, Match, MatchView, MultiPeekOutcome, PeekOutcome, PeekedCard, PendingPower,
    Phase, PowerOutcome, RemoveOutcome, RoundEnd, RoundResult, RoundSummary, SeatView, SlotRef, SnapOutcome,
    StartOutcome, StealOutcome, SwapOutcome, TurnHolder, TurnOutcome, TurnStep,
};

pub use crate::coordinator::{
    ActionOutcome, CoordinatorConfig, CoordinatorError, Intent, JoinTicket, Lobby, MatchEvent, MatchHandle,
    ServerMessage,
};
