//! Async front of the engine: one actor task per room.
//!
//! ```text
//! Lobby ── create/join ──► MatchHandle ── Command ──► MatchActor ──► Match
//!                                                        │
//!                          per-player ServerMessage ◄────┘
//! ```
//!
//! The lobby hands out `JoinTicket`s carrying the player's id and message
//! receiver. All intents go through `MatchHandle::act`; the actor answers
//! the caller directly and pushes events plus fresh projections to every
//! connected player.

pub mod actor;
pub mod config;
pub mod error;
pub mod intent;
pub mod lobby;
pub mod message;
mod task;

pub use actor::{JoinTicket, MatchHandle};
pub use config::CoordinatorConfig;
pub use error::CoordinatorError;
pub use intent::{ActionOutcome, Intent};
pub use lobby::{Lobby, ROOM_CODE_ALPHABET, ROOM_CODE_LEN};
pub use message::{MatchEvent, ServerMessage};
