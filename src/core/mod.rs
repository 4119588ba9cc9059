//! Core building blocks: identifiers, RNG, rules configuration, errors.
//!
//! Nothing in here knows about turns or powers; the engine layers those on top.

pub mod ids;
pub mod rng;
pub mod config;
pub mod error;

pub use ids::{PlayerId, RoomCode, SessionId};
pub use rng::{GameRng, GameRngState};
pub use config::MatchConfig;
pub use error::ActionError;
