//! Structured rejection reasons for engine operations.
//!
//! Every mutating operation validates its preconditions first and returns one
//! of these without touching match state.

use thiserror::Error;

use super::ids::{PlayerId, SessionId};
use crate::cards::PowerKind;
use crate::engine::Phase;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("no player bound to session {0}")]
    UnknownSession(SessionId),

    #[error("player {0} is disconnected")]
    PlayerDisconnected(PlayerId),

    #[error("not your turn")]
    NotYourTurn,

    #[error("action not allowed during {actual}")]
    WrongPhase { actual: Phase },

    #[error("need at least {required} connected players, have {present}")]
    NotEnoughPlayers { required: usize, present: usize },

    #[error("table is full ({max} seats)")]
    TableFull { max: usize },

    #[error("game already in progress")]
    GameInProgress,

    #[error("invalid card index {index} for a hand of {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("must pick {expected} distinct cards")]
    InvalidPeekSelection { expected: usize },

    #[error("initial peek already taken")]
    AlreadyPeeked,

    #[error("already drew a card this turn")]
    AlreadyDrawn,

    #[error("no card drawn")]
    NoCardDrawn,

    #[error("this turn's action has already been taken")]
    TurnAlreadyResolved,

    #[error("finish the drawn card or pending power before ending the turn")]
    TurnUnresolved,

    #[error("this card has no power")]
    NoPower,

    #[error("queen swap requires {required}+ connected players, have {connected}")]
    QueenSwapNeedsPlayers { required: usize, connected: usize },

    #[error("no {expected} power pending")]
    NoPendingPower { expected: PowerKind },

    #[error("no power pending")]
    NoPowerPending,

    #[error("must target a different player")]
    SamePlayer,

    #[error("card {index} was not one of the peeked cards")]
    NotPeeked { index: usize },

    #[error("no snap available right now")]
    NoReactionWindow,

    #[error("no discard to match against")]
    NoDiscard,

    #[error("cobra already called")]
    CobraAlreadyCalled,

    #[error("deck must be a full 52 with no repeated card")]
    DeckMismatch,
}
