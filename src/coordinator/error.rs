use thiserror::Error;

use crate::core::{ActionError, RoomCode};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    #[error("room {0} not found")]
    RoomNotFound(RoomCode),

    #[error("match {0} has closed")]
    MatchClosed(RoomCode),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("cannot join room {room}: {reason}")]
    JoinRejected { room: RoomCode, reason: ActionError },
}
