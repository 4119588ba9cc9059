//! Room registry and room codes.

use std::sync::Arc;

use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use super::actor::{JoinTicket, MatchActor, MatchHandle, Registry};
use super::config::CoordinatorConfig;
use super::error::CoordinatorError;
use crate::core::{PlayerId, RoomCode, SessionId};

const LOG_TARGET: &str = "cobra::lobby";

/// Room codes avoid look-alike characters (no I, O, 0 or 1).
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const ROOM_CODE_LEN: usize = 4;

/// Creates matches and routes joins to them by room code.
///
/// Each room runs its own actor; the lobby only holds handles. A room
/// removes itself once its last connected player leaves.
#[derive(Debug)]
pub struct Lobby {
    config: CoordinatorConfig,
    rooms: Arc<Registry>,
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}

impl Lobby {
    #[must_use]
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            config,
            rooms: Arc::new(Registry::new(FxHashMap::default())),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Open a new room and seat its creator as host.
    pub async fn create_room(
        &self,
        name: impl Into<String>,
        session: SessionId,
    ) -> Result<JoinTicket, CoordinatorError> {
        let handle = {
            let mut rooms = self.rooms.lock();
            let mut rng = rand::thread_rng();
            let code = loop {
                let code = generate_room_code(&mut rng);
                if !rooms.contains_key(&code) {
                    break code;
                }
            };
            let handle = MatchActor::spawn(code.clone(), self.config.clone(), Arc::downgrade(&self.rooms));
            rooms.insert(code, handle.clone());
            handle
        };
        info!(target: LOG_TARGET, room = %handle.room(), "room created");
        match handle.join(name, session).await {
            Ok(ticket) => Ok(ticket),
            Err(err) => {
                // Nobody holds a seat, so no disconnect will ever close it.
                handle.close();
                let mut rooms = self.rooms.lock();
                if rooms.get(handle.room()).is_some_and(MatchHandle::is_closed) {
                    rooms.remove(handle.room());
                }
                warn!(target: LOG_TARGET, room = %handle.room(), error = %err, "creator could not join, room closed");
                Err(err)
            }
        }
    }

    /// Take a seat in an existing room. The code is case-insensitive.
    pub async fn join_room(
        &self,
        code: &str,
        name: impl Into<String>,
        session: SessionId,
    ) -> Result<JoinTicket, CoordinatorError> {
        self.room(code)?.join(name, session).await
    }

    /// Reclaim a seat after a dropped connection.
    pub async fn rejoin(&self, code: &str, session: SessionId, player: PlayerId) -> Result<JoinTicket, CoordinatorError> {
        self.room(code)?.rejoin(session, player).await
    }

    /// Handle for a live room.
    pub fn room(&self, code: &str) -> Result<MatchHandle, CoordinatorError> {
        let code = RoomCode::new(code);
        self.rooms
            .lock()
            .get(&code)
            .filter(|handle| !handle.is_closed())
            .cloned()
            .ok_or(CoordinatorError::RoomNotFound(code))
    }

    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.lock().len()
    }

    /// Close every room.
    pub fn shutdown(&self) {
        let rooms: Vec<MatchHandle> = self.rooms.lock().drain().map(|(_, handle)| handle).collect();
        for handle in &rooms {
            handle.close();
        }
        info!(target: LOG_TARGET, closed = rooms.len(), "lobby shut down");
    }
}

fn generate_room_code<R: Rng>(rng: &mut R) -> RoomCode {
    let code: String = (0..ROOM_CODE_LEN)
        .map(|_| char::from(ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())]))
        .collect();
    RoomCode::new(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_room_code_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let code = generate_room_code(&mut rng);
            assert_eq!(code.as_str().len(), ROOM_CODE_LEN);
            assert!(code.as_str().bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_unknown_room() {
        let lobby = Lobby::default();
        assert_eq!(
            lobby.room("zzzz").unwrap_err(),
            CoordinatorError::RoomNotFound(RoomCode::new("ZZZZ"))
        );
    }
}
