//! One task per match.
//!
//! The `MatchActor` exclusively owns its `Match`. Every player intent,
//! connection change and timer expiry arrives as a `Command` on a single
//! queue, so no two engine calls for a room ever run concurrently.
//!
//! ## Timers
//!
//! After each command the actor reconciles its timers against the match:
//!
//! - a reaction timer exists iff a window is open and the turn's action is
//!   done, keyed by the window's epoch
//! - a settle timer exists iff every connected player has taken their
//!   initial peek, keyed by the round
//!
//! Replacing a timer aborts the old task. A fired timer whose key no longer
//! matches the match state is dropped.

use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::CoordinatorConfig;
use super::error::CoordinatorError;
use super::intent::{ActionOutcome, Intent};
use super::message::{MatchEvent, ServerMessage};
use super::task::spawn_named_task;
use crate::core::{ActionError, PlayerId, RoomCode, SessionId};
use crate::engine::{Match, MatchView};

pub(crate) const LOG_TARGET: &str = "cobra::coordinator";

/// Live rooms by code.
pub(crate) type Registry = Mutex<FxHashMap<RoomCode, MatchHandle>>;

type Reply<T> = oneshot::Sender<Result<T, CoordinatorError>>;

pub(crate) enum Command {
    Join {
        name: String,
        session: SessionId,
        reply: Reply<Joined>,
    },
    Rejoin {
        session: SessionId,
        player: PlayerId,
        reply: Reply<Joined>,
    },
    Act {
        player: PlayerId,
        intent: Intent,
        reply: Reply<ActionOutcome>,
    },
    Disconnect {
        session: SessionId,
        reply: Reply<()>,
    },
    Snapshot {
        player: PlayerId,
        reply: Reply<MatchView>,
    },
    TimerFired(Timer),
}

pub(crate) struct Joined {
    player: PlayerId,
    receiver: mpsc::UnboundedReceiver<ServerMessage>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Timer {
    Reaction { epoch: u64 },
    Settle { round: u32 },
}

impl Timer {
    fn label(self) -> &'static str {
        match self {
            Timer::Reaction { .. } => "reaction",
            Timer::Settle { .. } => "settle",
        }
    }
}

/// A seat at a match plus the stream of messages for it.
#[derive(Debug)]
pub struct JoinTicket {
    pub room: RoomCode,
    pub player: PlayerId,
    pub handle: MatchHandle,
    pub receiver: mpsc::UnboundedReceiver<ServerMessage>,
}

/// Cloneable address of a running match.
#[derive(Clone, Debug)]
pub struct MatchHandle {
    room: RoomCode,
    commands: mpsc::Sender<Command>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Join { session, .. } => write!(f, "Join({session})"),
            Command::Rejoin { session, player, .. } => write!(f, "Rejoin({session}, {player})"),
            Command::Act { player, intent, .. } => write!(f, "Act({player}, {})", intent.name()),
            Command::Disconnect { session, .. } => write!(f, "Disconnect({session})"),
            Command::Snapshot { player, .. } => write!(f, "Snapshot({player})"),
            Command::TimerFired(timer) => write!(f, "TimerFired({timer:?})"),
        }
    }
}

impl MatchHandle {
    #[must_use]
    pub fn room(&self) -> &RoomCode {
        &self.room
    }

    /// The actor has stopped or is stopping.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled() || self.commands.is_closed()
    }

    /// Ask the actor to tear the match down.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Take a new seat.
    pub async fn join(&self, name: impl Into<String>, session: SessionId) -> Result<JoinTicket, CoordinatorError> {
        let name = name.into();
        let joined = self.request(|reply| Command::Join { name, session, reply }).await?;
        Ok(self.ticket(joined))
    }

    /// Reclaim an existing seat from a new session.
    pub async fn rejoin(&self, session: SessionId, player: PlayerId) -> Result<JoinTicket, CoordinatorError> {
        let joined = self
            .request(|reply| Command::Rejoin {
                session,
                player,
                reply,
            })
            .await?;
        Ok(self.ticket(joined))
    }

    /// Submit an intent on behalf of `player` and wait for the engine's answer.
    pub async fn act(&self, player: PlayerId, intent: Intent) -> Result<ActionOutcome, CoordinatorError> {
        self.request(|reply| Command::Act { player, intent, reply }).await
    }

    pub async fn disconnect(&self, session: SessionId) -> Result<(), CoordinatorError> {
        self.request(|reply| Command::Disconnect { session, reply }).await
    }

    /// Current projection for `player`.
    pub async fn state_for(&self, player: PlayerId) -> Result<MatchView, CoordinatorError> {
        self.request(|reply| Command::Snapshot { player, reply }).await
    }

    async fn request<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Result<T, CoordinatorError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| CoordinatorError::MatchClosed(self.room.clone()))?;
        response
            .await
            .map_err(|_| CoordinatorError::MatchClosed(self.room.clone()))?
    }

    fn ticket(&self, joined: Joined) -> JoinTicket {
        JoinTicket {
            room: self.room.clone(),
            player: joined.player,
            handle: self.clone(),
            receiver: joined.receiver,
        }
    }
}

#[derive(Debug, Default)]
struct Timers {
    reaction: Option<(u64, JoinHandle<()>)>,
    settle: Option<(u32, JoinHandle<()>)>,
}

impl Timers {
    fn reaction_epoch(&self) -> Option<u64> {
        self.reaction.as_ref().map(|(epoch, _)| *epoch)
    }

    fn settle_round(&self) -> Option<u32> {
        self.settle.as_ref().map(|(round, _)| *round)
    }

    fn set_reaction(&mut self, epoch: u64, handle: JoinHandle<()>) {
        if let Some((_, existing)) = self.reaction.replace((epoch, handle)) {
            existing.abort();
        }
    }

    fn set_settle(&mut self, round: u32, handle: JoinHandle<()>) {
        if let Some((_, existing)) = self.settle.replace((round, handle)) {
            existing.abort();
        }
    }

    fn cancel_reaction(&mut self) {
        if let Some((_, handle)) = self.reaction.take() {
            handle.abort();
        }
    }

    fn cancel_settle(&mut self) {
        if let Some((_, handle)) = self.settle.take() {
            handle.abort();
        }
    }

    fn cancel_all(&mut self) {
        self.cancel_reaction();
        self.cancel_settle();
    }
}

pub(crate) struct MatchActor {
    room: RoomCode,
    game: Match,
    config: CoordinatorConfig,
    commands: mpsc::Receiver<Command>,
    timer_commands: mpsc::WeakSender<Command>,
    subscribers: FxHashMap<PlayerId, mpsc::UnboundedSender<ServerMessage>>,
    timers: Timers,
    cancel: CancellationToken,
    registry: Weak<Registry>,
}

impl MatchActor {
    /// Start the actor for a new, empty match and return its handle.
    pub(crate) fn spawn(room: RoomCode, config: CoordinatorConfig, registry: Weak<Registry>) -> MatchHandle {
        let (commands_tx, commands) = mpsc::channel(config.command_buffer.max(1));
        let cancel = CancellationToken::new();
        let handle = MatchHandle {
            room: room.clone(),
            commands: commands_tx.clone(),
            cancel: cancel.clone(),
        };

        let actor = MatchActor {
            room: room.clone(),
            game: Match::new(room.clone(), config.rules.clone()),
            config,
            commands,
            timer_commands: commands_tx.downgrade(),
            subscribers: FxHashMap::default(),
            timers: Timers::default(),
            cancel,
            registry,
        };
        spawn_named_task(format!("match-{room}"), actor.run());
        handle
    }

    async fn run(mut self) {
        info!(target: LOG_TARGET, room = %self.room, "match opened");
        loop {
            let command = tokio::select! {
                _ = self.cancel.cancelled() => break,
                command = self.commands.recv() => command,
            };
            let Some(command) = command else {
                break;
            };
            debug!(target: LOG_TARGET, room = %self.room, ?command, "command received");
            if !self.handle(command) {
                break;
            }
            self.reconcile_timers();
        }
        self.teardown();
    }

    /// Apply one command. Returns `false` once the match should close.
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Join { name, session, reply } => {
                let _ = reply.send(self.join(name, session));
            }
            Command::Rejoin { session, player, reply } => {
                let _ = reply.send(self.rejoin(session, player));
            }
            Command::Act { player, intent, reply } => {
                let _ = reply.send(self.act(player, intent));
            }
            Command::Disconnect { session, reply } => {
                let _ = reply.send(self.disconnect(&session));
                if self.game.connected_count() == 0 {
                    return false;
                }
            }
            Command::Snapshot { player, reply } => {
                let _ = reply.send(self.game.state_for_player(player).map_err(CoordinatorError::from));
            }
            Command::TimerFired(timer) => self.on_timer(timer),
        }
        true
    }

    fn join(&mut self, name: String, session: SessionId) -> Result<Joined, CoordinatorError> {
        let player = self
            .game
            .add_player(name, session)
            .map_err(|reason| CoordinatorError::JoinRejected {
                room: self.room.clone(),
                reason,
            })?;
        let receiver = self.subscribe(player);
        let name = self.player_name(player);
        info!(target: LOG_TARGET, room = %self.room, player = %player, %name, "player joined");

        let player_count = self.game.players().len();
        self.broadcast(vec![MatchEvent::PlayerJoined {
            player,
            name,
            player_count,
        }]);
        Ok(Joined { player, receiver })
    }

    fn rejoin(&mut self, session: SessionId, player: PlayerId) -> Result<Joined, CoordinatorError> {
        self.game.reconnect_player(session, player)?;
        let receiver = self.subscribe(player);
        let name = self.player_name(player);
        self.broadcast(vec![MatchEvent::PlayerRejoined { player, name }]);
        Ok(Joined { player, receiver })
    }

    fn act(&mut self, player: PlayerId, intent: Intent) -> Result<ActionOutcome, CoordinatorError> {
        let seated = self.game.player(player).ok_or(ActionError::PlayerNotFound(player))?;
        if !seated.is_connected() {
            return Err(ActionError::PlayerDisconnected(player).into());
        }

        let name = intent.name();
        let outcome = intent.apply(&mut self.game, player).map_err(|err| {
            debug!(target: LOG_TARGET, room = %self.room, player = %player, intent = name, %err, "intent rejected");
            err
        })?;

        let events = MatchEvent::from_outcome(&self.game, player, &outcome);
        self.broadcast(events);
        Ok(outcome)
    }

    fn disconnect(&mut self, session: &SessionId) -> Result<(), CoordinatorError> {
        let removed = self.game.remove_player(session)?;
        self.subscribers.remove(&removed.player);

        let mut events = vec![MatchEvent::PlayerDisconnected {
            player: removed.player,
            name: removed.name,
        }];
        events.extend(removed.turn.as_ref().and_then(MatchEvent::from_turn));
        self.broadcast(events);
        Ok(())
    }

    fn on_timer(&mut self, timer: Timer) {
        match timer {
            Timer::Reaction { epoch } => {
                if self.timers.reaction_epoch() == Some(epoch) {
                    self.timers.reaction = None;
                }
                if self.game.timed_reaction_window() != Some(epoch) {
                    warn!(target: LOG_TARGET, room = %self.room, epoch, "stale reaction timer ignored");
                    return;
                }
                match self.game.next_turn() {
                    Ok(turn) => self.broadcast(MatchEvent::from_turn(&turn).into_iter().collect()),
                    Err(err) => warn!(target: LOG_TARGET, room = %self.room, %err, "reaction timeout could not advance"),
                }
            }
            Timer::Settle { round } => {
                if self.timers.settle_round() == Some(round) {
                    self.timers.settle = None;
                }
                if round != self.game.round() || !self.game.initial_peek_complete() {
                    warn!(target: LOG_TARGET, room = %self.room, round, "stale settle timer ignored");
                    return;
                }
                match self.game.start_playing() {
                    Ok(first) => self.broadcast(vec![MatchEvent::PlayPhaseStarted { first }]),
                    Err(err) => warn!(target: LOG_TARGET, room = %self.room, %err, "could not start play"),
                }
            }
        }
    }

    fn reconcile_timers(&mut self) {
        match self.game.timed_reaction_window() {
            Some(epoch) if self.timers.reaction_epoch() == Some(epoch) => {}
            Some(epoch) => {
                let task = self.schedule(self.config.reaction_window(), Timer::Reaction { epoch });
                self.timers.set_reaction(epoch, task);
            }
            None => self.timers.cancel_reaction(),
        }

        if self.game.initial_peek_complete() {
            let round = self.game.round();
            if self.timers.settle_round() != Some(round) {
                let task = self.schedule(self.config.settle_delay(), Timer::Settle { round });
                self.timers.set_settle(round, task);
            }
        } else {
            self.timers.cancel_settle();
        }
    }

    fn schedule(&self, delay: Duration, timer: Timer) -> JoinHandle<()> {
        let commands = self.timer_commands.clone();
        spawn_named_task(format!("match-{}-{}", self.room, timer.label()), async move {
            tokio::time::sleep(delay).await;
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(Command::TimerFired(timer)).await;
            }
        })
    }

    fn subscribe(&mut self, player: PlayerId) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(player, tx);
        rx
    }

    fn player_name(&self, player: PlayerId) -> String {
        self.game
            .player(player)
            .map(|p| p.name().to_string())
            .unwrap_or_default()
    }

    /// Send `events` and then a fresh projection to every subscriber.
    fn broadcast(&mut self, events: Vec<MatchEvent>) {
        let mut gone = Vec::new();
        for (&player, sender) in &self.subscribers {
            let Ok(view) = self.game.state_for_player(player) else {
                continue;
            };
            let delivered = events
                .iter()
                .cloned()
                .map(ServerMessage::Event)
                .chain(std::iter::once(ServerMessage::State(Box::new(view))))
                .all(|message| sender.send(message).is_ok());
            if !delivered {
                gone.push(player);
            }
        }
        for player in gone {
            warn!(target: LOG_TARGET, room = %self.room, player = %player, "subscriber dropped");
            self.subscribers.remove(&player);
        }
    }

    fn teardown(&mut self) {
        self.timers.cancel_all();
        self.cancel.cancel();
        self.subscribers.clear();
        if let Some(registry) = self.registry.upgrade() {
            let mut rooms = registry.lock();
            if rooms.get(&self.room).is_some_and(MatchHandle::is_closed) {
                rooms.remove(&self.room);
            }
        }
        info!(target: LOG_TARGET, room = %self.room, round = self.game.round(), "match closed");
    }
}
