//! The `Match` state and its lifecycle: seating, dealing, initial peek.
//!
//! Turn actions, powers, reactions and round arbitration live in sibling
//! modules as further `impl Match` blocks.
//!
//! ## Card conservation
//!
//! At every observable instant
//! `draw pile + discard pile + Σ hands + held card == 52`, where the held card
//! is a drawn card or a power card awaiting resolution (see `TurnStep`).

use tracing::{debug, info};

use super::outcome::{MultiPeekOutcome, PeekedCard, RemoveOutcome, RoundSummary, StartOutcome, TurnOutcome};
use super::phase::{Phase, TurnStep};
use crate::cards::{Card, Deck, DECK_SIZE};
use crate::core::{ActionError, GameRng, MatchConfig, PlayerId, RoomCode, SessionId};
use crate::players::Player;

pub(crate) const LOG_TARGET: &str = "cobra::engine";

/// Who called cobra and from which seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CobraCall {
    pub player: PlayerId,
    pub seat: usize,
}

/// Authoritative state of one room's game.
///
/// All operations are synchronous and either fully apply or return an
/// `ActionError` without mutating anything.
#[derive(Clone, Debug)]
pub struct Match {
    pub(crate) room: RoomCode,
    pub(crate) config: MatchConfig,
    pub(crate) rng: GameRng,
    pub(crate) players: Vec<Player>,
    pub(crate) deck: Deck,
    pub(crate) phase: Phase,
    pub(crate) current: usize,
    pub(crate) step: TurnStep,
    pub(crate) caller: Option<CobraCall>,
    pub(crate) turns_since_call: usize,
    pub(crate) last_discard: Option<Card>,
    pub(crate) reaction_open: bool,
    pub(crate) reaction_epoch: u64,
    pub(crate) round: u32,
    pub(crate) host: Option<PlayerId>,
    pub(crate) next_player_id: u32,
    pub(crate) last_round: Option<RoundSummary>,
}

impl Match {
    /// Create an empty match in the `Waiting` phase.
    #[must_use]
    pub fn new(room: RoomCode, config: MatchConfig) -> Self {
        let rng = GameRng::from_seed_option(config.seed);
        Self {
            room,
            config,
            rng,
            players: Vec::new(),
            deck: Deck::new(),
            phase: Phase::Waiting,
            current: 0,
            step: TurnStep::Idle,
            caller: None,
            turns_since_call: 0,
            last_discard: None,
            reaction_open: false,
            reaction_epoch: 0,
            round: 0,
            host: None,
            next_player_id: 0,
            last_round: None,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn room(&self) -> &RoomCode {
        &self.room
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn host(&self) -> Option<PlayerId> {
        self.host
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    #[must_use]
    pub fn player_by_session(&self, session: &SessionId) -> Option<&Player> {
        self.players.iter().find(|p| p.session() == session)
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Seat index whose turn it is.
    #[must_use]
    pub fn current_seat(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current)
    }

    #[must_use]
    pub fn turn_step(&self) -> &TurnStep {
        &self.step
    }

    #[must_use]
    pub fn caller(&self) -> Option<CobraCall> {
        self.caller
    }

    #[must_use]
    pub fn turns_since_call(&self) -> usize {
        self.turns_since_call
    }

    #[must_use]
    pub fn last_discard(&self) -> Option<Card> {
        self.last_discard
    }

    #[must_use]
    pub fn is_reaction_open(&self) -> bool {
        self.reaction_open
    }

    /// Bumped every time a reaction window (re)opens.
    #[must_use]
    pub fn reaction_epoch(&self) -> u64 {
        self.reaction_epoch
    }

    /// Epoch of an open window that is only waiting on reactions, if any.
    ///
    /// This is the window a reaction timer should be armed for. Only a turn
    /// whose action is done is timed: a window opened by a steal before the
    /// holder has drawn, or one that coexists with an unresolved power, is not.
    #[must_use]
    pub fn timed_reaction_window(&self) -> Option<u64> {
        (self.phase.is_in_play() && self.reaction_open && self.step == TurnStep::Resolved)
            .then_some(self.reaction_epoch)
    }

    #[must_use]
    pub fn last_round(&self) -> Option<&RoundSummary> {
        self.last_round.as_ref()
    }

    #[must_use]
    pub fn connected_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_connected()).count()
    }

    /// Every card currently accounted for. Always `DECK_SIZE` once dealt.
    #[must_use]
    pub fn card_total(&self) -> usize {
        self.deck.remaining()
            + self.deck.discard_count()
            + self.players.iter().map(Player::hand_len).sum::<usize>()
            + usize::from(self.step.held_card().is_some())
    }

    // === Seating ===

    /// Seat a new player. Only between rounds.
    pub fn add_player(&mut self, name: impl Into<String>, session: SessionId) -> Result<PlayerId, ActionError> {
        if !self.phase.is_between_rounds() {
            return Err(ActionError::GameInProgress);
        }
        let max = self.config.seat_limit();
        if self.players.len() >= max {
            return Err(ActionError::TableFull { max });
        }

        let id = PlayerId::new(self.next_player_id);
        self.next_player_id += 1;
        let player = Player::new(id, name, session);
        debug!(target: LOG_TARGET, room = %self.room, player = %id, name = player.name(), "player seated");
        self.players.push(player);
        self.host.get_or_insert(id);
        Ok(id)
    }

    /// Mark the player bound to `session` as disconnected.
    ///
    /// Their seat is kept. If it was their turn during play, the turn is
    /// forced forward.
    pub fn remove_player(&mut self, session: &SessionId) -> Result<RemoveOutcome, ActionError> {
        let seat = self
            .players
            .iter()
            .position(|p| p.session() == session)
            .ok_or_else(|| ActionError::UnknownSession(session.clone()))?;

        let player = &mut self.players[seat];
        player.disconnect();
        let (id, name) = (player.id(), player.name().to_string());
        info!(target: LOG_TARGET, room = %self.room, player = %id, "player disconnected");

        let turn = if self.phase.is_in_play() && seat == self.current {
            Some(self.next_turn()?)
        } else {
            None
        };

        Ok(RemoveOutcome { player: id, name, turn })
    }

    /// Rebind a seat to a new session.
    pub fn reconnect_player(&mut self, session: SessionId, player: PlayerId) -> Result<PlayerId, ActionError> {
        let seat = self.seat_of(player)?;
        self.players[seat].reconnect(session);
        info!(target: LOG_TARGET, room = %self.room, player = %player, "player reconnected");
        Ok(player)
    }

    // === Round lifecycle ===

    /// Deal a new round from a freshly shuffled deck.
    pub fn start_game(&mut self) -> Result<StartOutcome, ActionError> {
        self.check_can_deal()?;
        let mut deck = Deck::new();
        deck.shuffle(&mut self.rng);
        Ok(self.deal(deck))
    }

    /// Deal a new round from a prepared full deck (see `Deck::stacked`).
    pub fn start_game_with_deck(&mut self, deck: Deck) -> Result<StartOutcome, ActionError> {
        self.check_can_deal()?;
        if deck.remaining() != DECK_SIZE || deck.discard_count() != 0 {
            return Err(ActionError::DeckMismatch);
        }
        Ok(self.deal(deck))
    }

    fn check_can_deal(&self) -> Result<(), ActionError> {
        if !self.phase.is_between_rounds() {
            return Err(ActionError::GameInProgress);
        }
        let present = self.connected_count();
        if present < self.config.min_players {
            return Err(ActionError::NotEnoughPlayers {
                required: self.config.min_players,
                present,
            });
        }
        Ok(())
    }

    fn deal(&mut self, deck: Deck) -> StartOutcome {
        self.round += 1;
        self.deck = deck;
        self.phase = Phase::InitialPeek;
        self.step = TurnStep::Idle;
        self.caller = None;
        self.turns_since_call = 0;
        self.last_discard = None;
        self.reaction_open = false;
        self.last_round = None;

        for player in &mut self.players {
            player.reset();
            for _ in 0..self.config.hand_size {
                if let Some(card) = self.deck.draw(&mut self.rng) {
                    player.add_card(card);
                }
            }
        }

        if let Some(card) = self.deck.draw(&mut self.rng) {
            self.deck.discard(card);
        }

        self.current = self.first_connected_seat().unwrap_or(0);

        info!(
            target: LOG_TARGET,
            room = %self.room,
            round = self.round,
            players = self.players.len(),
            "round dealt"
        );
        StartOutcome { round: self.round }
    }

    /// Look at the chosen own cards before play begins. Once per round.
    pub fn initial_peek(&mut self, player: PlayerId, indices: &[usize]) -> Result<MultiPeekOutcome, ActionError> {
        self.require_phase(Phase::InitialPeek)?;
        let seat = self.seat_of(player)?;
        let expected = self.config.initial_peek_count;
        let peeker = &self.players[seat];

        if peeker.known_count() > 0 {
            return Err(ActionError::AlreadyPeeked);
        }
        if !distinct_selection(indices, expected) {
            return Err(ActionError::InvalidPeekSelection { expected });
        }
        let cards = indices
            .iter()
            .map(|&index| {
                peeker.card_at(index).map(|card| PeekedCard {
                    player,
                    index,
                    card,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let peeker = &mut self.players[seat];
        for &index in indices {
            peeker.mark_known(index);
        }
        debug!(target: LOG_TARGET, room = %self.room, player = %player, "initial peek taken");
        Ok(MultiPeekOutcome { cards })
    }

    /// Every connected player has taken their initial peek.
    ///
    /// The coordinator polls this to schedule `start_playing`.
    #[must_use]
    pub fn initial_peek_complete(&self) -> bool {
        self.phase == Phase::InitialPeek
            && self.connected_count() > 0
            && self
                .players
                .iter()
                .filter(|p| p.is_connected())
                .all(|p| p.known_count() >= self.config.initial_peek_count)
    }

    /// Leave the initial peek and give the first connected seat the turn.
    pub fn start_playing(&mut self) -> Result<PlayerId, ActionError> {
        self.require_phase(Phase::InitialPeek)?;
        let seat = self.first_connected_seat().ok_or(ActionError::NotEnoughPlayers {
            required: self.config.min_players,
            present: 0,
        })?;

        self.phase = Phase::Playing;
        self.current = seat;
        self.step = TurnStep::Idle;
        let id = self.players[seat].id();
        info!(target: LOG_TARGET, room = %self.room, first = %id, "play phase started");
        Ok(id)
    }

    // === Internal helpers ===

    pub(crate) fn seat_of(&self, player: PlayerId) -> Result<usize, ActionError> {
        self.players
            .iter()
            .position(|p| p.id() == player)
            .ok_or(ActionError::PlayerNotFound(player))
    }

    pub(crate) fn connected_seat_of(&self, player: PlayerId) -> Result<usize, ActionError> {
        let seat = self.seat_of(player)?;
        if !self.players[seat].is_connected() {
            return Err(ActionError::PlayerDisconnected(player));
        }
        Ok(seat)
    }

    pub(crate) fn require_phase(&self, expected: Phase) -> Result<(), ActionError> {
        if self.phase != expected {
            return Err(ActionError::WrongPhase { actual: self.phase });
        }
        Ok(())
    }

    pub(crate) fn require_in_play(&self) -> Result<(), ActionError> {
        if !self.phase.is_in_play() {
            return Err(ActionError::WrongPhase { actual: self.phase });
        }
        Ok(())
    }

    /// The acting player holds the turn during play. Returns their seat.
    pub(crate) fn require_turn(&self, player: PlayerId) -> Result<usize, ActionError> {
        self.require_in_play()?;
        let seat = self.seat_of(player)?;
        if seat != self.current {
            return Err(ActionError::NotYourTurn);
        }
        Ok(seat)
    }

    pub(crate) fn first_connected_seat(&self) -> Option<usize> {
        self.players.iter().position(Player::is_connected)
    }

    /// Put a card from play onto the discard pile. Does not open a window.
    pub(crate) fn discard_from_play(&mut self, card: Card) {
        self.deck.discard(card);
        self.last_discard = Some(card);
    }

    pub(crate) fn open_reaction_window(&mut self) {
        self.reaction_open = true;
        self.reaction_epoch += 1;
    }

    /// Deal up to `count` face-down penalty cards. Returns how many arrived.
    pub(crate) fn deal_penalty(&mut self, seat: usize, count: usize) -> usize {
        let mut dealt = 0;
        for _ in 0..count {
            match self.deck.draw(&mut self.rng) {
                Some(card) => {
                    self.players[seat].add_card(card);
                    dealt += 1;
                }
                None => break,
            }
        }
        dealt
    }

    /// Remove a slot from a seat, keeping any pending power aligned.
    pub(crate) fn remove_slot(&mut self, seat: usize, index: usize) -> Option<Card> {
        let card = self.players[seat].remove_card(index)?;
        if seat == self.current {
            if let TurnStep::Power(pending) = &mut self.step {
                pending.slot_removed(index);
            }
        }
        Some(card)
    }

    /// Replace a slot's content, keeping any pending power aligned.
    pub(crate) fn replace_slot(&mut self, seat: usize, index: usize, card: Card) -> Option<Card> {
        let old = self.players[seat].swap_card(index, card)?;
        if seat == self.current {
            if let TurnStep::Power(pending) = &mut self.step {
                pending.slot_replaced(index);
            }
        }
        Some(old)
    }

    /// Exchange two slots held by different seats. Both become unknown to their owners.
    pub(crate) fn exchange_slots(&mut self, a: (usize, usize), b: (usize, usize)) -> Result<(), ActionError> {
        let first = self.players[a.0].card_at(a.1)?;
        let second = self.players[b.0].card_at(b.1)?;
        self.players[a.0].swap_card(a.1, second);
        self.players[b.0].swap_card(b.1, first);
        Ok(())
    }

    pub(crate) fn turn_outcome_after_advance(&self) -> TurnOutcome {
        match self.current_player() {
            Some(player) => TurnOutcome::Advanced {
                next: player.id(),
                phase: self.phase,
            },
            None => TurnOutcome::NoConnectedPlayers,
        }
    }
}

fn distinct_selection(indices: &[usize], expected: usize) -> bool {
    indices.len() == expected && indices.iter().enumerate().all(|(i, index)| !indices[..i].contains(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seated(count: usize) -> (Match, Vec<PlayerId>) {
        let mut game = Match::new(RoomCode::new("TEST"), MatchConfig::default().with_seed(42));
        let ids = (0..count)
            .map(|i| game.add_player(format!("p{i}"), SessionId::new(format!("s{i}"))).unwrap())
            .collect();
        (game, ids)
    }

    #[test]
    fn test_new_match_is_waiting() {
        let (game, _) = seated(0);
        assert_eq!(game.phase(), Phase::Waiting);
        assert_eq!(game.round(), 0);
        assert!(game.host().is_none());
    }

    #[test]
    fn test_first_player_is_host() {
        let (game, ids) = seated(3);
        assert_eq!(game.host(), Some(ids[0]));
        assert_eq!(ids, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    }

    #[test]
    fn test_start_requires_two_players() {
        let (mut game, _) = seated(1);
        assert_eq!(
            game.start_game(),
            Err(ActionError::NotEnoughPlayers { required: 2, present: 1 })
        );
        assert_eq!(game.phase(), Phase::Waiting);
    }

    #[test]
    fn test_start_deals_four_and_flips_one() {
        let (mut game, _) = seated(3);
        let outcome = game.start_game().unwrap();

        assert_eq!(outcome.round, 1);
        assert_eq!(game.phase(), Phase::InitialPeek);
        for player in game.players() {
            assert_eq!(player.hand_len(), 4);
            assert_eq!(player.known_count(), 0);
        }
        assert_eq!(game.deck().discard_count(), 1);
        assert_eq!(game.deck().remaining(), 52 - 12 - 1);
        assert_eq!(game.card_total(), DECK_SIZE);
        assert_eq!(game.last_discard(), None);
        assert_eq!(game.current_seat(), 0);
    }

    #[test]
    fn test_cannot_join_or_restart_mid_round() {
        let (mut game, _) = seated(2);
        game.start_game().unwrap();

        assert_eq!(
            game.add_player("late", SessionId::new("late")),
            Err(ActionError::GameInProgress)
        );
        assert_eq!(game.start_game(), Err(ActionError::GameInProgress));
    }

    #[test]
    fn test_table_full() {
        let mut game = Match::new(RoomCode::new("FULL"), MatchConfig::default().with_max_players(2));
        game.add_player("a", SessionId::new("a")).unwrap();
        game.add_player("b", SessionId::new("b")).unwrap();
        assert_eq!(
            game.add_player("c", SessionId::new("c")),
            Err(ActionError::TableFull { max: 2 })
        );
    }

    #[test]
    fn test_initial_peek_marks_two_known() {
        let (mut game, ids) = seated(2);
        game.start_game().unwrap();

        let outcome = game.initial_peek(ids[0], &[0, 3]).unwrap();

        assert_eq!(outcome.cards.len(), 2);
        assert_eq!(outcome.cards[1].index, 3);
        assert_eq!(Some(outcome.cards[1].card), game.players()[0].hand().get(3).copied());
        assert_eq!(game.players()[0].known_indices(), vec![0, 3]);
        assert!(!game.initial_peek_complete());

        game.initial_peek(ids[1], &[1, 2]).unwrap();
        assert!(game.initial_peek_complete());
    }

    #[test]
    fn test_initial_peek_rejections() {
        let (mut game, ids) = seated(2);
        assert_eq!(
            game.initial_peek(ids[0], &[0, 1]),
            Err(ActionError::WrongPhase { actual: Phase::Waiting })
        );

        game.start_game().unwrap();
        assert_eq!(
            game.initial_peek(ids[0], &[1, 1]),
            Err(ActionError::InvalidPeekSelection { expected: 2 })
        );
        assert_eq!(
            game.initial_peek(ids[0], &[0]),
            Err(ActionError::InvalidPeekSelection { expected: 2 })
        );
        assert_eq!(
            game.initial_peek(ids[0], &[0, 7]),
            Err(ActionError::InvalidIndex { index: 7, len: 4 })
        );
        assert_eq!(game.players()[0].known_count(), 0);

        game.initial_peek(ids[0], &[0, 1]).unwrap();
        assert_eq!(game.initial_peek(ids[0], &[2, 3]), Err(ActionError::AlreadyPeeked));
        assert_eq!(
            game.initial_peek(PlayerId::new(99), &[0, 1]),
            Err(ActionError::PlayerNotFound(PlayerId::new(99)))
        );
    }

    #[test]
    fn test_start_playing_skips_disconnected_first_seat() {
        let (mut game, ids) = seated(3);
        game.start_game().unwrap();
        game.remove_player(&SessionId::new("s0")).unwrap();

        let first = game.start_playing().unwrap();

        assert_eq!(first, ids[1]);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.start_playing(), Err(ActionError::WrongPhase { actual: Phase::Playing }));
    }

    #[test]
    fn test_disconnected_player_not_required_for_peek() {
        let (mut game, ids) = seated(3);
        game.start_game().unwrap();
        game.initial_peek(ids[0], &[0, 1]).unwrap();
        game.initial_peek(ids[1], &[0, 1]).unwrap();
        assert!(!game.initial_peek_complete());

        game.remove_player(&SessionId::new("s2")).unwrap();
        assert!(game.initial_peek_complete());
    }

    #[test]
    fn test_reconnect_rebinds_session() {
        let (mut game, ids) = seated(2);
        game.remove_player(&SessionId::new("s1")).unwrap();
        assert_eq!(game.connected_count(), 1);

        game.reconnect_player(SessionId::new("s1-new"), ids[1]).unwrap();

        assert_eq!(game.connected_count(), 2);
        assert_eq!(game.player_by_session(&SessionId::new("s1-new")).map(Player::id), Some(ids[1]));
        assert_eq!(
            game.remove_player(&SessionId::new("s1")),
            Err(ActionError::UnknownSession(SessionId::new("s1")))
        );
    }

    #[test]
    fn test_stacked_deck_must_be_fresh() {
        let (mut game, _) = seated(2);
        let mut deck = Deck::new();
        let mut rng = GameRng::new(1);
        deck.draw(&mut rng);
        assert_eq!(game.start_game_with_deck(deck), Err(ActionError::DeckMismatch));
        assert_eq!(game.phase(), Phase::Waiting);
    }

    #[test]
    fn test_timed_window_requires_resolved_turn() {
        use crate::cards::{Rank, Suit};
        let c = Card::new;
        let (mut game, ids) = seated(2);
        let deck = Deck::stacked(vec![
            c(Rank::Ace, Suit::Spades),
            c(Rank::Two, Suit::Spades),
            c(Rank::Three, Suit::Spades),
            c(Rank::Four, Suit::Spades),
            c(Rank::Five, Suit::Hearts),
            c(Rank::Two, Suit::Hearts),
            c(Rank::Three, Suit::Hearts),
            c(Rank::Four, Suit::Hearts),
            c(Rank::Ten, Suit::Clubs),
            c(Rank::Five, Suit::Diamonds),
            c(Rank::Six, Suit::Diamonds),
        ])
        .unwrap();
        game.start_game_with_deck(deck).unwrap();
        assert_eq!(game.timed_reaction_window(), None);
        game.initial_peek(ids[0], &[0, 1]).unwrap();
        game.initial_peek(ids[1], &[0, 1]).unwrap();
        game.start_playing().unwrap();

        game.draw_card(ids[0]).unwrap();
        assert_eq!(game.timed_reaction_window(), None);
        game.discard_drawn_card(ids[0]).unwrap();
        assert_eq!(game.timed_reaction_window(), Some(game.reaction_epoch()));

        game.end_turn(ids[0]).unwrap();
        assert_eq!(game.timed_reaction_window(), None);

        // A steal while p1 is still idle opens a window but does not time it.
        game.steal_card(ids[0], ids[1], 0, 0).unwrap();
        assert!(game.is_reaction_open());
        assert_eq!(game.turn_step(), &TurnStep::Idle);
        assert_eq!(game.timed_reaction_window(), None);

        game.draw_card(ids[1]).unwrap();
        game.discard_drawn_card(ids[1]).unwrap();
        assert_eq!(game.timed_reaction_window(), Some(game.reaction_epoch()));
    }
}
