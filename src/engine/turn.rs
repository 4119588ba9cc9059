//! Turn holder actions: draw, then swap / discard / power / double drop,
//! plus cobra calls and turn advancement.

use tracing::{debug, info};

use super::game::{CobraCall, Match, LOG_TARGET};
use super::outcome::{
    CobraOutcome, DiscardOutcome, DoubleDropOutcome, DrawOutcome, PowerOutcome, RoundEnd, SwapOutcome, TurnOutcome,
};
use super::phase::{PendingPower, Phase, TurnStep};
use crate::cards::{Card, PowerKind};
use crate::core::{ActionError, PlayerId};

impl Match {
    /// Draw the next card. Only from an idle turn.
    ///
    /// If neither pile can supply a card the round ends on the spot.
    pub fn draw_card(&mut self, player: PlayerId) -> Result<DrawOutcome, ActionError> {
        self.require_turn(player)?;
        match self.step {
            TurnStep::Idle => {}
            TurnStep::Drawn(_) | TurnStep::Power(_) => return Err(ActionError::AlreadyDrawn),
            TurnStep::Resolved => return Err(ActionError::TurnAlreadyResolved),
        }

        self.reaction_open = false;
        let Some(card) = self.deck.draw(&mut self.rng) else {
            info!(target: LOG_TARGET, room = %self.room, "deck exhausted, ending round");
            let summary = self.end_round(RoundEnd::DeckExhausted);
            return Ok(DrawOutcome::Exhausted { summary });
        };

        self.step = TurnStep::Drawn(card);
        debug!(target: LOG_TARGET, room = %self.room, player = %player, %card, "card drawn");
        Ok(DrawOutcome::Drawn {
            card,
            power: card.power(),
        })
    }

    /// Put the drawn card into hand slot `index` and discard what was there.
    ///
    /// The player chose this placement, so the slot becomes known to them.
    pub fn swap_with_hand(&mut self, player: PlayerId, index: usize) -> Result<SwapOutcome, ActionError> {
        let (seat, drawn) = self.require_drawn(player)?;
        self.players[seat].card_at(index)?;

        let Some(discarded) = self.players[seat].swap_card(index, drawn) else {
            return Err(ActionError::InvalidIndex {
                index,
                len: self.players[seat].hand_len(),
            });
        };
        self.players[seat].mark_known(index);
        self.finish_action(discarded);

        debug!(target: LOG_TARGET, room = %self.room, player = %player, index, card = %discarded, "swapped with hand");
        Ok(SwapOutcome { discarded, index })
    }

    /// Discard the drawn card unused.
    pub fn discard_drawn_card(&mut self, player: PlayerId) -> Result<DiscardOutcome, ActionError> {
        let (_, drawn) = self.require_drawn(player)?;
        self.finish_action(drawn);
        debug!(target: LOG_TARGET, room = %self.room, player = %player, card = %drawn, "drawn card discarded");
        Ok(DiscardOutcome { discarded: drawn })
    }

    /// Activate the drawn card's power. It must then be resolved.
    pub fn use_power(&mut self, player: PlayerId) -> Result<PowerOutcome, ActionError> {
        let (_, drawn) = self.require_drawn(player)?;
        let power = drawn.power().ok_or(ActionError::NoPower)?;
        self.check_power_allowed(power)?;

        self.step = TurnStep::Power(PendingPower::new(power, drawn));
        debug!(target: LOG_TARGET, room = %self.room, player = %player, %power, "power activated");
        Ok(PowerOutcome { power, card: drawn })
    }

    /// Claim the drawn card matches hand slot `index` and drop both.
    ///
    /// A wrong claim still discards the drawn card and deals penalty cards.
    pub fn double_drop(
        &mut self,
        player: PlayerId,
        index: usize,
        use_power: bool,
    ) -> Result<DoubleDropOutcome, ActionError> {
        let (seat, drawn) = self.require_drawn(player)?;
        let hand_card = self.players[seat].card_at(index)?;

        if !hand_card.matches_rank(drawn) {
            let penalty_cards = self.deal_penalty(seat, self.config.double_drop_penalty_cards);
            self.finish_action(drawn);
            info!(
                target: LOG_TARGET,
                room = %self.room,
                player = %player,
                claimed = %hand_card,
                penalty_cards,
                "double drop penalized"
            );
            return Ok(DoubleDropOutcome::Penalized {
                drawn_card: drawn,
                penalty_cards,
            });
        }

        let chained = drawn.power().filter(|_| use_power);
        if let Some(power) = chained {
            self.check_power_allowed(power)?;
        }

        self.players[seat].remove_card(index);
        self.discard_from_play(hand_card);
        let pending_power = match chained {
            Some(power) => {
                self.step = TurnStep::Power(PendingPower::new(power, drawn));
                self.open_reaction_window();
                Some(power)
            }
            None => {
                self.finish_action(drawn);
                None
            }
        };

        debug!(target: LOG_TARGET, room = %self.room, player = %player, %hand_card, "double drop matched");
        Ok(DoubleDropOutcome::Matched {
            hand_card,
            drawn_card: drawn,
            pending_power,
        })
    }

    /// Declare cobra: the round ends after one more full lap.
    ///
    /// Uses up the caller's turn; they end it with `end_turn`.
    pub fn call_cobra(&mut self, player: PlayerId) -> Result<CobraOutcome, ActionError> {
        let seat = self.require_turn(player)?;
        if self.phase == Phase::CobraCalled {
            return Err(ActionError::CobraAlreadyCalled);
        }
        match self.step {
            TurnStep::Idle => {}
            TurnStep::Drawn(_) => return Err(ActionError::AlreadyDrawn),
            TurnStep::Power(_) => return Err(ActionError::TurnUnresolved),
            TurnStep::Resolved => return Err(ActionError::TurnAlreadyResolved),
        }

        self.phase = Phase::CobraCalled;
        self.caller = Some(CobraCall { player, seat });
        self.turns_since_call = 0;
        self.step = TurnStep::Resolved;

        let caller_name = self.players[seat].name().to_string();
        info!(target: LOG_TARGET, room = %self.room, caller = %player, "cobra called");
        Ok(CobraOutcome {
            caller: player,
            caller_name,
        })
    }

    /// The turn holder closes their turn.
    pub fn end_turn(&mut self, player: PlayerId) -> Result<TurnOutcome, ActionError> {
        self.require_turn(player)?;
        if self.step.is_unresolved() {
            return Err(ActionError::TurnUnresolved);
        }
        self.next_turn()
    }

    /// Advance to the next connected seat.
    ///
    /// Any card still held by the turn holder is forfeited to the discard pile.
    /// After a cobra call every seat stepped over counts toward the lap, and
    /// reaching the caller's seat ends the round.
    pub fn next_turn(&mut self) -> Result<TurnOutcome, ActionError> {
        self.require_in_play()?;

        if let Some(card) = self.step.held_card() {
            debug!(target: LOG_TARGET, room = %self.room, %card, "held card forfeited");
            self.discard_from_play(card);
        }
        self.step = TurnStep::Idle;
        self.reaction_open = false;

        let seats = self.players.len();
        let mut seat = self.current;
        for _ in 0..seats {
            seat = (seat + 1) % seats;
            if let Some(call) = self.caller {
                self.turns_since_call += 1;
                if seat == call.seat {
                    let summary = self.end_round(RoundEnd::CobraLap);
                    return Ok(TurnOutcome::RoundOver { summary });
                }
            }
            if self.players[seat].is_connected() {
                self.current = seat;
                debug!(target: LOG_TARGET, room = %self.room, seat, "turn advanced");
                return Ok(self.turn_outcome_after_advance());
            }
        }

        Ok(TurnOutcome::NoConnectedPlayers)
    }

    // === Helpers ===

    /// Turn holder with a drawn card in hand. Returns `(seat, card)`.
    fn require_drawn(&self, player: PlayerId) -> Result<(usize, Card), ActionError> {
        let seat = self.require_turn(player)?;
        match self.step {
            TurnStep::Drawn(card) => Ok((seat, card)),
            _ => Err(ActionError::NoCardDrawn),
        }
    }

    pub(crate) fn check_power_allowed(&self, power: PowerKind) -> Result<(), ActionError> {
        if power == PowerKind::QueenSwap {
            let connected = self.connected_count();
            let required = self.config.queen_swap_min_players;
            if connected < required {
                return Err(ActionError::QueenSwapNeedsPlayers { required, connected });
            }
        }
        Ok(())
    }

    /// Discard the card that completes the turn's action and open a window.
    pub(crate) fn finish_action(&mut self, card: Card) {
        self.discard_from_play(card);
        self.step = TurnStep::Resolved;
        self.open_reaction_window();
    }
}
