//! Resolution of pending powers.
//!
//! Each resolver checks that the caller holds the turn and that the matching
//! power is pending. Completing a power discards the power card and opens a
//! reaction window.

use smallvec::SmallVec;
use tracing::debug;

use super::game::{Match, LOG_TARGET};
use super::outcome::{CardsSwapped, DiscardOutcome, MultiPeekOutcome, PeekOutcome, PeekedCard, SlotRef};
use super::phase::{BlackJackStep, PendingPower, TurnStep};
use crate::cards::{Card, PowerKind};
use crate::core::{ActionError, PlayerId};

impl Match {
    /// 7 / 8: look at one of your own cards.
    pub fn resolve_peek_own(&mut self, player: PlayerId, index: usize) -> Result<PeekOutcome, ActionError> {
        let (seat, power_card) = self.require_pending(player, PowerKind::PeekOwn)?;
        let card = self.players[seat].card_at(index)?;

        self.players[seat].mark_known(index);
        self.complete_power(power_card);
        Ok(PeekOutcome {
            peeked: PeekedCard { player, index, card },
        })
    }

    /// 9 / 10: look at another player's card. Their knowledge is untouched.
    pub fn resolve_peek_other(
        &mut self,
        player: PlayerId,
        target: PlayerId,
        index: usize,
    ) -> Result<PeekOutcome, ActionError> {
        let (_, power_card) = self.require_pending(player, PowerKind::PeekOther)?;
        if target == player {
            return Err(ActionError::SamePlayer);
        }
        let target_seat = self.seat_of(target)?;
        let card = self.players[target_seat].card_at(index)?;

        self.complete_power(power_card);
        Ok(PeekOutcome {
            peeked: PeekedCard {
                player: target,
                index,
                card,
            },
        })
    }

    /// Queen: exchange two cards between any two different players.
    pub fn resolve_queen_swap(
        &mut self,
        player: PlayerId,
        first: SlotRef,
        second: SlotRef,
    ) -> Result<CardsSwapped, ActionError> {
        let (_, power_card) = self.require_pending(player, PowerKind::QueenSwap)?;
        if first.player == second.player {
            return Err(ActionError::SamePlayer);
        }
        let a = self.seat_of(first.player)?;
        let b = self.seat_of(second.player)?;

        self.exchange_slots((a, first.index), (b, second.index))?;
        self.complete_power(power_card);
        Ok(CardsSwapped { first, second })
    }

    /// Black jack, first step: look at two of your own cards.
    pub fn resolve_black_jack_peek(
        &mut self,
        player: PlayerId,
        indices: &[usize],
    ) -> Result<MultiPeekOutcome, ActionError> {
        let (seat, _) = self.require_black_jack(player, BlackJackStep::Peek)?;
        if indices.len() != 2 || indices[0] == indices[1] {
            return Err(ActionError::InvalidPeekSelection { expected: 2 });
        }
        let cards = indices
            .iter()
            .map(|&index| {
                self.players[seat]
                    .card_at(index)
                    .map(|card| PeekedCard { player, index, card })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for &index in indices {
            self.players[seat].mark_known(index);
        }
        if let TurnStep::Power(PendingPower::BlackJack { step, peeked, .. }) = &mut self.step {
            *step = BlackJackStep::Swap;
            *peeked = SmallVec::from_slice(indices);
        }
        debug!(target: LOG_TARGET, room = %self.room, player = %player, "black jack peek");
        Ok(MultiPeekOutcome { cards })
    }

    /// Black jack, second step: trade one of the peeked cards with another player.
    pub fn resolve_black_jack_swap(
        &mut self,
        player: PlayerId,
        own_index: usize,
        target: PlayerId,
        target_index: usize,
    ) -> Result<CardsSwapped, ActionError> {
        let (seat, power_card) = self.require_black_jack(player, BlackJackStep::Swap)?;
        if target == player {
            return Err(ActionError::SamePlayer);
        }
        let peeked_here = matches!(
            &self.step,
            TurnStep::Power(PendingPower::BlackJack { peeked, .. }) if peeked.contains(&own_index)
        );
        if !peeked_here {
            return Err(ActionError::NotPeeked { index: own_index });
        }
        let target_seat = self.seat_of(target)?;

        self.exchange_slots((seat, own_index), (target_seat, target_index))?;
        self.complete_power(power_card);
        Ok(CardsSwapped {
            first: SlotRef {
                player,
                index: own_index,
            },
            second: SlotRef {
                player: target,
                index: target_index,
            },
        })
    }

    /// Black jack: give up the rest of the power.
    pub fn resolve_black_jack_skip(&mut self, player: PlayerId) -> Result<DiscardOutcome, ActionError> {
        let (_, discarded) = self.require_pending(player, PowerKind::BlackJack)?;
        self.complete_power(discarded);
        Ok(DiscardOutcome { discarded })
    }

    /// Give up whatever power is pending. The power card is discarded unused.
    ///
    /// A pending power can lose every legal target after activation (a
    /// double drop that empties the hand, or snaps during the window), so
    /// the turn holder can always end it this way.
    pub fn skip_power(&mut self, player: PlayerId) -> Result<DiscardOutcome, ActionError> {
        self.require_turn(player)?;
        let discarded = match &self.step {
            TurnStep::Power(pending) => pending.card(),
            _ => return Err(ActionError::NoPowerPending),
        };
        debug!(target: LOG_TARGET, room = %self.room, player = %player, "power skipped");
        self.complete_power(discarded);
        Ok(DiscardOutcome { discarded })
    }

    // === Helpers ===

    /// Turn holder with `expected` pending. Returns `(seat, power card)`.
    fn require_pending(&self, player: PlayerId, expected: PowerKind) -> Result<(usize, Card), ActionError> {
        let seat = self.require_turn(player)?;
        match &self.step {
            TurnStep::Power(pending) if pending.kind() == expected => Ok((seat, pending.card())),
            _ => Err(ActionError::NoPendingPower { expected }),
        }
    }

    fn require_black_jack(&self, player: PlayerId, at: BlackJackStep) -> Result<(usize, Card), ActionError> {
        let held = self.require_pending(player, PowerKind::BlackJack)?;
        match &self.step {
            TurnStep::Power(PendingPower::BlackJack { step, .. }) if *step == at => Ok(held),
            _ => Err(ActionError::NoPendingPower {
                expected: PowerKind::BlackJack,
            }),
        }
    }

    fn complete_power(&mut self, card: Card) {
        debug!(target: LOG_TARGET, room = %self.room, %card, "power resolved");
        self.finish_action(card);
    }
}
