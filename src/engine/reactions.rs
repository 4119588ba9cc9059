//! Snaps and steals: out-of-turn reactions to the latest discard.

use tracing::{debug, info};

use super::game::{Match, LOG_TARGET};
use super::outcome::{SnapOutcome, StealOutcome};
use crate::core::{ActionError, PlayerId};

impl Match {
    /// Discard an own card matching the latest discard's rank.
    ///
    /// Any connected player may snap while a reaction window is open. A miss
    /// shows the card to the table and deals a penalty card; the snapper does
    /// not learn the card for later.
    pub fn snap_card(&mut self, player: PlayerId, index: usize) -> Result<SnapOutcome, ActionError> {
        self.require_in_play()?;
        if !self.reaction_open {
            return Err(ActionError::NoReactionWindow);
        }
        let target = self.last_discard.ok_or(ActionError::NoDiscard)?;
        let seat = self.connected_seat_of(player)?;
        let card = self.players[seat].card_at(index)?;

        if !card.matches_rank(target) {
            let penalty_cards = self.deal_penalty(seat, self.config.reaction_penalty_cards);
            info!(target: LOG_TARGET, room = %self.room, player = %player, %card, "snap missed");
            return Ok(SnapOutcome::Missed {
                player,
                index,
                revealed: card,
                penalty_cards,
            });
        }

        self.remove_slot(seat, index);
        self.discard_from_play(card);
        self.open_reaction_window();
        debug!(target: LOG_TARGET, room = %self.room, player = %player, %card, "snap matched");
        Ok(SnapOutcome::Matched { player, card })
    }

    /// Take the target's card believing it matches the latest discard.
    ///
    /// On a match the thief's own card at `thief_index` moves into the
    /// target's slot (unknown to the target) and the stolen card is
    /// discarded. Allowed at any time during play, independent of turn and
    /// reaction window.
    pub fn steal_card(
        &mut self,
        thief: PlayerId,
        target: PlayerId,
        target_index: usize,
        thief_index: usize,
    ) -> Result<StealOutcome, ActionError> {
        self.require_in_play()?;
        let discard = self.last_discard.ok_or(ActionError::NoDiscard)?;
        let thief_seat = self.connected_seat_of(thief)?;
        if target == thief {
            return Err(ActionError::SamePlayer);
        }
        let target_seat = self.seat_of(target)?;
        let wanted = self.players[target_seat].card_at(target_index)?;
        self.players[thief_seat].card_at(thief_index)?;

        if !wanted.matches_rank(discard) {
            let penalty_cards = self.deal_penalty(thief_seat, self.config.reaction_penalty_cards);
            info!(target: LOG_TARGET, room = %self.room, thief = %thief, target = %target, "steal missed");
            return Ok(StealOutcome::Missed {
                thief,
                target,
                target_index,
                revealed: wanted,
                penalty_cards,
            });
        }

        let Some(given) = self.remove_slot(thief_seat, thief_index) else {
            return Err(ActionError::InvalidIndex {
                index: thief_index,
                len: self.players[thief_seat].hand_len(),
            });
        };
        self.replace_slot(target_seat, target_index, given);
        self.discard_from_play(wanted);
        self.open_reaction_window();
        debug!(target: LOG_TARGET, room = %self.room, thief = %thief, target = %target, card = %wanted, "steal matched");
        Ok(StealOutcome::Matched {
            thief,
            target,
            card: wanted,
        })
    }
}
