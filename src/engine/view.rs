//! Per-viewer projection of a match.
//!
//! A `MatchView` only ever contains what its viewer may see: their own known
//! cards, the public faces of the piles, and counts for every other hand.
//! The drawn card and pending power appear only in the turn holder's view.

use serde::{Deserialize, Serialize};

use super::game::Match;
use super::outcome::RoundSummary;
use super::phase::{PendingPower, Phase, TurnStep};
use crate::cards::Card;
use crate::core::{ActionError, PlayerId, RoomCode};
use crate::players::{HandSlotView, PublicPlayerView};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnHolder {
    pub id: PlayerId,
    pub name: String,
}

/// Another seat as seen by the viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    #[serde(flatten)]
    pub player: PublicPlayerView,
    pub is_current_turn: bool,
    pub is_you: bool,
    pub total_score: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub room: RoomCode,
    pub phase: Phase,
    pub round: u32,
    pub host: Option<PlayerId>,
    pub you: PlayerId,
    pub current_player: Option<TurnHolder>,
    pub is_your_turn: bool,
    pub your_hand: Vec<HandSlotView>,
    pub players: Vec<SeatView>,
    pub deck_count: usize,
    pub top_discard: Option<Card>,
    pub last_discard: Option<Card>,
    pub cobra_caller: Option<PlayerId>,
    pub drawn_card: Option<Card>,
    pub pending_power: Option<PendingPower>,
    pub reaction_open: bool,
    pub round_summary: Option<RoundSummary>,
}

impl Match {
    /// Build the projection sent to `viewer`.
    pub fn state_for_player(&self, viewer: PlayerId) -> Result<MatchView, ActionError> {
        let seat = self.seat_of(viewer)?;
        let in_play = self.phase.is_in_play();
        let holder = self.players.get(self.current).filter(|_| in_play);
        let is_your_turn = in_play && seat == self.current;

        let players = self
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| SeatView {
                player: p.public_view(),
                is_current_turn: in_play && i == self.current,
                is_you: i == seat,
                total_score: p.total_score(),
            })
            .collect();

        let (drawn_card, pending_power) = match (&self.step, is_your_turn) {
            (TurnStep::Drawn(card), true) => (Some(*card), None),
            (TurnStep::Power(pending), true) => (None, Some(pending.clone())),
            _ => (None, None),
        };

        Ok(MatchView {
            room: self.room.clone(),
            phase: self.phase,
            round: self.round,
            host: self.host,
            you: viewer,
            current_player: holder.map(|p| TurnHolder {
                id: p.id(),
                name: p.name().to_string(),
            }),
            is_your_turn,
            your_hand: self.players[seat].own_hand_view(),
            players,
            deck_count: self.deck.remaining(),
            top_discard: self.deck.top_discard(),
            last_discard: self.last_discard,
            cobra_caller: self.caller.map(|call| call.player),
            drawn_card,
            pending_power,
            reaction_open: self.reaction_open,
            round_summary: self
                .last_round
                .as_ref()
                .filter(|_| self.phase == Phase::RoundOver)
                .cloned(),
        })
    }
}
