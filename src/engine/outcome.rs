//! Success payloads returned by engine operations.
//!
//! These carry exactly what the acting player is entitled to learn from the
//! action (e.g. the card they peeked). Broadcast-safe summaries are derived
//! from them by the coordinator.

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::cards::{Card, PowerKind};
use crate::core::PlayerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartOutcome {
    pub round: u32,
}

/// A card revealed to the actor at a given seat and slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeekedCard {
    pub player: PlayerId,
    pub index: usize,
    pub card: Card,
}

/// Address of a hand slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRef {
    pub player: PlayerId,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DrawOutcome {
    Drawn { card: Card, power: Option<PowerKind> },
    /// Neither pile could supply a card; the round ended on the spot.
    Exhausted { summary: RoundSummary },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub discarded: Card,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardOutcome {
    pub discarded: Card,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerOutcome {
    pub power: PowerKind,
    pub card: Card,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DoubleDropOutcome {
    /// Both cards left the hand. `pending_power` is set when a power now awaits resolution.
    Matched {
        hand_card: Card,
        drawn_card: Card,
        pending_power: Option<PowerKind>,
    },
    /// Wrong claim: the drawn card was discarded and penalty cards dealt.
    Penalized { drawn_card: Card, penalty_cards: usize },
}

impl DoubleDropOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, DoubleDropOutcome::Matched { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeekOutcome {
    pub peeked: PeekedCard,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiPeekOutcome {
    pub cards: Vec<PeekedCard>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardsSwapped {
    pub first: SlotRef,
    pub second: SlotRef,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SnapOutcome {
    Matched { player: PlayerId, card: Card },
    /// The attempted card was shown to the table and a penalty dealt.
    Missed {
        player: PlayerId,
        index: usize,
        revealed: Card,
        penalty_cards: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StealOutcome {
    Matched {
        thief: PlayerId,
        target: PlayerId,
        card: Card,
    },
    Missed {
        thief: PlayerId,
        target: PlayerId,
        target_index: usize,
        revealed: Card,
        penalty_cards: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CobraOutcome {
    pub caller: PlayerId,
    pub caller_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TurnOutcome {
    Advanced { next: PlayerId, phase: Phase },
    RoundOver { summary: RoundSummary },
    /// Every seat is disconnected; the turn index did not move.
    NoConnectedPlayers,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveOutcome {
    pub player: PlayerId,
    pub name: String,
    /// Set when the departing player held the turn.
    pub turn: Option<TurnOutcome>,
}

/// Why a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEnd {
    /// The lap after a cobra call completed.
    CobraLap,
    /// The turn holder could not draw.
    DeckExhausted,
}

/// One player's line in the round results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<Card>,
    pub score: i32,
    pub is_caller: bool,
    pub penalized: bool,
    pub is_winner: bool,
    pub total_score: i32,
}

/// Fully revealed round results, ordered by ascending score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub ended_by: RoundEnd,
    pub caller: Option<PlayerId>,
    pub winner: PlayerId,
    pub results: Vec<RoundResult>,
}

impl RoundSummary {
    #[must_use]
    pub fn result_for(&self, player: PlayerId) -> Option<&RoundResult> {
        self.results.iter().find(|r| r.id == player)
    }
}
