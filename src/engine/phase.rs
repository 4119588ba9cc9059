//! Match phases, the per-turn sub-state and pending powers.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Card, PowerKind};

/// Round-level phase.
///
/// `Waiting → InitialPeek → Playing → CobraCalled → RoundOver → InitialPeek …`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Waiting,
    InitialPeek,
    Playing,
    CobraCalled,
    RoundOver,
}

impl Phase {
    /// Turns are being taken (draws, powers, reactions).
    #[must_use]
    pub const fn is_in_play(self) -> bool {
        matches!(self, Phase::Playing | Phase::CobraCalled)
    }

    /// Seats may be added and a new round dealt.
    #[must_use]
    pub const fn is_between_rounds(self) -> bool {
        matches!(self, Phase::Waiting | Phase::RoundOver)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Waiting => "waiting",
            Phase::InitialPeek => "initial_peek",
            Phase::Playing => "playing",
            Phase::CobraCalled => "cobra_called",
            Phase::RoundOver => "round_over",
        };
        f.write_str(name)
    }
}

/// Black jack resolves in two steps: peek two own cards, then swap or skip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlackJackStep {
    Peek,
    Swap,
}

/// A power awaiting resolution by the turn holder.
///
/// The power card itself is held here (not on the discard pile) until the
/// power resolves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "power", rename_all = "camelCase")]
pub enum PendingPower {
    PeekOwn {
        card: Card,
    },
    PeekOther {
        card: Card,
    },
    QueenSwap {
        card: Card,
    },
    BlackJack {
        card: Card,
        step: BlackJackStep,
        peeked: SmallVec<[usize; 2]>,
    },
}

impl PendingPower {
    /// Pending record for a drawn power card.
    #[must_use]
    pub fn new(kind: PowerKind, card: Card) -> Self {
        match kind {
            PowerKind::PeekOwn => PendingPower::PeekOwn { card },
            PowerKind::PeekOther => PendingPower::PeekOther { card },
            PowerKind::QueenSwap => PendingPower::QueenSwap { card },
            PowerKind::BlackJack => PendingPower::BlackJack {
                card,
                step: BlackJackStep::Peek,
                peeked: SmallVec::new(),
            },
        }
    }

    #[must_use]
    pub fn kind(&self) -> PowerKind {
        match self {
            PendingPower::PeekOwn { .. } => PowerKind::PeekOwn,
            PendingPower::PeekOther { .. } => PowerKind::PeekOther,
            PendingPower::QueenSwap { .. } => PowerKind::QueenSwap,
            PendingPower::BlackJack { .. } => PowerKind::BlackJack,
        }
    }

    /// The power card being held.
    #[must_use]
    pub fn card(&self) -> Card {
        match self {
            PendingPower::PeekOwn { card }
            | PendingPower::PeekOther { card }
            | PendingPower::QueenSwap { card }
            | PendingPower::BlackJack { card, .. } => *card,
        }
    }

    /// Keep black-jack peeked indices aligned after the holder lost slot `removed`.
    pub(crate) fn slot_removed(&mut self, removed: usize) {
        if let PendingPower::BlackJack { peeked, .. } = self {
            peeked.retain(|index| *index != removed);
            for index in peeked.iter_mut() {
                if *index > removed {
                    *index -= 1;
                }
            }
        }
    }

    /// Forget a peeked slot whose content was replaced by someone else.
    pub(crate) fn slot_replaced(&mut self, replaced: usize) {
        if let PendingPower::BlackJack { peeked, .. } = self {
            peeked.retain(|index| *index != replaced);
        }
    }
}

/// Where the turn holder is within their turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TurnStep {
    /// May draw or call cobra.
    #[default]
    Idle,
    /// Holding a drawn card that must be swapped, discarded, used or double-dropped.
    Drawn(Card),
    /// A power must be resolved before the turn can close.
    Power(PendingPower),
    /// The turn's action is done; only reactions and end-of-turn remain.
    Resolved,
}

impl TurnStep {
    /// A drawn card or power card is still held outside every pile and hand.
    #[must_use]
    pub fn held_card(&self) -> Option<Card> {
        match self {
            TurnStep::Drawn(card) => Some(*card),
            TurnStep::Power(pending) => Some(pending.card()),
            TurnStep::Idle | TurnStep::Resolved => None,
        }
    }

    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, TurnStep::Drawn(_) | TurnStep::Power(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};
    use smallvec::smallvec;

    #[test]
    fn test_phase_groups() {
        assert!(Phase::Playing.is_in_play());
        assert!(Phase::CobraCalled.is_in_play());
        assert!(!Phase::InitialPeek.is_in_play());
        assert!(Phase::Waiting.is_between_rounds());
        assert!(Phase::RoundOver.is_between_rounds());
        assert!(!Phase::Playing.is_between_rounds());
    }

    #[test]
    fn test_phase_wire_names() {
        assert_eq!(serde_json::to_string(&Phase::CobraCalled).unwrap(), r#""cobra_called""#);
        assert_eq!(Phase::InitialPeek.to_string(), "initial_peek");
    }

    #[test]
    fn test_pending_power_from_kind() {
        let jack = Card::new(Rank::Jack, Suit::Spades);
        let pending = PendingPower::new(PowerKind::BlackJack, jack);
        assert_eq!(pending.kind(), PowerKind::BlackJack);
        assert_eq!(pending.card(), jack);
        assert!(matches!(pending, PendingPower::BlackJack { step: BlackJackStep::Peek, .. }));
    }

    #[test]
    fn test_black_jack_slot_realignment() {
        let mut pending = PendingPower::BlackJack {
            card: Card::new(Rank::Jack, Suit::Clubs),
            step: BlackJackStep::Swap,
            peeked: smallvec![1, 3],
        };

        pending.slot_removed(0);
        assert!(matches!(&pending, PendingPower::BlackJack { peeked, .. } if peeked.as_slice() == [0, 2]));

        pending.slot_replaced(2);
        assert!(matches!(&pending, PendingPower::BlackJack { peeked, .. } if peeked.as_slice() == [0]));
    }

    #[test]
    fn test_pending_power_wire_format() {
        let pending = PendingPower::new(PowerKind::PeekOther, Card::new(Rank::Nine, Suit::Hearts));
        let json = serde_json::to_string(&pending).unwrap();
        assert_eq!(json, r#"{"power":"peekOther","card":{"rank":"9","suit":"hearts"}}"#);
    }

    #[test]
    fn test_held_card() {
        let card = Card::new(Rank::Four, Suit::Clubs);
        assert_eq!(TurnStep::Drawn(card).held_card(), Some(card));
        assert_eq!(TurnStep::Resolved.held_card(), None);
        assert!(TurnStep::Drawn(card).is_unresolved());
        assert!(!TurnStep::Idle.is_unresolved());
    }
}
