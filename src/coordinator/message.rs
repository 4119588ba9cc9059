//! Messages pushed to connected players.
//!
//! Events only carry information the whole table is entitled to see. Private
//! results (peeks, drawn cards) reach the actor through its `ActionOutcome`
//! and everyone's own `MatchView`.

use serde::{Deserialize, Serialize};

use super::intent::ActionOutcome;
use crate::cards::{Card, PowerKind};
use crate::core::PlayerId;
use crate::engine::{DoubleDropOutcome, DrawOutcome, Match, MatchView, RoundSummary, SlotRef, SnapOutcome, StealOutcome, TurnOutcome};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    State(Box<MatchView>),
    Event(MatchEvent),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum MatchEvent {
    PlayerJoined {
        player: PlayerId,
        name: String,
        player_count: usize,
    },
    PlayerRejoined {
        player: PlayerId,
        name: String,
    },
    PlayerDisconnected {
        player: PlayerId,
        name: String,
    },
    GameStarted {
        round: u32,
    },
    PlayPhaseStarted {
        first: PlayerId,
    },
    CardDiscarded {
        player: PlayerId,
        name: String,
        card: Card,
    },
    PowerActivated {
        player: PlayerId,
        name: String,
        power: PowerKind,
    },
    CardsSwapped {
        first: SlotRef,
        second: SlotRef,
    },
    DoubleDrop {
        player: PlayerId,
        name: String,
        hand_card: Card,
        drawn_card: Card,
    },
    DoubleDropPenalty {
        player: PlayerId,
        name: String,
        drawn_card: Card,
        penalty_cards: usize,
    },
    SnapSuccess {
        player: PlayerId,
        name: String,
        card: Card,
    },
    SnapFail {
        player: PlayerId,
        name: String,
        revealed: Card,
        penalty_cards: usize,
    },
    StealSuccess {
        thief: PlayerId,
        thief_name: String,
        target: PlayerId,
        target_name: String,
        card: Card,
    },
    StealFail {
        thief: PlayerId,
        thief_name: String,
        target: PlayerId,
        target_name: String,
        revealed: Card,
    },
    CobraCalled {
        caller: PlayerId,
        caller_name: String,
    },
    RoundOver {
        summary: RoundSummary,
    },
}

impl MatchEvent {
    /// Table-wide events announcing an accepted action by `actor`.
    pub(crate) fn from_outcome(game: &Match, actor: PlayerId, outcome: &ActionOutcome) -> Vec<MatchEvent> {
        let name_of = |id: PlayerId| game.player(id).map(|p| p.name().to_string()).unwrap_or_default();
        let name = name_of(actor);

        match outcome {
            ActionOutcome::Started(started) => vec![MatchEvent::GameStarted { round: started.round }],
            ActionOutcome::Peeked(_) | ActionOutcome::Peek(_) => Vec::new(),
            ActionOutcome::Drawn(DrawOutcome::Drawn { .. }) => Vec::new(),
            ActionOutcome::Drawn(DrawOutcome::Exhausted { summary }) => vec![MatchEvent::RoundOver {
                summary: summary.clone(),
            }],
            ActionOutcome::Swapped(swap) => vec![MatchEvent::CardDiscarded {
                player: actor,
                name,
                card: swap.discarded,
            }],
            ActionOutcome::Discarded(discard) => vec![MatchEvent::CardDiscarded {
                player: actor,
                name,
                card: discard.discarded,
            }],
            ActionOutcome::PowerActivated(power) => vec![MatchEvent::PowerActivated {
                player: actor,
                name,
                power: power.power,
            }],
            ActionOutcome::DoubleDrop(DoubleDropOutcome::Matched {
                hand_card,
                drawn_card,
                pending_power,
            }) => {
                let mut events = vec![MatchEvent::DoubleDrop {
                    player: actor,
                    name: name.clone(),
                    hand_card: *hand_card,
                    drawn_card: *drawn_card,
                }];
                if let Some(power) = pending_power {
                    events.push(MatchEvent::PowerActivated {
                        player: actor,
                        name,
                        power: *power,
                    });
                }
                events
            }
            ActionOutcome::DoubleDrop(DoubleDropOutcome::Penalized {
                drawn_card,
                penalty_cards,
            }) => vec![MatchEvent::DoubleDropPenalty {
                player: actor,
                name,
                drawn_card: *drawn_card,
                penalty_cards: *penalty_cards,
            }],
            ActionOutcome::CardsSwapped(swapped) => vec![MatchEvent::CardsSwapped {
                first: swapped.first,
                second: swapped.second,
            }],
            ActionOutcome::Snap(SnapOutcome::Matched { player, card }) => vec![MatchEvent::SnapSuccess {
                player: *player,
                name,
                card: *card,
            }],
            ActionOutcome::Snap(SnapOutcome::Missed {
                player,
                revealed,
                penalty_cards,
                ..
            }) => vec![MatchEvent::SnapFail {
                player: *player,
                name,
                revealed: *revealed,
                penalty_cards: *penalty_cards,
            }],
            ActionOutcome::Steal(StealOutcome::Matched { thief, target, card }) => vec![MatchEvent::StealSuccess {
                thief: *thief,
                thief_name: name,
                target: *target,
                target_name: name_of(*target),
                card: *card,
            }],
            ActionOutcome::Steal(StealOutcome::Missed {
                thief,
                target,
                revealed,
                ..
            }) => vec![MatchEvent::StealFail {
                thief: *thief,
                thief_name: name,
                target: *target,
                target_name: name_of(*target),
                revealed: *revealed,
            }],
            ActionOutcome::Cobra(cobra) => vec![MatchEvent::CobraCalled {
                caller: cobra.caller,
                caller_name: cobra.caller_name.clone(),
            }],
            ActionOutcome::Turn(turn) => MatchEvent::from_turn(turn).into_iter().collect(),
        }
    }

    /// A round-over announcement if the turn advance ended the round.
    pub(crate) fn from_turn(turn: &TurnOutcome) -> Option<MatchEvent> {
        match turn {
            TurnOutcome::RoundOver { summary } => Some(MatchEvent::RoundOver {
                summary: summary.clone(),
            }),
            TurnOutcome::Advanced { .. } | TurnOutcome::NoConnectedPlayers => None,
        }
    }
}
