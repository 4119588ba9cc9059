//! Player intents and their dispatch onto the engine.

use serde::{Deserialize, Serialize};

use crate::core::{ActionError, PlayerId};
use crate::engine::{
    CardsSwapped, CobraOutcome, DiscardOutcome, DoubleDropOutcome, DrawOutcome, Match, MultiPeekOutcome,
    PeekOutcome, PowerOutcome, SlotRef, SnapOutcome, StartOutcome, StealOutcome, SwapOutcome, TurnOutcome,
};

/// Something a seated player asks the match to do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Intent {
    /// Deal the next round. Also accepted as `newRound`.
    #[serde(alias = "newRound")]
    StartGame,
    InitialPeek {
        indices: Vec<usize>,
    },
    DrawCard,
    SwapWithHand {
        index: usize,
    },
    DiscardDrawn,
    UsePower,
    DoubleDrop {
        index: usize,
        #[serde(default)]
        use_power: bool,
    },
    ResolvePeekOwn {
        index: usize,
    },
    ResolvePeekOther {
        target: PlayerId,
        index: usize,
    },
    ResolveQueenSwap {
        first: SlotRef,
        second: SlotRef,
    },
    ResolveBlackJackPeek {
        indices: Vec<usize>,
    },
    ResolveBlackJackSwap {
        own_index: usize,
        target: PlayerId,
        target_index: usize,
    },
    ResolveBlackJackSkip,
    /// Drop any pending power unused.
    SkipPower,
    SnapCard {
        index: usize,
    },
    StealCard {
        target: PlayerId,
        target_index: usize,
        own_index: usize,
    },
    CallCobra,
    EndTurn,
}

/// The engine's answer to an accepted intent, returned to the actor only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "data", rename_all = "camelCase")]
pub enum ActionOutcome {
    Started(StartOutcome),
    Peeked(MultiPeekOutcome),
    Drawn(DrawOutcome),
    Swapped(SwapOutcome),
    Discarded(DiscardOutcome),
    PowerActivated(PowerOutcome),
    DoubleDrop(DoubleDropOutcome),
    Peek(PeekOutcome),
    CardsSwapped(CardsSwapped),
    Snap(SnapOutcome),
    Steal(StealOutcome),
    Cobra(CobraOutcome),
    Turn(TurnOutcome),
}

impl Intent {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Intent::StartGame => "start_game",
            Intent::InitialPeek { .. } => "initial_peek",
            Intent::DrawCard => "draw_card",
            Intent::SwapWithHand { .. } => "swap_with_hand",
            Intent::DiscardDrawn => "discard_drawn",
            Intent::UsePower => "use_power",
            Intent::DoubleDrop { .. } => "double_drop",
            Intent::ResolvePeekOwn { .. } => "resolve_peek_own",
            Intent::ResolvePeekOther { .. } => "resolve_peek_other",
            Intent::ResolveQueenSwap { .. } => "resolve_queen_swap",
            Intent::ResolveBlackJackPeek { .. } => "resolve_black_jack_peek",
            Intent::ResolveBlackJackSwap { .. } => "resolve_black_jack_swap",
            Intent::ResolveBlackJackSkip => "resolve_black_jack_skip",
            Intent::SkipPower => "skip_power",
            Intent::SnapCard { .. } => "snap_card",
            Intent::StealCard { .. } => "steal_card",
            Intent::CallCobra => "call_cobra",
            Intent::EndTurn => "end_turn",
        }
    }

    /// Run this intent against `game` on behalf of `player`.
    pub fn apply(self, game: &mut Match, player: PlayerId) -> Result<ActionOutcome, ActionError> {
        let outcome = match self {
            Intent::StartGame => ActionOutcome::Started(game.start_game()?),
            Intent::InitialPeek { indices } => ActionOutcome::Peeked(game.initial_peek(player, &indices)?),
            Intent::DrawCard => ActionOutcome::Drawn(game.draw_card(player)?),
            Intent::SwapWithHand { index } => ActionOutcome::Swapped(game.swap_with_hand(player, index)?),
            Intent::DiscardDrawn => ActionOutcome::Discarded(game.discard_drawn_card(player)?),
            Intent::UsePower => ActionOutcome::PowerActivated(game.use_power(player)?),
            Intent::DoubleDrop { index, use_power } => {
                ActionOutcome::DoubleDrop(game.double_drop(player, index, use_power)?)
            }
            Intent::ResolvePeekOwn { index } => ActionOutcome::Peek(game.resolve_peek_own(player, index)?),
            Intent::ResolvePeekOther { target, index } => {
                ActionOutcome::Peek(game.resolve_peek_other(player, target, index)?)
            }
            Intent::ResolveQueenSwap { first, second } => {
                ActionOutcome::CardsSwapped(game.resolve_queen_swap(player, first, second)?)
            }
            Intent::ResolveBlackJackPeek { indices } => {
                ActionOutcome::Peeked(game.resolve_black_jack_peek(player, &indices)?)
            }
            Intent::ResolveBlackJackSwap {
                own_index,
                target,
                target_index,
            } => ActionOutcome::CardsSwapped(game.resolve_black_jack_swap(player, own_index, target, target_index)?),
            Intent::ResolveBlackJackSkip => ActionOutcome::Discarded(game.resolve_black_jack_skip(player)?),
            Intent::SkipPower => ActionOutcome::Discarded(game.skip_power(player)?),
            Intent::SnapCard { index } => ActionOutcome::Snap(game.snap_card(player, index)?),
            Intent::StealCard {
                target,
                target_index,
                own_index,
            } => ActionOutcome::Steal(game.steal_card(player, target, target_index, own_index)?),
            Intent::CallCobra => ActionOutcome::Cobra(game.call_cobra(player)?),
            Intent::EndTurn => ActionOutcome::Turn(game.end_turn(player)?),
        };
        Ok(outcome)
    }
}
