//! Round-end arbitration and scoring.

use tracing::info;

use super::game::{Match, LOG_TARGET};
use super::outcome::{RoundEnd, RoundResult, RoundSummary};
use super::phase::{Phase, TurnStep};
use crate::core::PlayerId;

/// Who won a round and who, if anyone, pays the cobra penalty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arbitration {
    pub winner: PlayerId,
    pub penalized: Option<PlayerId>,
}

/// Decide a round from `(player, score)` pairs in seat order.
///
/// Ties between non-callers go to the earlier seat. The caller loses every
/// tie: any other player matching the caller's score wins and the caller is
/// penalized. A caller who is not the lowest scorer is penalized too.
///
/// Returns `None` only for an empty table.
#[must_use]
pub fn arbitrate(scores: &[(PlayerId, i32)], caller: Option<PlayerId>) -> Option<Arbitration> {
    let mut ranked = scores.to_vec();
    ranked.sort_by_key(|&(_, score)| score);
    let &(lowest, _) = ranked.first()?;

    let Some(caller) = caller else {
        return Some(Arbitration {
            winner: lowest,
            penalized: None,
        });
    };
    let Some(&(_, caller_score)) = scores.iter().find(|(id, _)| *id == caller) else {
        return Some(Arbitration {
            winner: lowest,
            penalized: None,
        });
    };

    if let Some(&(tied, _)) = ranked.iter().find(|&&(id, score)| id != caller && score == caller_score) {
        return Some(Arbitration {
            winner: tied,
            penalized: Some(caller),
        });
    }

    let min_score = ranked[0].1;
    if caller_score == min_score {
        Some(Arbitration {
            winner: caller,
            penalized: None,
        })
    } else {
        Some(Arbitration {
            winner: lowest,
            penalized: Some(caller),
        })
    }
}

impl Match {
    /// Score every hand, settle totals and move to `RoundOver`.
    pub(crate) fn end_round(&mut self, ended_by: RoundEnd) -> RoundSummary {
        let scores: Vec<(PlayerId, i32)> = self.players.iter().map(|p| (p.id(), p.score())).collect();
        let caller = self.caller.map(|call| call.player);
        let verdict = arbitrate(&scores, caller);
        let penalized = verdict.and_then(|v| v.penalized);
        let winner = verdict.map_or(PlayerId::new(0), |v| v.winner);

        for (player, &(id, score)) in self.players.iter_mut().zip(&scores) {
            let penalty = if penalized == Some(id) { self.config.cobra_penalty } else { 0 };
            player.settle_round(score, penalty);
        }

        let mut results: Vec<RoundResult> = self
            .players
            .iter()
            .map(|p| RoundResult {
                id: p.id(),
                name: p.name().to_string(),
                hand: p.hand().to_vec(),
                score: p.round_score(),
                is_caller: caller == Some(p.id()),
                penalized: penalized == Some(p.id()),
                is_winner: winner == p.id(),
                total_score: p.total_score(),
            })
            .collect();
        results.sort_by_key(|r| r.score);

        self.phase = Phase::RoundOver;
        self.step = TurnStep::Idle;
        self.reaction_open = false;

        let summary = RoundSummary {
            round: self.round,
            ended_by,
            caller,
            winner,
            results,
        };
        info!(
            target: LOG_TARGET,
            room = %self.room,
            round = self.round,
            winner = %winner,
            penalized = ?penalized,
            ?ended_by,
            "round over"
        );
        self.last_round = Some(summary.clone());
        summary
    }
}
