//! Rules configuration for a match.
//!
//! The defaults are the standard Cobra table rules. Every knob can be
//! overridden with the `with_*` builder methods, e.g. for tests that want a
//! fixed shuffle seed.

use serde::{Deserialize, Serialize};

use crate::cards::DECK_SIZE;

/// Rules parameters for a single match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Cards dealt face down to each seat at round start.
    pub hand_size: usize,

    /// Number of own cards each player looks at before play begins.
    pub initial_peek_count: usize,

    /// Connected players required to start a round.
    pub min_players: usize,

    /// Seats available in a room.
    pub max_players: usize,

    /// Connected players required before a queen's swap power may be used.
    pub queen_swap_min_players: usize,

    /// Points added to a failed caller's cumulative total.
    pub cobra_penalty: i32,

    /// Cards drawn for a wrong double-drop claim.
    pub double_drop_penalty_cards: usize,

    /// Cards drawn for a failed snap or steal.
    pub reaction_penalty_cards: usize,

    /// Shuffle seed. `None` draws one from OS entropy per match.
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            hand_size: 4,
            initial_peek_count: 2,
            min_players: 2,
            max_players: 10,
            queen_swap_min_players: 3,
            cobra_penalty: 10,
            double_drop_penalty_cards: 2,
            reaction_penalty_cards: 1,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Use a fixed shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of seats.
    #[must_use]
    pub fn with_max_players(mut self, max: usize) -> Self {
        self.max_players = max;
        self
    }

    /// Set the minimum connected players needed to deal.
    #[must_use]
    pub fn with_min_players(mut self, min: usize) -> Self {
        self.min_players = min;
        self
    }

    /// Set the failed-call penalty.
    #[must_use]
    pub fn with_cobra_penalty(mut self, penalty: i32) -> Self {
        self.cobra_penalty = penalty;
        self
    }

    /// Largest table a single deck can deal while still flipping a discard.
    #[must_use]
    pub fn deck_capacity(&self) -> usize {
        if self.hand_size == 0 {
            return usize::MAX;
        }
        (DECK_SIZE - 1) / self.hand_size
    }

    /// Effective seat limit: configured maximum capped by deck capacity.
    #[must_use]
    pub fn seat_limit(&self) -> usize {
        self.max_players.min(self.deck_capacity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MatchConfig::default();
        assert_eq!(config.hand_size, 4);
        assert_eq!(config.initial_peek_count, 2);
        assert_eq!(config.min_players, 2);
        assert_eq!(config.queen_swap_min_players, 3);
        assert_eq!(config.cobra_penalty, 10);
        assert_eq!(config.double_drop_penalty_cards, 2);
        assert_eq!(config.reaction_penalty_cards, 1);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MatchConfig::default()
            .with_seed(123)
            .with_max_players(6)
            .with_min_players(3)
            .with_cobra_penalty(5);

        assert_eq!(config.seed, Some(123));
        assert_eq!(config.max_players, 6);
        assert_eq!(config.min_players, 3);
        assert_eq!(config.cobra_penalty, 5);
    }

    #[test]
    fn test_seat_limit_capped_by_deck() {
        let config = MatchConfig::default().with_max_players(40);
        // 4 cards each plus one flipped discard: 12 seats fit in 52 cards.
        assert_eq!(config.seat_limit(), 12);
        assert_eq!(MatchConfig::default().seat_limit(), 10);
    }

    #[test]
    fn test_serialization_fills_defaults() {
        let config: MatchConfig = serde_json::from_str(r#"{"seed": 9}"#).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.hand_size, 4);

        let json = serde_json::to_string(&config).unwrap();
        let back: MatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
