//! Coordinator settings: timer lengths, channel sizing, and the rules each
//! new match is created with.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::MatchConfig;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// How long snaps stay open after a turn's action before the turn passes.
    pub reaction_window_ms: u64,

    /// Pause between the last initial peek and the start of play.
    pub settle_delay_ms: u64,

    /// Capacity of each match's command queue.
    pub command_buffer: usize,

    pub rules: MatchConfig,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            reaction_window_ms: 5_000,
            settle_delay_ms: 4_000,
            command_buffer: 64,
            rules: MatchConfig::default(),
        }
    }
}

impl CoordinatorConfig {
    #[must_use]
    pub fn with_reaction_window(mut self, window: Duration) -> Self {
        self.reaction_window_ms = duration_ms(window);
        self
    }

    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = duration_ms(delay);
        self
    }

    #[must_use]
    pub fn with_command_buffer(mut self, capacity: usize) -> Self {
        self.command_buffer = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: MatchConfig) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn reaction_window(&self) -> Duration {
        Duration::from_millis(self.reaction_window_ms)
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
