//! Deterministic random number generation for deck shuffles.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical shuffles
//! - **Replayable**: The seed is kept even for entropy-seeded matches
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use cobra_engine::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.gen_range_usize(0..52), b.gen_range_usize(0..52));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG backing every shuffle in a match.
///
/// Uses ChaCha8 for speed while keeping good statistical quality.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the thread-local entropy source.
    ///
    /// The drawn seed is retained so the match can still be replayed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Seeded when `seed` is given, entropy otherwise.
    #[must_use]
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for checkpointing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}
