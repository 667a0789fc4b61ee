//! Deterministic random number generation with derived child streams.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **String or numeric seeds**: text is hashed to 32 bits first
//! - **Child streams**: Independent sequences for AI sampling that never
//!   feed back into the match stream
//! - **Serializable**: O(1) state capture and restore
//!
//! ## Usage
//!
//! ```
//! use card_gomoku::core::GameRng;
//!
//! let mut a = GameRng::new("seed-xyz");
//! let mut b = GameRng::new("seed-xyz");
//! assert_eq!(a.int(1, 10), b.int(1, 10));
//!
//! // Children are keyed by (parent seed, salt, index) only
//! let mut c1 = a.child("rollout", 0);
//! let mut c2 = b.child("rollout", 0);
//! assert_eq!(c1.next(), c2.next());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::error::RngError;

/// Seed accepted by [`GameRng::new`].
///
/// Numbers (negative ones included) are reduced mod 2^32; text is hashed
/// with a fixed avalanche hash.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Number(i64),
    Text(String),
}

impl Seed {
    /// The 32-bit value that seeds the core generator.
    #[must_use]
    pub fn to_u32(&self) -> u32 {
        match self {
            // Two's-complement truncation is the mod 2^32 reduction.
            Seed::Number(n) => *n as u32,
            Seed::Text(text) => hash_seed_text(text),
        }
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seed::Number(n) => write!(f, "{n}"),
            Seed::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Seed {
    fn from(text: &str) -> Self {
        Seed::Text(text.to_string())
    }
}

impl From<String> for Seed {
    fn from(text: String) -> Self {
        Seed::Text(text)
    }
}

impl From<u64> for Seed {
    fn from(n: u64) -> Self {
        // Wrapping keeps the low 32 bits, which is all that seeds the core.
        Seed::Number(n as i64)
    }
}

impl From<i64> for Seed {
    fn from(n: i64) -> Self {
        Seed::Number(n)
    }
}

impl From<u32> for Seed {
    fn from(n: u32) -> Self {
        Seed::Number(i64::from(n))
    }
}

impl From<i32> for Seed {
    fn from(n: i32) -> Self {
        Seed::Number(i64::from(n))
    }
}

/// Hash a text seed to 32 bits (xmur3 mixing over UTF-16 code units).
#[must_use]
pub fn hash_seed_text(text: &str) -> u32 {
    let units: Vec<u16> = text.encode_utf16().collect();
    let mut h: u32 = 1_779_033_703 ^ (units.len() as u32);
    for unit in units {
        h = (h ^ u32::from(unit)).wrapping_mul(3_432_918_353);
        h = h.rotate_left(13);
    }
    h = (h ^ (h >> 16)).wrapping_mul(2_246_822_507);
    h = (h ^ (h >> 13)).wrapping_mul(3_266_489_909);
    h ^ (h >> 16)
}

/// Deterministic RNG for match play and AI sampling.
///
/// Uses ChaCha8 as the core generator. Instances are single-owner: the match
/// stream belongs to the session, children belong to whoever derived them.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: Seed,
}

impl GameRng {
    /// Create a new RNG from a numeric or text seed.
    #[must_use]
    pub fn new(seed: impl Into<Seed>) -> Self {
        let seed = seed.into();
        Self {
            inner: ChaCha8Rng::seed_from_u64(u64::from(seed.to_u32())),
            seed,
        }
    }

    /// The seed as provided.
    #[must_use]
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Next float in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Alias of [`GameRng::next`].
    pub fn float(&mut self) -> f64 {
        self.next()
    }

    /// Uniform integer in `[min, max]`, inclusive. Reversed bounds are swapped.
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if max < min { (max, min) } else { (min, max) };
        self.inner.gen_range(lo..=hi)
    }

    /// Pick one element uniformly.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, RngError> {
        if items.is_empty() {
            return Err(RngError::EmptyInput);
        }
        let idx = self.inner.gen_range(0..items.len());
        Ok(&items[idx])
    }

    /// Return a shuffled copy (Fisher-Yates). The input is left untouched.
    #[must_use]
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        for i in (1..out.len()).rev() {
            let j = self.inner.gen_range(0..=i);
            out.swap(i, j);
        }
        out
    }

    /// Derive an independent child stream seeded by `"{seed}:{salt}:{index}"`.
    ///
    /// Does not advance `self`; the same `(salt, index)` always yields the
    /// same child for a given parent seed.
    #[must_use]
    pub fn child(&self, salt: &str, index: u64) -> Self {
        Self::new(format!("{}:{}:{}", self.seed, salt, index))
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed.clone(),
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut rng = Self::new(state.seed.clone());
        rng.inner.set_word_pos(state.word_pos);
        rng
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses the ChaCha8 word position, so capture is O(1) regardless of
/// how many numbers have been generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRngState {
    /// Original seed
    pub seed: Seed,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}
