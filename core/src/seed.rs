use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const SEED_LEN: usize = 6;
pub const SEED_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn is_valid_seed(value: &str) -> bool {
    if value.len() != SEED_LEN {
        return false;
    }
    value.chars().all(|ch| SEED_ALPHABET.contains(ch))
}

/// Cosmetic spin identifier shown in history and exports. Never feeds the wheel RNG.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpinSeed(String);

impl SpinSeed {
    pub fn parse(value: &str) -> Result<Self, SpinSeedError> {
        if value.len() != SEED_LEN {
            return Err(SpinSeedError::InvalidLength {
                expected: SEED_LEN,
                found: value.len(),
            });
        }
        for (idx, ch) in value.chars().enumerate() {
            if !SEED_ALPHABET.contains(ch) {
                return Err(SpinSeedError::InvalidCharacter { ch, index: idx });
            }
        }
        Ok(Self(value.to_string()))
    }

    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let alphabet = SEED_ALPHABET.as_bytes();
        let mut seed = String::with_capacity(SEED_LEN);
        for _ in 0..SEED_LEN {
            let idx = rng.random_range(0..alphabet.len());
            seed.push(alphabet[idx] as char);
        }
        Self(seed)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn stream(&self) -> SeededRandom {
        SeededRandom::new(&self.0)
    }
}

impl fmt::Display for SpinSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for SpinSeed {
    type Err = SpinSeedError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for SpinSeed {
    type Error = SpinSeedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SpinSeed> for String {
    fn from(seed: SpinSeed) -> Self {
        seed.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpinSeedError {
    #[error("seed must be {expected} chars, got {found}")]
    InvalidLength { expected: usize, found: usize },
    #[error("invalid character '{ch}' at position {index}")]
    InvalidCharacter { ch: char, index: usize },
}

pub fn generate_seed<R: Rng + ?Sized>(rng: &mut R) -> SpinSeed {
    SpinSeed::generate(rng)
}

/// 31-multiplier hash over UTF-16 code units, folded to its absolute value.
pub fn hash_seed(value: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in value.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(unit as i32);
    }
    hash.unsigned_abs()
}

/// Mulberry32 stream of floats in `[0, 1)`. Same seed string, same sequence.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    pub fn new(seed: &str) -> Self {
        Self {
            state: hash_seed(seed),
        }
    }

    pub fn next_unit(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(1 | a);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        (t ^ (t >> 14)) as f64 / 4_294_967_296.0
    }
}

impl Iterator for SeededRandom {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_unit())
    }
}
