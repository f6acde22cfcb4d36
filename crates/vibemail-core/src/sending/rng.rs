//! Randomness source for the simulation engine

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Draws consumed by one engine tick
pub trait TickRng {
    /// Uniform batch size in `1..=max`
    fn batch_size(&mut self, max: u32) -> u32;

    /// Bernoulli draw with probability `p`
    fn chance(&mut self, p: f64) -> bool;
}

/// `TickRng` backed by a `rand` generator
pub struct RandomTicks<R> {
    rng: R,
}

impl<R: Rng> RandomTicks<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomTicks<StdRng> {
    /// Seeded generator for reproducible runs, entropy otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(StdRng::seed_from_u64(seed)),
            None => Self::new(StdRng::from_entropy()),
        }
    }
}

impl<R: Rng> TickRng for RandomTicks<R> {
    fn batch_size(&mut self, max: u32) -> u32 {
        self.rng.gen_range(1..=max.max(1))
    }

    fn chance(&mut self, p: f64) -> bool {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self.rng.gen_bool(p)
    }
}

/// Replays fixed draws, then repeats the fallbacks.
///
/// Batches are clamped into `1..=max`.
#[derive(Debug, Clone)]
pub struct ScriptedTicks {
    batches: VecDeque<u32>,
    chances: VecDeque<bool>,
    fallback_batch: u32,
    fallback_chance: bool,
}

impl ScriptedTicks {
    /// Every draw returns `batch` and `chance`
    pub fn always(batch: u32, chance: bool) -> Self {
        Self {
            batches: VecDeque::new(),
            chances: VecDeque::new(),
            fallback_batch: batch,
            fallback_chance: chance,
        }
    }

    pub fn with_batches(mut self, batches: impl IntoIterator<Item = u32>) -> Self {
        self.batches.extend(batches);
        self
    }

    pub fn with_chances(mut self, chances: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(chances);
        self
    }
}

impl TickRng for ScriptedTicks {
    fn batch_size(&mut self, max: u32) -> u32 {
        let batch = self.batches.pop_front().unwrap_or(self.fallback_batch);
        batch.clamp(1, max.max(1))
    }

    fn chance(&mut self, _p: f64) -> bool {
        self.chances.pop_front().unwrap_or(self.fallback_chance)
    }
}
