//! Injected randomness.
//!
//! The combat core never touches thread-local or OS randomness. Every roll
//! goes through a caller-supplied [`rand::Rng`]: a seeded [`CombatRng`] in
//! play, or a [`ScriptedRng`] replaying fixed unit values in tests and
//! scripted scenarios. All draws are unit floats in `[0, 1)` so a scripted
//! sequence maps one-to-one onto roll sites.

use std::collections::VecDeque;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seedable generator used for bouts.
pub type CombatRng = ChaCha8Rng;

/// Largest unit value a scripted draw can produce.
const MAX_UNIT: f64 = 1.0 - f64::EPSILON / 2.0;

/// Scale between a unit float and the 53 random bits `rand` keeps.
const UNIT_SCALE: f64 = (1u64 << 53) as f64;

/// Create a generator from a seed.
#[must_use]
pub fn seeded(seed: u64) -> CombatRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// One uniform draw in `[0, 1)`.
pub fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Succeeds when a draw falls below `chance`. Always consumes one draw.
pub fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    unit(rng) < chance
}

/// Uniform integer in `min..=max` from one unit draw.
pub fn roll_range<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    if min >= max {
        return min;
    }
    let span = max - min;
    let offset = (unit(rng) * (f64::from(span) + 1.0)) as u32;
    min + offset.min(span)
}

/// Replays a fixed sequence of unit draws.
///
/// Once the script runs out every further draw returns the fallback value.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    rolls: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRng {
    /// Replay `rolls`, then fall back to 0.0 (every roll succeeds).
    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback: 0.0,
        }
    }

    /// Return `value` for every draw.
    #[must_use]
    pub fn always(value: f64) -> Self {
        Self {
            rolls: VecDeque::new(),
            fallback: value,
        }
    }

    /// Every roll succeeds (draw 0.0).
    #[must_use]
    pub fn always_hit() -> Self {
        Self::always(0.0)
    }

    /// Every roll fails (draw just below 1.0).
    #[must_use]
    pub fn always_miss() -> Self {
        Self::always(MAX_UNIT)
    }

    /// Builder: value used after the script runs out.
    #[must_use]
    pub fn with_fallback(mut self, value: f64) -> Self {
        self.fallback = value;
        self
    }

    /// Scripted draws not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }

    fn next_unit(&mut self) -> f64 {
        self.rolls
            .pop_front()
            .unwrap_or(self.fallback)
            .clamp(0.0, MAX_UNIT)
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        // `rand` turns a u64 into an f64 by keeping the top 53 bits.
        ((self.next_unit() * UNIT_SCALE) as u64) << 11
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand_chacha::rand_core::impls::fill_bytes_via_next(self, dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_values_round_trip() {
        let mut rng = ScriptedRng::new(vec![0.0, 0.5, 0.95, 0.25]);
        assert!((unit(&mut rng) - 0.0).abs() < 1e-12);
        assert!((unit(&mut rng) - 0.5).abs() < 1e-12);
        assert!((unit(&mut rng) - 0.95).abs() < 1e-12);
        assert!((unit(&mut rng) - 0.25).abs() < 1e-12);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_always_miss_fails_certain_rolls_below_one() {
        let mut rng = ScriptedRng::always_miss();
        assert!(!roll(&mut rng, 0.999));
        assert!(roll(&mut rng, 1.0));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = seeded(7);
        let mut b = seeded(7);
        for _ in 0..32 {
            assert_eq!(unit(&mut a).to_bits(), unit(&mut b).to_bits());
        }
    }

    #[test]
    fn test_roll_range_inclusive() {
        let mut rng = seeded(3);
        for _ in 0..1_000 {
            let v = roll_range(&mut rng, 5, 8);
            assert!((5..=8).contains(&v));
        }
        assert_eq!(roll_range(&mut rng, 9, 9), 9);
    }
}
