//! Techniques.
//!
//! Every stance owns one signature technique. Techniques are immutable
//! catalog values; timing fields are informational for the presentation
//! layer except for the execution window, which marks the attacker as
//! mid-attack.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rng;
use crate::stance::Stance;
use crate::status::EffectSpec;

/// Effect a technique can inflict regardless of target.
pub type TechniqueEffect = EffectSpec;

/// Inclusive damage range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageRange {
    /// Lowest damage.
    pub min: u32,
    /// Highest damage.
    pub max: u32,
}

impl DamageRange {
    /// Range from `min` to `max` inclusive.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Fixed damage value.
    #[must_use]
    pub const fn point(value: u32) -> Self {
        Self::new(value, value)
    }

    /// Single value? Point ranges consume no random draw.
    #[must_use]
    pub const fn is_point(&self) -> bool {
        self.min >= self.max
    }

    /// Midpoint, rounded down.
    #[must_use]
    pub const fn average(&self) -> u32 {
        self.min + (self.max.saturating_sub(self.min)) / 2
    }

    /// Draw a damage value.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.is_point() {
            return self.min;
        }
        rng::roll_range(rng, self.min, self.max)
    }
}

/// A martial-arts technique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technique {
    /// Unique identifier.
    pub id: String,
    /// Korean name.
    pub korean_name: String,
    /// English name.
    pub english_name: String,
    /// Stance the technique is performed from.
    pub stance: Stance,
    /// Base damage.
    pub damage: DamageRange,
    /// Base accuracy, 0.0-1.0.
    pub accuracy: f64,
    /// Ki spent when committing.
    pub ki_cost: u32,
    /// Stamina spent when committing.
    pub stamina_cost: u32,
    /// Critical-hit chance on general hits, 0.0-1.0.
    pub crit_chance: f64,
    /// Damage multiplier on a critical general hit.
    pub crit_multiplier: f64,
    /// Reach in distance units. Beyond it the strike cannot land.
    pub range: f64,
    /// Innate effects, each rolled independently.
    #[serde(default)]
    pub effects: Vec<TechniqueEffect>,
    /// Time to execute.
    pub execution_ms: u64,
    /// Time to recover afterwards.
    pub recovery_ms: u64,
}

impl Technique {
    /// Problems with this entry.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let owner = format!("Technique '{}'", self.id);
        let mut errors = Vec::new();
        if self.id.trim().is_empty() {
            errors.push("Technique with empty id".to_string());
        }
        if self.damage.min > self.damage.max {
            errors.push(format!(
                "{owner}: damage range {}..={} is inverted",
                self.damage.min, self.damage.max
            ));
        }
        if self.damage.min == 0 {
            errors.push(format!("{owner}: minimum damage must be at least 1"));
        }
        for (label, value) in [("accuracy", self.accuracy), ("crit chance", self.crit_chance)] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{owner}: {label} {value} outside 0..=1"));
            }
        }
        if !self.crit_multiplier.is_finite() || self.crit_multiplier < 1.0 {
            errors.push(format!(
                "{owner}: crit multiplier must be at least 1.0, got {}",
                self.crit_multiplier
            ));
        }
        if !self.range.is_finite() || self.range < 0.0 {
            errors.push(format!("{owner}: range must be non-negative, got {}", self.range));
        }
        for effect in &self.effects {
            errors.extend(effect.validate(&owner));
        }
        errors
    }

    /// Total time the technique occupies the attacker.
    #[must_use]
    pub const fn total_time_ms(&self) -> u64 {
        self.execution_ms + self.recovery_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    fn sample() -> Technique {
        Technique {
            id: "test_strike".to_string(),
            korean_name: "시험".to_string(),
            english_name: "Test Strike".to_string(),
            stance: Stance::Geon,
            damage: DamageRange::new(10, 20),
            accuracy: 0.8,
            ki_cost: 5,
            stamina_cost: 5,
            crit_chance: 0.1,
            crit_multiplier: 1.5,
            range: 1.0,
            effects: vec![],
            execution_ms: 300,
            recovery_ms: 500,
        }
    }

    #[test]
    fn test_point_range_consumes_no_draw() {
        let mut rng = ScriptedRng::new(vec![0.99]);
        assert_eq!(DamageRange::point(25).roll(&mut rng), 25);
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn test_range_roll_bounds() {
        let range = DamageRange::new(10, 20);
        assert_eq!(range.roll(&mut ScriptedRng::new(vec![0.0])), 10);
        assert_eq!(range.roll(&mut ScriptedRng::new(vec![0.999_999])), 20);
        assert_eq!(range.average(), 15);
    }

    #[test]
    fn test_validate() {
        assert!(sample().validate().is_empty());

        let mut bad = sample();
        bad.damage = DamageRange::new(20, 10);
        bad.accuracy = 1.5;
        bad.crit_multiplier = 0.5;
        assert_eq!(bad.validate().len(), 3);
    }
}
