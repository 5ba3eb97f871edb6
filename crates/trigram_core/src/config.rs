//! Combat configuration.
//!
//! Every tunable constant of the resolver lives here. Policies that the
//! rules leave open (ki on a miss, attack gating, time-out ties) are
//! explicit settings rather than hidden behaviour.
//!
//! Configs deserialize from RON with every field optional:
//!
//! ```ron
//! CombatConfig(
//!     base_hit_chance: 0.85,
//!     tie_break: Consciousness,
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Shapes the vital-point resolver's accuracy roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccuracyConfig {
    /// Multiplier on technique accuracy.
    pub base_multiplier: f64,
    /// Accuracy lost per unit of distance.
    pub distance_penalty_per_unit: f64,
}

impl Default for AccuracyConfig {
    fn default() -> Self {
        Self {
            base_multiplier: 1.0,
            distance_penalty_per_unit: 0.05,
        }
    }
}

impl AccuracyConfig {
    /// Technique accuracy after distance, clamped to `[0, 1]`.
    #[must_use]
    pub fn effective_accuracy(&self, technique_accuracy: f64, distance: f64) -> f64 {
        (technique_accuracy * self.base_multiplier - distance * self.distance_penalty_per_unit)
            .clamp(0.0, 1.0)
    }
}

/// When the technique's ki and stamina cost is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KiCostPolicy {
    /// Charged whenever the attack is committed, hit or miss. A miss on the
    /// distance-gated roll happens before commitment and is free.
    #[default]
    Always,
    /// Charged only when the attack connects (including blocked hits).
    OnHitOnly,
}

/// Whether attacks share the ki gate used by stance transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttackKiGate {
    /// Attacks proceed regardless of ki; the pool saturates at zero.
    #[default]
    Independent,
    /// Attacks are denied when ki is below the technique's cost.
    Unified,
}

/// How a time-out with equal health is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TieBreak {
    /// Equal health is a draw.
    #[default]
    Draw,
    /// Higher consciousness wins; still equal is a draw.
    Consciousness,
}

/// Tunables for the combat resolver, transitions and bouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Chance that a strike within range is not avoided outright.
    pub base_hit_chance: f64,
    /// Fraction of damage a guard absorbs.
    ///
    /// At 0.7 a blocked strike deals 30% of its base damage.
    pub block_effectiveness: f64,
    /// Stamina the defender spends to absorb a blocked strike.
    pub block_stamina_cost: u32,
    /// Hit-chance penalty per point of Disoriented intensity.
    pub disoriented_hit_penalty: f64,
    /// Damage penalty per point of Weakened intensity.
    pub weakened_damage_penalty: f64,
    /// Accuracy roll shape.
    pub accuracy: AccuracyConfig,
    /// Minimum time between two stance changes.
    pub transition_cooldown_ms: u64,
    /// When technique costs are charged.
    pub ki_cost_policy: KiCostPolicy,
    /// Whether attacks are ki-gated.
    pub attack_ki_gate: AttackKiGate,
    /// Time-out tie handling.
    pub tie_break: TieBreak,
    /// Length of a round.
    pub round_duration_ms: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            base_hit_chance: 0.9,
            block_effectiveness: 0.7,
            block_stamina_cost: 5,
            disoriented_hit_penalty: 0.3,
            weakened_damage_penalty: 0.25,
            accuracy: AccuracyConfig::default(),
            transition_cooldown_ms: 500,
            ki_cost_policy: KiCostPolicy::Always,
            attack_ki_gate: AttackKiGate::Independent,
            tie_break: TieBreak::Draw,
            round_duration_ms: 90_000,
        }
    }
}

impl CombatConfig {
    /// Parse a config from RON, then validate it.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source).map_err(|e| GameError::DataParseError {
            source_name: "combat config".to_string(),
            message: e.to_string(),
        })?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(GameError::CatalogValidation(errors))
        }
    }

    /// Problems with the configured values.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let fractions = [
            ("base_hit_chance", self.base_hit_chance),
            ("block_effectiveness", self.block_effectiveness),
            ("disoriented_hit_penalty", self.disoriented_hit_penalty),
            ("weakened_damage_penalty", self.weakened_damage_penalty),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("Config '{name}' must be within 0..=1, got {value}"));
            }
        }
        if self.block_effectiveness <= 0.0 {
            errors.push("Config 'block_effectiveness' must reduce damage".to_string());
        }
        if !self.accuracy.base_multiplier.is_finite() || self.accuracy.base_multiplier <= 0.0 {
            errors.push(format!(
                "Config 'accuracy.base_multiplier' must be positive, got {}",
                self.accuracy.base_multiplier
            ));
        }
        if !self.accuracy.distance_penalty_per_unit.is_finite()
            || self.accuracy.distance_penalty_per_unit < 0.0
        {
            errors.push(format!(
                "Config 'accuracy.distance_penalty_per_unit' must be non-negative, got {}",
                self.accuracy.distance_penalty_per_unit
            ));
        }
        if self.round_duration_ms == 0 {
            errors.push("Config 'round_duration_ms' must be positive".to_string());
        }
        errors
    }
}
