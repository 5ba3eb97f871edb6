//! Anatomical targets.
//!
//! A [`VitalPoint`] is a named target (pressure point, nerve cluster,
//! joint) with its own accuracy, damage and effect profile. Points are
//! grouped into [`Region`]s, and regions decide how much of a vital hit's
//! damage also reaches the consciousness and balance meters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::status::EffectSpec;

/// Effect a vital point can trigger.
pub type VitalPointEffect = EffectSpec;

/// Body region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Skull, temples.
    Head,
    /// Eyes, nose, jaw.
    Face,
    /// Throat, carotid, base of skull.
    Neck,
    /// Chest and ribs.
    Torso,
    /// Solar plexus and below.
    Abdomen,
    /// Spine and kidneys.
    Back,
    /// Elbows, wrists, hands.
    Arms,
    /// Knees, thighs, ankles.
    Legs,
}

impl Region {
    /// All regions.
    pub const ALL: [Region; 8] = [
        Region::Head,
        Region::Face,
        Region::Neck,
        Region::Torso,
        Region::Abdomen,
        Region::Back,
        Region::Arms,
        Region::Legs,
    ];

    /// Fraction of vital-hit damage that also drains consciousness.
    #[must_use]
    pub const fn consciousness_factor(self) -> f64 {
        match self {
            Self::Head => 0.5,
            Self::Neck => 0.4,
            Self::Face => 0.3,
            Self::Torso | Self::Abdomen => 0.1,
            Self::Back => 0.05,
            Self::Arms | Self::Legs => 0.0,
        }
    }

    /// Fraction of vital-hit damage that also drains balance.
    #[must_use]
    pub const fn balance_factor(self) -> f64 {
        match self {
            Self::Legs => 0.4,
            Self::Back => 0.2,
            Self::Abdomen => 0.15,
            Self::Head | Self::Neck | Self::Torso => 0.1,
            Self::Face | Self::Arms => 0.05,
        }
    }
}

/// Severity class, ordered from least to most dangerous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Painful, little lasting harm.
    Minor,
    /// Noticeable impairment.
    Moderate,
    /// Serious impairment.
    Severe,
    /// Fight-ending if repeated.
    Critical,
    /// Potentially fatal.
    Lethal,
}

impl Severity {
    /// All severities, ascending.
    pub const ALL: [Severity; 5] = [
        Severity::Minor,
        Severity::Moderate,
        Severity::Severe,
        Severity::Critical,
        Severity::Lethal,
    ];

    /// Damage multiplier; strictly increasing with severity.
    #[must_use]
    pub const fn damage_multiplier(self) -> f64 {
        match self {
            Self::Minor => 1.0,
            Self::Moderate => 1.2,
            Self::Severe => 1.5,
            Self::Critical => 2.0,
            Self::Lethal => 2.5,
        }
    }

    /// Does a hit of this severity count as a critical hit?
    #[must_use]
    pub fn is_critical(self) -> bool {
        self >= Self::Critical
    }
}

/// Catalog identifier of a vital point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VitalPointId(pub String);

impl VitalPointId {
    /// Create an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as `&str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VitalPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VitalPointId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A named anatomical target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalPoint {
    /// Unique identifier.
    pub id: VitalPointId,
    /// Korean name.
    pub korean_name: String,
    /// English name.
    pub english_name: String,
    /// Body region.
    pub region: Region,
    /// Severity class.
    pub severity: Severity,
    /// Chance that an aimed strike finds the point, 0.0-1.0.
    pub base_accuracy: f64,
    /// Minimum damage of a successful vital hit.
    pub base_damage: u32,
    /// Multiplier on technique damage.
    pub damage_multiplier: f64,
    /// Guaranteed stun on a successful vital hit (0 for none).
    #[serde(default)]
    pub base_stun_ms: u64,
    /// Additional effects, each rolled independently.
    #[serde(default)]
    pub effects: Vec<VitalPointEffect>,
}

impl VitalPoint {
    /// Problems with this entry.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let owner = format!("Vital point '{}'", self.id);
        let mut errors = Vec::new();
        if self.id.as_str().trim().is_empty() {
            errors.push("Vital point with empty id".to_string());
        }
        if !(0.0..=1.0).contains(&self.base_accuracy) {
            errors.push(format!(
                "{owner}: base accuracy {} outside 0..=1",
                self.base_accuracy
            ));
        }
        if !self.damage_multiplier.is_finite() || self.damage_multiplier <= 0.0 {
            errors.push(format!(
                "{owner}: damage multiplier must be positive, got {}",
                self.damage_multiplier
            ));
        }
        for effect in &self.effects {
            errors.extend(effect.validate(&owner));
        }
        errors
    }
}
