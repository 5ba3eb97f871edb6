//! Vital-point resolution.
//!
//! Decides whether a technique connects at all and, when a target is named,
//! whether it finds the vital point. Draw order is fixed so that scripted
//! randomness maps onto roll sites:
//!
//! 1. technique damage (skipped for point ranges)
//! 2. accuracy
//! 3. vital point (only with a target)
//! 4. one draw per vital-point effect, in catalog order

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::anatomy::{Region, Severity, VitalPoint, VitalPointId};
use crate::config::AccuracyConfig;
use crate::rng;
use crate::status::{EffectKind, StatusEffect};
use crate::technique::Technique;

/// A strike that found its vital point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalStrike {
    /// Point struck.
    pub id: VitalPointId,
    /// Its region.
    pub region: Region,
    /// Its severity.
    pub severity: Severity,
    /// Damage before stance effectiveness.
    pub damage: u32,
    /// Critical or lethal point.
    pub critical: bool,
    /// Guaranteed stun followed by the effects that triggered.
    pub effects: Vec<StatusEffect>,
}

/// A strike that connected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VitalPointHit {
    /// Landed on the body without finding a vital point.
    General {
        /// Rolled technique damage.
        damage: u32,
    },
    /// Found the named vital point.
    Vital(VitalStrike),
}

impl VitalPointHit {
    /// Damage before crit and stance effectiveness.
    #[must_use]
    pub fn damage(&self) -> u32 {
        match self {
            Self::General { damage } => *damage,
            Self::Vital(strike) => strike.damage,
        }
    }

    /// The vital strike, if any.
    #[must_use]
    pub fn vital(&self) -> Option<&VitalStrike> {
        match self {
            Self::General { .. } => None,
            Self::Vital(strike) => Some(strike),
        }
    }
}

/// Damage of a successful vital hit: scaled technique damage, never below
/// the point's base damage.
#[must_use]
pub fn vital_damage(technique_damage: u32, point: &VitalPoint) -> u32 {
    let scaled =
        f64::from(technique_damage) * point.damage_multiplier * point.severity.damage_multiplier();
    scaled.max(f64::from(point.base_damage)).floor() as u32
}

/// Resolve one strike. `None` means the accuracy roll failed; nothing else
/// is drawn in that case.
pub fn resolve<R: Rng + ?Sized>(
    technique: &Technique,
    target: Option<&VitalPoint>,
    distance: f64,
    accuracy: &AccuracyConfig,
    rng: &mut R,
) -> Option<VitalPointHit> {
    let damage = technique.damage.roll(rng);

    let chance = accuracy.effective_accuracy(technique.accuracy, distance);
    if !rng::roll(rng, chance) {
        tracing::trace!(technique = %technique.id, chance, "Accuracy roll failed");
        return None;
    }

    let Some(point) = target else {
        return Some(VitalPointHit::General { damage });
    };

    if !rng::roll(rng, point.base_accuracy) {
        tracing::trace!(
            technique = %technique.id,
            vital_point = %point.id,
            "Vital point missed, general hit"
        );
        return Some(VitalPointHit::General { damage });
    }

    let mut effects = Vec::with_capacity(point.effects.len() + 1);
    if point.base_stun_ms > 0 {
        effects.push(StatusEffect::new(
            EffectKind::Stun,
            point.base_stun_ms,
            1.0,
            false,
            point.id.as_str(),
        ));
    }
    for spec in &point.effects {
        if rng::roll(rng, spec.chance) {
            effects.push(spec.instantiate(point.id.as_str()));
        }
    }

    let strike = VitalStrike {
        id: point.id.clone(),
        region: point.region,
        severity: point.severity,
        damage: vital_damage(damage, point),
        critical: point.severity.is_critical(),
        effects,
    };
    tracing::debug!(
        technique = %technique.id,
        vital_point = %strike.id,
        severity = ?strike.severity,
        damage = strike.damage,
        "Vital point struck"
    );
    Some(VitalPointHit::Vital(strike))
}
