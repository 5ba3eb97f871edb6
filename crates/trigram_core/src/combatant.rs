//! Combatant snapshots.
//!
//! A [`Combatant`] is a plain value. The core never mutates one in place
//! behind the caller's back: every operation takes a snapshot and returns a
//! new one, and the host loop keeps the authoritative copy.

use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;
use crate::stance::Stance;
use crate::status::{EffectKind, StatusEffect};

/// Unique identifier for combatants within a bout.
pub type CombatantId = u32;

/// Upper bound of the consciousness meter.
pub const MAX_CONSCIOUSNESS: u32 = 100;

/// Upper bound of the balance meter.
pub const MAX_BALANCE: u32 = 100;

/// Health fraction below which a combatant counts as wounded.
pub const WOUNDED_THRESHOLD: f64 = 0.3;

/// The combat-relevant state of one fighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    /// Identifier within the bout.
    pub id: CombatantId,
    /// Display name.
    pub name: String,
    /// Archetype the baselines came from.
    pub archetype: Archetype,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Current ki.
    pub ki: u32,
    /// Maximum ki.
    pub max_ki: u32,
    /// Current stamina.
    pub stamina: u32,
    /// Maximum stamina.
    pub max_stamina: u32,
    /// Current stance.
    pub stance: Stance,
    /// 0-100. Reaching 0 ends the bout for this combatant.
    pub consciousness: u32,
    /// 0-100.
    pub balance: u32,
    /// Active status effects, in application order.
    #[serde(default)]
    pub effects: Vec<StatusEffect>,
    /// Is the combatant holding a guard?
    #[serde(default)]
    pub blocking: bool,
    /// Match time of the last stance change.
    #[serde(default)]
    pub last_stance_change_ms: Option<u64>,
    /// Match time of the last committed technique.
    #[serde(default)]
    pub last_action_ms: Option<u64>,
    /// The combatant is mid-attack until this match time.
    #[serde(default)]
    pub action_window_end_ms: Option<u64>,
}

impl Combatant {
    /// Create a fresh combatant with archetype baselines in its first
    /// favored stance.
    #[must_use]
    pub fn new(id: CombatantId, name: impl Into<String>, archetype: Archetype) -> Self {
        let stats = archetype.baseline();
        Self {
            id,
            name: name.into(),
            archetype,
            health: stats.health,
            max_health: stats.health,
            ki: stats.ki,
            max_ki: stats.ki,
            stamina: stats.stamina,
            max_stamina: stats.stamina,
            stance: archetype.favored_stances()[0],
            consciousness: MAX_CONSCIOUSNESS,
            balance: MAX_BALANCE,
            effects: Vec::new(),
            blocking: false,
            last_stance_change_ms: None,
            last_action_ms: None,
            action_window_end_ms: None,
        }
    }

    /// Builder: set the stance.
    #[must_use]
    pub fn with_stance(mut self, stance: Stance) -> Self {
        self.stance = stance;
        self
    }

    /// Builder: set the guard.
    #[must_use]
    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    /// Out of the bout: no health or no consciousness left.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.health == 0 || self.consciousness == 0
    }

    /// Stunned or paralysed.
    #[must_use]
    pub fn is_stunned(&self) -> bool {
        self.has_effect(EffectKind::Stun) || self.has_effect(EffectKind::Paralysis)
    }

    /// Is a guard actually up? A stunned combatant cannot hold one.
    #[must_use]
    pub fn is_guarding(&self) -> bool {
        self.blocking && !self.is_stunned() && !self.is_defeated()
    }

    /// Still inside the execution window of the last technique?
    #[must_use]
    pub fn is_mid_attack(&self, now_ms: u64) -> bool {
        self.action_window_end_ms.is_some_and(|end| now_ms < end)
    }

    /// Health as a fraction of maximum.
    #[must_use]
    pub fn health_fraction(&self) -> f64 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f64 / self.max_health as f64
    }

    /// Below the wounded threshold.
    #[must_use]
    pub fn is_wounded(&self) -> bool {
        self.health_fraction() < WOUNDED_THRESHOLD
    }

    /// Any active effect of this kind?
    #[must_use]
    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Strongest active intensity of this kind (0.0 when absent).
    #[must_use]
    pub fn intensity_of(&self, kind: EffectKind) -> f64 {
        self.effects
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.intensity)
            .fold(0.0, f64::max)
    }
}
