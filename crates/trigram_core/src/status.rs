//! Status effect ledger.
//!
//! Timed modifiers attached to a combatant. Stacking rules:
//! - a non-stackable effect replaces any active effect of the same kind
//! - a stackable effect is appended as an independent instance with its own
//!   expiry
//!
//! Periodic drains (bleeding, pain, winded, unbalanced) are integrated over
//! each instance's lifetime and floored, so many short ticks remove exactly
//! as much as one long tick.

use serde::{Deserialize, Serialize};

use crate::combatant::Combatant;

/// Kind of status effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Cannot act, change stance or hold a guard.
    Stun,
    /// Loses health over time.
    Bleed,
    /// Deals reduced damage.
    Weakened,
    /// Like stun, from nerve strikes.
    Paralysis,
    /// Lands fewer attacks.
    Disoriented,
    /// Loses stamina over time.
    Winded,
    /// Loses consciousness over time.
    Pain,
    /// Loses balance over time.
    Unbalanced,
}

/// Resource pool drained by a periodic effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pool {
    /// Combatant health.
    Health,
    /// Combatant stamina.
    Stamina,
    /// Consciousness meter.
    Consciousness,
    /// Balance meter.
    Balance,
}

impl EffectKind {
    /// Pool drained per second at intensity 1.0, if any.
    #[must_use]
    pub const fn periodic_drain(self) -> Option<(Pool, f64)> {
        match self {
            Self::Bleed => Some((Pool::Health, 5.0)),
            Self::Pain => Some((Pool::Consciousness, 2.0)),
            Self::Winded => Some((Pool::Stamina, 6.0)),
            Self::Unbalanced => Some((Pool::Balance, 8.0)),
            Self::Stun | Self::Weakened | Self::Paralysis | Self::Disoriented => None,
        }
    }
}

/// An active effect on a combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Effect kind.
    pub kind: EffectKind,
    /// Total duration when applied.
    pub duration_ms: u64,
    /// Time left before expiry.
    pub remaining_ms: u64,
    /// Strength, 0.0-1.0.
    pub intensity: f64,
    /// Accumulates as separate instances when true.
    pub stackable: bool,
    /// Technique or vital point that caused it.
    pub source: String,
}

impl StatusEffect {
    /// Create a fresh effect with its full duration remaining.
    #[must_use]
    pub fn new(
        kind: EffectKind,
        duration_ms: u64,
        intensity: f64,
        stackable: bool,
        source: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            duration_ms,
            remaining_ms: duration_ms,
            intensity: intensity.clamp(0.0, 1.0),
            stackable,
            source: source.into(),
        }
    }

    /// Time the effect has been active.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.duration_ms.saturating_sub(self.remaining_ms)
    }

    /// Amount drained between two points of the effect's lifetime.
    fn drained_between(&self, per_second: f64, from_ms: u64, to_ms: u64) -> u32 {
        let rate = per_second * self.intensity;
        let before = (rate * from_ms as f64 / 1000.0).floor();
        let after = (rate * to_ms as f64 / 1000.0).floor();
        (after - before).max(0.0) as u32
    }
}

/// Catalog description of an effect a strike may cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    /// Effect kind.
    pub kind: EffectKind,
    /// Duration once applied.
    pub duration_ms: u64,
    /// Strength, 0.0-1.0.
    pub intensity: f64,
    /// Accumulates as separate instances when true.
    #[serde(default)]
    pub stackable: bool,
    /// Independent trigger chance, 0.0-1.0.
    #[serde(default = "default_chance")]
    pub chance: f64,
}

const fn default_chance() -> f64 {
    1.0
}

impl EffectSpec {
    /// Create a spec.
    #[must_use]
    pub const fn new(
        kind: EffectKind,
        duration_ms: u64,
        intensity: f64,
        stackable: bool,
        chance: f64,
    ) -> Self {
        Self {
            kind,
            duration_ms,
            intensity,
            stackable,
            chance,
        }
    }

    /// Concrete effect instance attributed to `source`.
    #[must_use]
    pub fn instantiate(&self, source: &str) -> StatusEffect {
        StatusEffect::new(
            self.kind,
            self.duration_ms,
            self.intensity,
            self.stackable,
            source,
        )
    }

    /// Problems with this spec, prefixed with `owner`.
    #[must_use]
    pub fn validate(&self, owner: &str) -> Vec<String> {
        let mut errors = Vec::new();
        if self.duration_ms == 0 {
            errors.push(format!("{owner}: effect {:?} has zero duration", self.kind));
        }
        if !(0.0..=1.0).contains(&self.intensity) {
            errors.push(format!(
                "{owner}: effect {:?} intensity {} outside 0..=1",
                self.kind, self.intensity
            ));
        }
        if !(0.0..=1.0).contains(&self.chance) {
            errors.push(format!(
                "{owner}: effect {:?} chance {} outside 0..=1",
                self.kind, self.chance
            ));
        }
        errors
    }
}

/// Drains produced by one tick, by pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickDrain {
    /// Health lost.
    pub health: u32,
    /// Stamina lost.
    pub stamina: u32,
    /// Consciousness lost.
    pub consciousness: u32,
    /// Balance lost.
    pub balance: u32,
}

impl TickDrain {
    fn add(&mut self, pool: Pool, amount: u32) {
        let slot = match pool {
            Pool::Health => &mut self.health,
            Pool::Stamina => &mut self.stamina,
            Pool::Consciousness => &mut self.consciousness,
            Pool::Balance => &mut self.balance,
        };
        *slot = slot.saturating_add(amount);
    }
}

/// Add an effect, honouring the stacking rule.
#[must_use]
pub fn apply(combatant: &Combatant, effect: StatusEffect) -> Combatant {
    let mut next = combatant.clone();
    if !effect.stackable && next.has_effect(effect.kind) {
        tracing::trace!(kind = ?effect.kind, source = %effect.source, "Replacing effect");
        next.effects.retain(|e| e.kind != effect.kind);
    }
    next.effects.push(effect);
    next
}

/// Advance every effect by `elapsed_ms`, apply periodic drains and drop
/// expired effects.
#[must_use]
pub fn tick(combatant: &Combatant, elapsed_ms: u64) -> Combatant {
    tick_with_drain(combatant, elapsed_ms).0
}

/// [`tick`], also reporting what was drained.
#[must_use]
pub fn tick_with_drain(combatant: &Combatant, elapsed_ms: u64) -> (Combatant, TickDrain) {
    let mut next = combatant.clone();
    let mut drain = TickDrain::default();

    for effect in &mut next.effects {
        let step = elapsed_ms.min(effect.remaining_ms);
        if let Some((pool, per_second)) = effect.kind.periodic_drain() {
            let from = effect.elapsed_ms();
            drain.add(pool, effect.drained_between(per_second, from, from + step));
        }
        effect.remaining_ms -= step;
    }
    next.effects.retain(|e| e.remaining_ms > 0);

    next.health = next.health.saturating_sub(drain.health);
    next.stamina = next.stamina.saturating_sub(drain.stamina);
    next.consciousness = next.consciousness.saturating_sub(drain.consciousness);
    next.balance = next.balance.saturating_sub(drain.balance);

    if next.effects.len() != combatant.effects.len() {
        tracing::trace!(
            combatant = combatant.id,
            expired = combatant.effects.len() - next.effects.len(),
            "Effects expired"
        );
    }
    if next.is_stunned() {
        next.blocking = false;
    }

    (next, drain)
}

/// Remove every effect, or every effect of one kind.
#[must_use]
pub fn clear(combatant: &Combatant, kind: Option<EffectKind>) -> Combatant {
    let mut next = combatant.clone();
    match kind {
        Some(kind) => next.effects.retain(|e| e.kind != kind),
        None => next.effects.clear(),
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Archetype;

    fn fighter() -> Combatant {
        Combatant::new(1, "Test", Archetype::Musa)
    }

    #[test]
    fn test_non_stackable_replaces() {
        let c = apply(&fighter(), StatusEffect::new(EffectKind::Stun, 1_000, 0.5, false, "a"));
        let c = apply(&c, StatusEffect::new(EffectKind::Stun, 3_000, 0.8, false, "b"));

        assert_eq!(c.effects.len(), 1);
        assert_eq!(c.effects[0].remaining_ms, 3_000);
        assert_eq!(c.effects[0].source, "b");
    }

    #[test]
    fn test_stackable_accumulates() {
        let bleed = StatusEffect::new(EffectKind::Bleed, 2_000, 0.5, true, "cut");
        let c = apply(&fighter(), bleed.clone());
        let c = apply(&c, bleed);
        assert_eq!(c.effects.len(), 2);
    }

    #[test]
    fn test_tick_expires_and_never_underflows() {
        let c = apply(&fighter(), StatusEffect::new(EffectKind::Stun, 500, 1.0, false, "x"));
        let c = apply(&c, StatusEffect::new(EffectKind::Weakened, 2_000, 1.0, false, "y"));

        let c = tick(&c, 700);
        assert_eq!(c.effects.len(), 1);
        assert_eq!(c.effects[0].kind, EffectKind::Weakened);
        assert_eq!(c.effects[0].remaining_ms, 1_300);

        let c = tick(&c, 10_000);
        assert!(c.effects.is_empty());
    }

    #[test]
    fn test_bleed_is_floored_but_not_lost_across_short_ticks() {
        // 5 hp/s at intensity 1.0
        let start = apply(&fighter(), StatusEffect::new(EffectKind::Bleed, 1_000, 1.0, true, "cut"));

        let (_, drain) = tick_with_drain(&start, 100);
        assert_eq!(drain.health, 0);

        let mut c = start.clone();
        for _ in 0..10 {
            c = tick(&c, 100);
        }
        let one_shot = tick(&start, 1_000);
        assert_eq!(c.health, one_shot.health);
        assert_eq!(start.health - c.health, 5);
        assert!(c.effects.is_empty());
    }

    #[test]
    fn test_bleed_stops_at_expiry() {
        let c = apply(&fighter(), StatusEffect::new(EffectKind::Bleed, 1_000, 1.0, true, "cut"));
        let c = tick(&c, 60_000);
        assert_eq!(c.health, fighter().health - 5);
    }

    #[test]
    fn test_pain_drains_consciousness() {
        let c = apply(&fighter(), StatusEffect::new(EffectKind::Pain, 5_000, 1.0, false, "nerve"));
        let c = tick(&c, 5_000);
        assert_eq!(c.consciousness, 90);
    }

    #[test]
    fn test_stun_drops_guard() {
        let c = fighter().with_blocking(true);
        let c = apply(&c, StatusEffect::new(EffectKind::Stun, 1_000, 1.0, false, "x"));
        let c = tick(&c, 10);
        assert!(!c.blocking);
    }

    #[test]
    fn test_clear() {
        let c = apply(&fighter(), StatusEffect::new(EffectKind::Stun, 1_000, 1.0, false, "x"));
        let c = apply(&c, StatusEffect::new(EffectKind::Bleed, 1_000, 1.0, true, "y"));

        let only_bleed = clear(&c, Some(EffectKind::Stun));
        assert_eq!(only_bleed.effects.len(), 1);
        assert!(clear(&c, None).effects.is_empty());
    }
}
