//! Test fixtures and helpers.
//!
//! Pre-built combatants, techniques and bouts for consistent testing.

use std::sync::Arc;

use trigram_core::archetype::Archetype;
use trigram_core::bout::Bout;
use trigram_core::catalog::Catalog;
use trigram_core::combatant::{Combatant, CombatantId};
use trigram_core::config::CombatConfig;
use trigram_core::stance::Stance;
use trigram_core::status::{self, EffectKind, StatusEffect};
use trigram_core::technique::{DamageRange, Technique};

/// The built-in catalog, shared.
#[must_use]
pub fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::builtin())
}

/// The built-in catalog as RON text.
///
/// # Panics
///
/// Panics if the catalog cannot be encoded.
#[must_use]
pub fn builtin_catalog_ron() -> String {
    ron::ser::to_string_pretty(&Catalog::builtin().to_data(), ron::ser::PrettyConfig::default())
        .expect("built-in catalog encodes as RON")
}

/// A combatant of `archetype` in `stance`.
#[must_use]
pub fn fighter(id: CombatantId, archetype: Archetype, stance: Stance) -> Combatant {
    Combatant::new(id, format!("Fighter {id}"), archetype).with_stance(stance)
}

/// Standard attacker/defender pair: a Musa and an Amsalja.
#[must_use]
pub fn duel(attacker_stance: Stance, defender_stance: Stance) -> (Combatant, Combatant) {
    (
        fighter(1, Archetype::Musa, attacker_stance),
        fighter(2, Archetype::Amsalja, defender_stance),
    )
}

/// `combatant` with one more active effect.
#[must_use]
pub fn with_effect(combatant: &Combatant, kind: EffectKind, intensity: f64) -> Combatant {
    status::apply(
        combatant,
        StatusEffect::new(kind, 10_000, intensity, false, "fixture"),
    )
}

/// A plain technique with fixed damage: perfect accuracy, no crits, no
/// effects, reach 2.0.
///
/// Damage never consumes a draw and crits always fail, so the resolver
/// draws only for the hit and accuracy rolls.
#[must_use]
pub fn point_technique(stance: Stance, damage: u32) -> Technique {
    Technique {
        id: format!("{}_fixture", stance.name()),
        korean_name: "시험".to_string(),
        english_name: "Fixture Strike".to_string(),
        stance,
        damage: DamageRange::point(damage),
        accuracy: 1.0,
        ki_cost: 10,
        stamina_cost: 5,
        crit_chance: 0.0,
        crit_multiplier: 1.5,
        range: 2.0,
        effects: Vec::new(),
        execution_ms: 300,
        recovery_ms: 300,
    }
}

/// A bout between a Musa (red) and an Amsalja (blue).
///
/// # Panics
///
/// Never: the fixture ids differ.
#[must_use]
pub fn bout(seed: u64) -> Bout {
    bout_with_config(CombatConfig::default(), seed)
}

/// [`bout`] with a custom config.
///
/// # Panics
///
/// Never: the fixture ids differ.
#[must_use]
pub fn bout_with_config(config: CombatConfig, seed: u64) -> Bout {
    Bout::new(
        catalog(),
        config,
        Combatant::new(1, "Red", Archetype::Musa),
        Combatant::new(2, "Blue", Archetype::Amsalja),
        seed,
    )
    .expect("fixture combatants have distinct ids")
}
