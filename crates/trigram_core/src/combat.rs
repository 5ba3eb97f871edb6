//! Attack resolution.
//!
//! [`resolve_attack`] turns two combatant snapshots and a technique into an
//! immutable [`AttackOutcome`]; [`apply_outcome`] turns the outcome into new
//! snapshots. Resolution order:
//!
//! 1. ki gate (only with [`AttackKiGate::Unified`])
//! 2. distance-gated hit roll; a miss here is free
//! 3. guard: reduced damage, defender pays stamina, nothing else happens
//! 4. vital-point resolver, then the technique crit roll on general hits
//! 5. stance effectiveness and the attacker's Weakened penalty, floored
//! 6. innate technique effects
//! 7. technique costs, per [`KiCostPolicy`]

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::anatomy::{Region, VitalPointId};
use crate::catalog::Catalog;
use crate::combatant::Combatant;
use crate::config::{AttackKiGate, CombatConfig, KiCostPolicy};
use crate::events::CombatEvent;
use crate::rng;
use crate::status::{self, EffectKind, StatusEffect};
use crate::technique::Technique;
use crate::vital_point::{self, VitalPointHit};

/// What the attacker is trying to do.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttackRequest {
    /// Vital point aimed at, if any.
    pub target: Option<VitalPointId>,
    /// Distance between the combatants.
    pub distance: f64,
}

impl AttackRequest {
    /// Untargeted strike at `distance`.
    #[must_use]
    pub const fn at(distance: f64) -> Self {
        Self {
            target: None,
            distance,
        }
    }

    /// Builder: aim at a vital point.
    #[must_use]
    pub fn targeting(mut self, target: impl Into<VitalPointId>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// Resources an attack consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceCosts {
    /// Ki the attacker spent.
    pub attacker_ki: u32,
    /// Stamina the attacker spent.
    pub attacker_stamina: u32,
    /// Stamina the defender spent blocking.
    pub defender_stamina: u32,
}

/// Result of resolving one attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    /// Did the strike connect (blocked strikes connect)?
    pub hit: bool,
    /// Final damage to the defender's health.
    pub damage: u32,
    /// Critical hit or critical-class vital point.
    pub critical: bool,
    /// Absorbed by a guard.
    pub blocked: bool,
    /// Refused before it started.
    pub denied: bool,
    /// Vital point struck.
    pub vital_point: Option<VitalPointId>,
    /// Region of the vital point struck.
    pub region: Option<Region>,
    /// Effects to apply to the defender.
    pub effects: Vec<StatusEffect>,
    /// Consciousness the defender loses.
    pub consciousness_loss: u32,
    /// Balance the defender loses.
    pub balance_loss: u32,
    /// Resources consumed.
    pub costs: ResourceCosts,
    /// Technique used.
    pub technique_id: String,
    /// Execution window the attacker is committed to.
    pub execution_ms: u64,
    /// Human-readable summary.
    pub description: String,
    /// Notifications for the host.
    pub events: Vec<CombatEvent>,
}

impl AttackOutcome {
    fn empty(technique: &Technique) -> Self {
        Self {
            hit: false,
            damage: 0,
            critical: false,
            blocked: false,
            denied: false,
            vital_point: None,
            region: None,
            effects: Vec::new(),
            consciousness_loss: 0,
            balance_loss: 0,
            costs: ResourceCosts::default(),
            technique_id: technique.id.clone(),
            execution_ms: technique.execution_ms,
            description: String::new(),
            events: Vec::new(),
        }
    }

    /// Violations of the outcome invariants.
    #[must_use]
    pub fn check_invariants(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.hit {
            if self.damage != 0 {
                errors.push(format!("miss dealt {} damage", self.damage));
            }
            if !self.effects.is_empty() {
                errors.push("miss applied effects".to_string());
            }
            if self.vital_point.is_some() {
                errors.push("miss struck a vital point".to_string());
            }
        }
        if self.blocked {
            if self.vital_point.is_some() {
                errors.push("blocked strike reached a vital point".to_string());
            }
            if self.critical {
                errors.push("blocked strike was critical".to_string());
            }
        }
        if self.denied && (self.hit || self.costs != ResourceCosts::default()) {
            errors.push("denied attack had consequences".to_string());
        }
        errors
    }
}

/// Costs the attacker pays for committing `technique`.
fn technique_costs(attacker: &Combatant, technique: &Technique) -> ResourceCosts {
    ResourceCosts {
        attacker_ki: technique.ki_cost.min(attacker.ki),
        attacker_stamina: technique.stamina_cost.min(attacker.stamina),
        defender_stamina: 0,
    }
}

/// Resolve one attack. Never fails: every combination of valid inputs
/// produces a hit, miss, block or denial.
///
/// An unknown `request.target` is treated as an untargeted strike.
pub fn resolve_attack<R: Rng + ?Sized>(
    attacker: &Combatant,
    defender: &Combatant,
    technique: &Technique,
    request: &AttackRequest,
    catalog: &Catalog,
    config: &CombatConfig,
    rng: &mut R,
) -> AttackOutcome {
    let outcome = resolve(attacker, defender, technique, request, catalog, config, rng);

    #[cfg(feature = "debug-validation")]
    {
        let violations = outcome.check_invariants();
        debug_assert!(violations.is_empty(), "{violations:?}");
    }

    outcome
}

fn resolve<R: Rng + ?Sized>(
    attacker: &Combatant,
    defender: &Combatant,
    technique: &Technique,
    request: &AttackRequest,
    catalog: &Catalog,
    config: &CombatConfig,
    rng: &mut R,
) -> AttackOutcome {
    let mut outcome = AttackOutcome::empty(technique);

    if config.attack_ki_gate == AttackKiGate::Unified && attacker.ki < technique.ki_cost {
        outcome.denied = true;
        outcome.description = format!(
            "{} cannot perform {}: insufficient ki ({}/{})",
            attacker.name, technique.english_name, attacker.ki, technique.ki_cost
        );
        outcome.events.push(CombatEvent::AttackDenied {
            attacker: attacker.id,
            required_ki: technique.ki_cost,
            available_ki: attacker.ki,
        });
        tracing::debug!(attacker = attacker.id, technique = %technique.id, "Attack denied");
        return outcome;
    }

    let in_range = request.distance <= technique.range;
    let reach_chance = if in_range { config.base_hit_chance } else { 0.0 };
    let hit_chance = reach_chance
        * (1.0 - config.disoriented_hit_penalty * attacker.intensity_of(EffectKind::Disoriented));
    if !rng::roll(rng, hit_chance) {
        outcome.description = format!("{}'s {} misses", attacker.name, technique.english_name);
        outcome.events.push(CombatEvent::AttackMissed {
            attacker: attacker.id,
        });
        tracing::debug!(
            attacker = attacker.id,
            technique = %technique.id,
            distance = request.distance,
            in_range,
            "Attack evaded"
        );
        return outcome;
    }

    if defender.is_guarding() {
        let base = technique.damage.roll(rng);
        outcome.hit = true;
        outcome.blocked = true;
        outcome.damage = (f64::from(base) * (1.0 - config.block_effectiveness)).floor() as u32;
        outcome.costs = ResourceCosts {
            defender_stamina: config.block_stamina_cost.min(defender.stamina),
            ..technique_costs(attacker, technique)
        };
        outcome.description = format!(
            "{} blocks {}'s {}, taking {} damage",
            defender.name, attacker.name, technique.english_name, outcome.damage
        );
        outcome.events.push(CombatEvent::AttackBlocked {
            defender: defender.id,
            damage: outcome.damage,
        });
        tracing::debug!(
            attacker = attacker.id,
            defender = defender.id,
            damage = outcome.damage,
            "Attack blocked"
        );
        return outcome;
    }

    let target = request.target.as_ref().and_then(|id| {
        let point = catalog.vital_point(id);
        if point.is_none() {
            tracing::warn!(vital_point = %id, "Unknown vital point target ignored");
        }
        point
    });

    let Some(hit) = vital_point::resolve(technique, target, request.distance, &config.accuracy, rng)
    else {
        if config.ki_cost_policy == KiCostPolicy::Always {
            outcome.costs = technique_costs(attacker, technique);
        }
        outcome.description = format!("{}'s {} misses", attacker.name, technique.english_name);
        outcome.events.push(CombatEvent::AttackMissed {
            attacker: attacker.id,
        });
        tracing::debug!(attacker = attacker.id, technique = %technique.id, "Attack missed");
        return outcome;
    };

    let raw = match hit {
        VitalPointHit::Vital(strike) => {
            outcome.critical = strike.critical;
            outcome.vital_point = Some(strike.id);
            outcome.region = Some(strike.region);
            outcome.effects = strike.effects;
            f64::from(strike.damage)
        }
        VitalPointHit::General { damage } => {
            if rng::roll(rng, technique.crit_chance) {
                outcome.critical = true;
                f64::from(damage) * technique.crit_multiplier
            } else {
                f64::from(damage)
            }
        }
    };

    let effectiveness = catalog.effectiveness(attacker.stance, defender.stance);
    let weakened =
        1.0 - config.weakened_damage_penalty * attacker.intensity_of(EffectKind::Weakened);
    outcome.hit = true;
    outcome.damage = (raw * effectiveness * weakened).floor() as u32;

    for spec in &technique.effects {
        if rng::roll(rng, spec.chance) {
            let effect = spec.instantiate(&technique.id);
            // A vital point's effect outranks a non-stackable one of the same kind.
            let duplicate = outcome.effects.iter().any(|e| {
                e.kind == effect.kind && (e.source == effect.source || !effect.stackable)
            });
            if !duplicate {
                outcome.effects.push(effect);
            }
        }
    }

    if let Some(region) = outcome.region {
        let damage = f64::from(outcome.damage);
        outcome.consciousness_loss = (damage * region.consciousness_factor()).floor() as u32;
        outcome.balance_loss = (damage * region.balance_factor()).floor() as u32;
    }

    outcome.costs = technique_costs(attacker, technique);

    outcome.events.push(CombatEvent::AttackLanded {
        attacker: attacker.id,
        defender: defender.id,
        damage: outcome.damage,
    });
    if outcome.critical {
        outcome.events.push(CombatEvent::CriticalHit {
            attacker: attacker.id,
            damage: outcome.damage,
        });
    }
    if let (Some(id), Some(point)) = (&outcome.vital_point, target) {
        outcome.events.push(CombatEvent::VitalPointStruck {
            defender: defender.id,
            vital_point: id.clone(),
            severity: point.severity,
        });
        outcome.description = format!(
            "{}'s {} strikes {}'s {} for {} damage",
            attacker.name, technique.english_name, defender.name, point.english_name, outcome.damage
        );
    } else {
        outcome.description = format!(
            "{}'s {} hits {} for {} damage{}",
            attacker.name,
            technique.english_name,
            defender.name,
            outcome.damage,
            if outcome.critical { " (critical)" } else { "" }
        );
    }

    tracing::debug!(
        attacker = attacker.id,
        defender = defender.id,
        technique = %technique.id,
        damage = outcome.damage,
        critical = outcome.critical,
        vital_point = ?outcome.vital_point,
        effectiveness,
        effects = outcome.effects.len(),
        "Attack landed"
    );

    outcome
}

/// Apply an outcome, returning new attacker and defender snapshots.
///
/// A denied attack changes nothing. Any other attack commits the attacker:
/// it drops the guard and opens the execution window at `now_ms`.
#[must_use]
pub fn apply_outcome(
    attacker: &Combatant,
    defender: &Combatant,
    outcome: &AttackOutcome,
    now_ms: u64,
) -> (Combatant, Combatant) {
    if outcome.denied {
        return (attacker.clone(), defender.clone());
    }

    let mut next_attacker = attacker.clone();
    next_attacker.ki = next_attacker.ki.saturating_sub(outcome.costs.attacker_ki);
    next_attacker.stamina = next_attacker
        .stamina
        .saturating_sub(outcome.costs.attacker_stamina);
    next_attacker.blocking = false;
    next_attacker.last_action_ms = Some(now_ms);
    next_attacker.action_window_end_ms = Some(now_ms.saturating_add(outcome.execution_ms));

    let mut next_defender = defender.clone();
    next_defender.stamina = next_defender
        .stamina
        .saturating_sub(outcome.costs.defender_stamina);
    next_defender.health = next_defender.health.saturating_sub(outcome.damage);
    next_defender.consciousness = next_defender
        .consciousness
        .saturating_sub(outcome.consciousness_loss);
    next_defender.balance = next_defender.balance.saturating_sub(outcome.balance_loss);
    for effect in &outcome.effects {
        next_defender = status::apply(&next_defender, effect.clone());
    }
    if next_defender.is_stunned() {
        next_defender.blocking = false;
    }

    (next_attacker, next_defender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Archetype;
    use crate::rng::ScriptedRng;
    use crate::stance::Stance;
    use crate::status::EffectSpec;
    use crate::technique::DamageRange;

    fn strike(damage: u32) -> Technique {
        Technique {
            id: "test_strike".to_string(),
            korean_name: "시험".to_string(),
            english_name: "Test Strike".to_string(),
            stance: Stance::Geon,
            damage: DamageRange::point(damage),
            accuracy: 1.0,
            ki_cost: 10,
            stamina_cost: 6,
            crit_chance: 0.0,
            crit_multiplier: 2.0,
            range: 1.5,
            effects: vec![],
            execution_ms: 400,
            recovery_ms: 600,
        }
    }

    fn fighters() -> (Combatant, Combatant) {
        (
            Combatant::new(1, "Attacker", Archetype::Musa).with_stance(Stance::Geon),
            Combatant::new(2, "Defender", Archetype::Amsalja).with_stance(Stance::Gam),
        )
    }

    fn resolve_with(
        attacker: &Combatant,
        defender: &Combatant,
        technique: &Technique,
        request: &AttackRequest,
        config: &CombatConfig,
        rng: &mut ScriptedRng,
    ) -> AttackOutcome {
        resolve_attack(
            attacker,
            defender,
            technique,
            request,
            &Catalog::builtin(),
            config,
            rng,
        )
    }

    #[test]
    fn test_counter_matchup_damage() {
        let (a, d) = fighters();
        let outcome = resolve_with(
            &a,
            &d,
            &strike(25),
            &AttackRequest::at(1.0),
            &CombatConfig::default(),
            &mut ScriptedRng::always_hit(),
        );
        assert!(outcome.hit);
        assert!(!outcome.critical);
        assert_eq!(outcome.damage, 32);
        assert!(outcome.check_invariants().is_empty());
    }

    #[test]
    fn test_out_of_range_is_a_free_miss() {
        let (a, d) = fighters();
        let mut rng = ScriptedRng::always_hit();
        let outcome = resolve_with(
            &a,
            &d,
            &strike(25),
            &AttackRequest::at(3.0),
            &CombatConfig::default(),
            &mut rng,
        );
        assert!(!outcome.hit);
        assert_eq!(outcome.costs, ResourceCosts::default());
        assert!(matches!(
            outcome.events.as_slice(),
            [CombatEvent::AttackMissed { .. }]
        ));
    }

    #[test]
    fn test_accuracy_miss_charges_per_policy() {
        let (a, d) = fighters();
        let mut technique = strike(25);
        technique.accuracy = 0.5;
        // hit roll passes, accuracy fails
        let script = || ScriptedRng::new(vec![0.0, 0.9]);

        let always = resolve_with(
            &a,
            &d,
            &technique,
            &AttackRequest::at(0.0),
            &CombatConfig::default(),
            &mut script(),
        );
        assert!(!always.hit);
        assert_eq!(always.costs.attacker_ki, 10);

        let config = CombatConfig {
            ki_cost_policy: KiCostPolicy::OnHitOnly,
            ..CombatConfig::default()
        };
        let on_hit = resolve_with(&a, &d, &technique, &AttackRequest::at(0.0), &config, &mut script());
        assert_eq!(on_hit.costs, ResourceCosts::default());
    }

    #[test]
    fn test_block_reduces_damage_and_costs_defender() {
        let (a, d) = fighters();
        let d = d.with_blocking(true);
        let outcome = resolve_with(
            &a,
            &d,
            &strike(25),
            &AttackRequest::at(1.0).targeting("gumi"),
            &CombatConfig::default(),
            &mut ScriptedRng::always_hit(),
        );
        assert!(outcome.blocked);
        assert!(!outcome.critical);
        assert_eq!(outcome.vital_point, None);
        // floor(25 * 0.3)
        assert_eq!(outcome.damage, 7);
        assert_eq!(outcome.costs.defender_stamina, 5);
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn test_stunned_defender_cannot_block() {
        let (a, d) = fighters();
        let d = status::apply(
            &d.with_blocking(true),
            StatusEffect::new(EffectKind::Stun, 1_000, 1.0, false, "x"),
        );
        let outcome = resolve_with(
            &a,
            &d,
            &strike(25),
            &AttackRequest::at(1.0),
            &CombatConfig::default(),
            &mut ScriptedRng::always_hit(),
        );
        assert!(!outcome.blocked);
        assert_eq!(outcome.damage, 32);
    }

    #[test]
    fn test_general_crit() {
        let (a, d) = fighters();
        let mut technique = strike(20);
        technique.crit_chance = 0.5;
        let d = d.with_stance(Stance::Geon);
        let outcome = resolve_with(
            &a,
            &d,
            &technique,
            &AttackRequest::at(1.0),
            &CombatConfig::default(),
            &mut ScriptedRng::always_hit(),
        );
        assert!(outcome.critical);
        assert_eq!(outcome.damage, 40);
        assert!(outcome
            .events
            .iter()
            .any(|e| matches!(e, CombatEvent::CriticalHit { .. })));
    }

    #[test]
    fn test_vital_hit_drains_consciousness() {
        let (a, d) = fighters();
        let d = d.with_stance(Stance::Geon);
        // baekhoe: Head, Critical, x1.6, stun 2000
        let outcome = resolve_with(
            &a,
            &d,
            &strike(10),
            &AttackRequest::at(1.0).targeting("baekhoe"),
            &CombatConfig::default(),
            &mut ScriptedRng::always_hit(),
        );
        // 10 * 1.6 * 2.0 = 32 >= base damage 20
        assert_eq!(outcome.damage, 32);
        assert!(outcome.critical);
        assert_eq!(outcome.vital_point, Some(VitalPointId::new("baekhoe")));
        assert_eq!(outcome.consciousness_loss, 16);
        assert_eq!(outcome.balance_loss, 3);
        assert_eq!(outcome.effects[0].kind, EffectKind::Stun);
    }

    #[test]
    fn test_innate_effects_deduplicated() {
        let (a, d) = fighters();
        let mut technique = strike(10);
        let bleed = EffectSpec::new(EffectKind::Bleed, 1_000, 0.5, true, 1.0);
        technique.effects = vec![bleed.clone(), bleed];
        let outcome = resolve_with(
            &a,
            &d,
            &technique,
            &AttackRequest::at(1.0),
            &CombatConfig::default(),
            &mut ScriptedRng::always_hit(),
        );
        assert_eq!(outcome.effects.len(), 1);
        assert_eq!(outcome.effects[0].source, "test_strike");
    }

    #[test]
    fn test_vital_stun_survives_technique_stun() {
        let catalog = Catalog::builtin();
        let (a, d) = fighters();
        let d = d.with_stance(Stance::Geon);
        let technique = catalog.technique_for_stance(Stance::Geon);
        let outcome = resolve_with(
            &a,
            &d,
            technique,
            &AttackRequest::at(1.0).targeting("baekhoe"),
            &CombatConfig::default(),
            &mut ScriptedRng::always_hit(),
        );
        let stuns: Vec<_> = outcome
            .effects
            .iter()
            .filter(|e| e.kind == EffectKind::Stun)
            .collect();
        assert_eq!(stuns.len(), 1);
        assert_eq!(stuns[0].source, "baekhoe");
        assert_eq!(stuns[0].remaining_ms, 2_000);

        let (_, d2) = apply_outcome(&a, &d, &outcome, 0);
        let stun = d2
            .effects
            .iter()
            .find(|e| e.kind == EffectKind::Stun)
            .unwrap();
        assert_eq!(stun.remaining_ms, 2_000);
    }

    #[test]
    fn test_weakened_and_disoriented_attacker() {
        let (a, d) = fighters();
        let d = d.with_stance(Stance::Geon);
        let weak = status::apply(
            &a,
            StatusEffect::new(EffectKind::Weakened, 1_000, 1.0, false, "x"),
        );
        let outcome = resolve_with(
            &weak,
            &d,
            &strike(20),
            &AttackRequest::at(1.0),
            &CombatConfig::default(),
            &mut ScriptedRng::always_hit(),
        );
        assert_eq!(outcome.damage, 15);

        // 0.9 * (1 - 0.3) = 0.63
        let dizzy = status::apply(
            &a,
            StatusEffect::new(EffectKind::Disoriented, 1_000, 1.0, false, "x"),
        );
        let outcome = resolve_with(
            &dizzy,
            &d,
            &strike(20),
            &AttackRequest::at(1.0),
            &CombatConfig::default(),
            &mut ScriptedRng::new(vec![0.7]),
        );
        assert!(!outcome.hit);
    }

    #[test]
    fn test_ki_gate_modes() {
        let (mut a, d) = fighters();
        a.ki = 5;
        let technique = strike(25);

        let independent = resolve_with(
            &a,
            &d,
            &technique,
            &AttackRequest::at(1.0),
            &CombatConfig::default(),
            &mut ScriptedRng::always_hit(),
        );
        assert!(independent.hit);
        assert_eq!(independent.costs.attacker_ki, 5);

        let config = CombatConfig {
            attack_ki_gate: AttackKiGate::Unified,
            ..CombatConfig::default()
        };
        let mut rng = ScriptedRng::new(vec![0.0]);
        let unified = resolve_with(&a, &d, &technique, &AttackRequest::at(1.0), &config, &mut rng);
        assert!(unified.denied);
        assert!(!unified.hit);
        assert_eq!(rng.remaining(), 1);
        assert!(unified.check_invariants().is_empty());
    }

    #[test]
    fn test_apply_outcome() {
        let (a, d) = fighters();
        let d = d.with_stance(Stance::Geon);
        let outcome = resolve_with(
            &a,
            &d,
            &strike(10),
            &AttackRequest::at(1.0).targeting("baekhoe"),
            &CombatConfig::default(),
            &mut ScriptedRng::always_hit(),
        );
        let (a2, d2) = apply_outcome(&a, &d, &outcome, 1_000);

        assert_eq!(a2.ki, a.ki - 10);
        assert_eq!(a2.stamina, a.stamina - 6);
        assert_eq!(a2.action_window_end_ms, Some(1_400));
        assert!(a2.is_mid_attack(1_200));
        assert_eq!(d2.health, d.health - 32);
        assert_eq!(d2.consciousness, 100 - 16);
        assert!(d2.is_stunned());
    }

    #[test]
    fn test_denied_outcome_changes_nothing() {
        let (mut a, d) = fighters();
        a.ki = 0;
        let config = CombatConfig {
            attack_ki_gate: AttackKiGate::Unified,
            ..CombatConfig::default()
        };
        let outcome = resolve_with(
            &a,
            &d,
            &strike(25),
            &AttackRequest::at(1.0),
            &config,
            &mut ScriptedRng::always_hit(),
        );
        let (a2, d2) = apply_outcome(&a, &d, &outcome, 500);
        assert_eq!(a2, a);
        assert_eq!(d2, d);
    }
}
