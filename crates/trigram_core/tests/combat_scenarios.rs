//! End-to-end combat scenarios.
//!
//! Each scenario scripts the rolls so the numbers are exact.

use trigram_core::prelude::*;
use trigram_core::transition::TransitionRules;
use trigram_test_utils::fixtures::{duel, fighter, point_technique, with_effect};
use trigram_test_utils::ScriptedRng;

fn resolve(
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
fn counter_matchup_scales_plain_hit() {
    let (attacker, defender) = duel(Stance::Geon, Stance::Gam);
    let catalog = Catalog::builtin();
    assert!((catalog.effectiveness(Stance::Geon, Stance::Gam) - 1.3).abs() < f64::EPSILON);

    let outcome = resolve(
        &attacker,
        &defender,
        &point_technique(Stance::Geon, 25),
        &AttackRequest::at(1.0),
        &CombatConfig::default(),
        &mut ScriptedRng::always_hit(),
    );

    assert!(outcome.hit);
    assert!(!outcome.critical);
    assert!(!outcome.blocked);
    assert_eq!(outcome.vital_point, None);
    assert_eq!(outcome.damage, 32);
}

#[test]
fn low_ki_attack_proceeds_when_gates_are_independent() {
    let mut attacker = fighter(1, Archetype::Hacker, Stance::Geon);
    attacker.ki = 5;
    let defender = fighter(2, Archetype::Musa, Stance::Gam);
    let technique = point_technique(Stance::Geon, 25);
    assert_eq!(technique.ki_cost, 10);

    let rules = TransitionRules::default();
    let transition = rules.execute(&attacker, Stance::Gon, 0);
    assert_eq!(
        transition.reason(),
        Some(&TransitionDenial::InsufficientKi {
            required: 8,
            available: 5
        })
    );

    let outcome = resolve(
        &attacker,
        &defender,
        &technique,
        &AttackRequest::at(1.0),
        &CombatConfig::default(),
        &mut ScriptedRng::always_hit(),
    );
    assert!(!outcome.denied);
    assert!(outcome.hit);
    assert_eq!(outcome.costs.attacker_ki, 5);

    let (after, _) = apply_outcome(&attacker, &defender, &outcome, 0);
    assert_eq!(after.ki, 0);
}

#[test]
fn low_ki_attack_denied_when_gates_are_unified() {
    let mut attacker = fighter(1, Archetype::Hacker, Stance::Geon);
    attacker.ki = 5;
    let defender = fighter(2, Archetype::Musa, Stance::Gam);
    let config = CombatConfig {
        attack_ki_gate: AttackKiGate::Unified,
        ..CombatConfig::default()
    };

    assert!(!TransitionRules::from_config(&config).can_transition(&attacker, Stance::Gon, 0));

    let outcome = resolve(
        &attacker,
        &defender,
        &point_technique(Stance::Geon, 25),
        &AttackRequest::at(1.0),
        &config,
        &mut ScriptedRng::always_hit(),
    );
    assert!(outcome.denied);
    assert!(!outcome.hit);
    assert_eq!(outcome.damage, 0);
    assert!(matches!(
        outcome.events.as_slice(),
        [CombatEvent::AttackDenied {
            required_ki: 10,
            available_ki: 5,
            ..
        }]
    ));
    assert_eq!(apply_outcome(&attacker, &defender, &outcome, 0).0, attacker);
}

#[test]
fn vital_strike_stuns_and_blocks_follow_up_transition() {
    let (attacker, defender) = duel(Stance::Geon, Stance::Geon);
    let catalog = Catalog::builtin();
    let technique = catalog.technique_for_stance(Stance::Geon);

    let outcome = resolve_attack(
        &attacker,
        &defender,
        technique,
        &AttackRequest::at(0.5).targeting("gumi"),
        &catalog,
        &CombatConfig::default(),
        &mut ScriptedRng::always_hit(),
    );
    assert!(outcome.hit);
    assert_eq!(outcome.vital_point, Some(VitalPointId::new("gumi")));
    assert_eq!(outcome.region, Some(Region::Abdomen));
    assert!(outcome.critical);
    assert!(outcome.effects.iter().any(|e| e.kind == EffectKind::Stun));
    assert!(outcome.effects.iter().any(|e| e.kind == EffectKind::Winded));

    let (_, hurt) = apply_outcome(&attacker, &defender, &outcome, 0);
    assert!(hurt.is_stunned());
    assert!(!can_transition_stance(&hurt, Stance::Tae, 0));

    // gumi's 1200 ms stun stands; the technique's own stun is dropped
    assert_eq!(
        hurt.effects
            .iter()
            .filter(|e| e.kind == EffectKind::Stun)
            .count(),
        1
    );
    let still = tick_effects(&hurt, 1_000);
    assert!(still.is_stunned());
    let recovered = tick_effects(&hurt, 1_200);
    assert!(!recovered.is_stunned());
    assert!(can_transition_stance(&recovered, Stance::Tae, 1_200));
}

#[test]
fn guard_absorbs_most_of_a_strike() {
    let (attacker, defender) = duel(Stance::Geon, Stance::Gam);
    let defender = defender.with_blocking(true);
    let outcome = resolve(
        &attacker,
        &defender,
        &point_technique(Stance::Geon, 40),
        &AttackRequest::at(1.0),
        &CombatConfig::default(),
        &mut ScriptedRng::always_hit(),
    );
    assert!(outcome.blocked);
    assert_eq!(outcome.damage, 12);

    let (_, after) = apply_outcome(&attacker, &defender, &outcome, 0);
    assert_eq!(after.health, defender.health - 12);
    assert_eq!(after.stamina, defender.stamina - 5);
}

#[test]
fn attacking_drops_the_guard_and_commits() {
    let (attacker, defender) = duel(Stance::Geon, Stance::Gam);
    let attacker = attacker.with_blocking(true);
    let outcome = resolve(
        &attacker,
        &defender,
        &point_technique(Stance::Geon, 10),
        &AttackRequest::at(1.0),
        &CombatConfig::default(),
        &mut ScriptedRng::always_miss(),
    );
    assert!(!outcome.hit);

    let (after, _) = apply_outcome(&attacker, &defender, &outcome, 2_000);
    assert!(!after.blocking);
    assert!(after.is_mid_attack(2_299));
    assert!(!after.is_mid_attack(2_300));
    assert_eq!(
        TransitionRules::default().check(&after, Stance::Tae, 2_100),
        Err(TransitionDenial::MidAttack)
    );
}

#[test]
fn bleed_drains_health_over_time() {
    let (_, defender) = duel(Stance::Geon, Stance::Gam);
    let bleeding = with_effect(&defender, EffectKind::Bleed, 1.0);
    let later = tick_effects(&bleeding, 5_000);
    assert!(later.health < defender.health);
    assert!(later.has_effect(EffectKind::Bleed));

    let healed = tick_effects(&later, 5_000);
    assert!(!healed.has_effect(EffectKind::Bleed));
}

#[test]
fn knockout_decides_the_bout() {
    let (attacker, mut defender) = duel(Stance::Geon, Stance::Gam);
    defender.health = 20;
    let outcome = resolve(
        &attacker,
        &defender,
        &point_technique(Stance::Geon, 25),
        &AttackRequest::at(1.0),
        &CombatConfig::default(),
        &mut ScriptedRng::always_hit(),
    );
    let (attacker, defender) = apply_outcome(&attacker, &defender, &outcome, 0);
    let result = check_win_condition([&attacker, &defender], 60_000, TieBreak::Draw);
    assert_eq!(result.phase, MatchPhase::Victory);
    assert_eq!(result.winner, Some(attacker.id));
}
