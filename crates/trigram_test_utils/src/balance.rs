//! Balance testing utilities.
//!
//! Runs thousands of seeded attack resolutions to measure how each stance
//! pairing actually plays out once accuracy, crits, vital points and the
//! effectiveness matrix interact.

use trigram_core::archetype::Archetype;
use trigram_core::catalog::Catalog;
use trigram_core::combat::{resolve_attack, AttackRequest};
use trigram_core::combatant::Combatant;
use trigram_core::config::CombatConfig;
use trigram_core::rng;
use trigram_core::stance::Stance;

/// Distance every technique in the built-in catalog can reach.
pub const CLOSE_RANGE: f64 = 0.5;

/// Statistics for one attacker/defender stance pairing.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupStats {
    /// Attacker stance.
    pub attacker: Stance,
    /// Defender stance.
    pub defender: Stance,
    /// Resolutions run.
    pub samples: u32,
    /// Strikes that connected.
    pub hits: u32,
    /// Critical strikes.
    pub crits: u32,
    /// Damage summed over every sample.
    pub total_damage: u64,
}

impl MatchupStats {
    /// Fraction of strikes that connected (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        f64::from(self.hits) / f64::from(self.samples)
    }

    /// Average damage per attempted strike.
    #[must_use]
    pub fn avg_damage(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.total_damage as f64 / f64::from(self.samples)
    }
}

/// Resolve `samples` untargeted signature strikes from `attacker` into
/// `defender` at close range.
#[must_use]
pub fn measure_matchup(
    catalog: &Catalog,
    config: &CombatConfig,
    attacker: Stance,
    defender: Stance,
    samples: u32,
    seed: u64,
) -> MatchupStats {
    let striker = Combatant::new(1, "Attacker", Archetype::Musa).with_stance(attacker);
    let target = Combatant::new(2, "Defender", Archetype::Musa).with_stance(defender);
    let technique = catalog.technique_for_stance(attacker);
    let request = AttackRequest::at(CLOSE_RANGE);
    let mut rng = rng::seeded(seed);

    let mut stats = MatchupStats {
        attacker,
        defender,
        samples,
        hits: 0,
        crits: 0,
        total_damage: 0,
    };
    for _ in 0..samples {
        let outcome = resolve_attack(
            &striker, &target, technique, &request, catalog, config, &mut rng,
        );
        if outcome.hit {
            stats.hits += 1;
        }
        if outcome.critical {
            stats.crits += 1;
        }
        stats.total_damage += u64::from(outcome.damage);
    }
    tracing::debug!(
        attacker = %attacker,
        defender = %defender,
        avg_damage = stats.avg_damage(),
        hit_rate = stats.hit_rate(),
        "Matchup measured"
    );
    stats
}

/// Measure all 64 pairings, attacker-major.
#[must_use]
pub fn matchup_matrix(
    catalog: &Catalog,
    config: &CombatConfig,
    samples: u32,
    seed: u64,
) -> Vec<MatchupStats> {
    let mut results = Vec::with_capacity(64);
    for attacker in Stance::all() {
        for defender in Stance::all() {
            results.push(measure_matchup(
                catalog, config, attacker, defender, samples, seed,
            ));
        }
    }
    results
}

/// Ratio of a stance's average damage against its counter target to its
/// average damage against a mirror opponent.
#[must_use]
pub fn counter_advantage(
    catalog: &Catalog,
    config: &CombatConfig,
    stance: Stance,
    samples: u32,
    seed: u64,
) -> f64 {
    let countered = measure_matchup(catalog, config, stance, stance.counter(), samples, seed);
    let mirror = measure_matchup(catalog, config, stance, stance, samples, seed);
    if mirror.avg_damage() == 0.0 {
        return 0.0;
    }
    countered.avg_damage() / mirror.avg_damage()
}
