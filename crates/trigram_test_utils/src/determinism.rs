//! Determinism testing utilities.
//!
//! Provides a harness for verifying that bouts produce identical results
//! given identical inputs.
//!
//! # Testing Strategy
//!
//! Combat resolution must be reproducible from a seed. Sources of
//! non-determinism include:
//!
//! - **Ambient randomness**: No calls to thread or OS RNGs. Every roll goes
//!   through the bout's seeded [`trigram_core::rng::CombatRng`].
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Catalog lookups are keyed, and nothing iterates a map to make a
//!   decision.
//!
//! - **Float formatting**: state hashes are taken over the bincode
//!   encoding, which stores exact bit patterns.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual resolver determinism (scripted rolls)
//! 2. **Property tests**: Random inputs must still produce deterministic outputs
//! 3. **Integration tests**: Full scripted bouts are reproducible
//! 4. **Parallel tests**: Running N bouts in parallel all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use trigram_core::anatomy::VitalPointId;
use trigram_core::bout::{Bout, Corner};
use trigram_core::stance::Stance;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps applied.
    pub steps: usize,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic bout).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the runs were deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Bout is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// One scripted host action.
#[derive(Debug, Clone, PartialEq)]
pub enum BoutAction {
    /// A corner attacks.
    Attack {
        /// Attacking corner.
        corner: Corner,
        /// Optional vital point.
        target: Option<VitalPointId>,
        /// Distance between the combatants.
        distance: f64,
    },
    /// A corner changes stance.
    ChangeStance {
        /// Who.
        corner: Corner,
        /// Destination.
        to: Stance,
    },
    /// A corner raises or lowers its guard.
    Block {
        /// Who.
        corner: Corner,
        /// Guard up?
        blocking: bool,
    },
    /// Advance the clock.
    Advance(u64),
}

/// Apply one action. Actions the bout refuses (a stunned attacker, a
/// finished bout) are skipped; the refusal is itself deterministic.
pub fn apply_action(bout: &mut Bout, action: &BoutAction) {
    let result = match action {
        BoutAction::Attack {
            corner,
            target,
            distance,
        } => bout.attack(*corner, target.clone(), *distance).map(|_| ()),
        BoutAction::ChangeStance { corner, to } => bout.change_stance(*corner, *to).map(|_| ()),
        BoutAction::Block { corner, blocking } => bout.set_blocking(*corner, *blocking),
        BoutAction::Advance(ms) => bout.advance(*ms).map(|_| ()),
    };
    if let Err(e) = result {
        tracing::trace!(?action, error = %e, "Scripted action skipped");
    }
}

/// Apply every action in order and return the final hash.
pub fn run_script(bout: &mut Bout, script: &[BoutAction]) -> u64 {
    for action in script {
        apply_action(bout, action);
    }
    bout.state_hash()
}

/// A fixed exchange: stance changes, guards, targeted and untargeted
/// strikes, and enough clock to see effects expire.
#[must_use]
pub fn sample_script() -> Vec<BoutAction> {
    let mut script = Vec::new();
    for round in 0..6u64 {
        script.push(BoutAction::Attack {
            corner: Corner::Red,
            target: (round % 2 == 0).then(|| VitalPointId::new("gumi")),
            distance: 1.0,
        });
        script.push(BoutAction::Advance(700));
        script.push(BoutAction::Block {
            corner: Corner::Red,
            blocking: round % 3 == 0,
        });
        script.push(BoutAction::Attack {
            corner: Corner::Blue,
            target: None,
            distance: 1.0,
        });
        script.push(BoutAction::ChangeStance {
            corner: Corner::Blue,
            to: Stance::from_index(round as usize),
        });
        script.push(BoutAction::Advance(900));
    }
    script
}

/// Run a scripted bout multiple times and verify determinism.
///
/// # Example
///
/// ```ignore
/// use trigram_test_utils::determinism::{sample_script, verify_determinism};
/// use trigram_test_utils::fixtures::bout;
///
/// let result = verify_determinism(5, || bout(7), &sample_script());
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<Setup>(runs: usize, setup: Setup, script: &[BoutAction]) -> DeterminismResult
where
    Setup: Fn() -> Bout,
{
    let hashes: Vec<u64> = (0..runs)
        .map(|_| {
            let mut bout = setup();
            run_script(&mut bout, script)
        })
        .collect();

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps: script.len(),
    }
}

/// Run N bouts on separate threads and collect final hashes.
///
/// This is useful for catching non-determinism that only manifests under
/// thread scheduling variations.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn run_parallel_bouts<F>(setup_fn: F, num_bouts: usize, script: &[BoutAction]) -> DeterminismResult
where
    F: Fn() -> Bout + Sync,
{
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..num_bouts)
            .map(|_| {
                s.spawn(|| {
                    let mut bout = setup_fn();
                    run_script(&mut bout, script)
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        steps: script.len(),
    }
}

/// Compare two runs step by step, finding the first divergence.
///
/// # Returns
///
/// `None` if the runs are deterministic, `Some(step)` if they diverge
/// after that many actions (0 means the initial states differ).
pub fn find_first_divergence<F>(setup_fn: F, script: &[BoutAction]) -> Option<usize>
where
    F: Fn() -> Bout,
{
    let mut first = setup_fn();
    let mut second = setup_fn();

    if first.state_hash() != second.state_hash() {
        return Some(0);
    }

    for (step, action) in script.iter().enumerate() {
        apply_action(&mut first, action);
        apply_action(&mut second, action);

        if first.state_hash() != second.state_hash() {
            return Some(step + 1);
        }
    }

    None
}

/// Verify that a serialization round trip preserves the bout exactly,
/// including the RNG position.
pub fn verify_serialization_determinism<F>(setup_fn: F, script: &[BoutAction]) -> bool
where
    F: Fn() -> Bout,
{
    let (head, tail) = script.split_at(script.len() / 2);

    let mut bout = setup_fn();
    run_script(&mut bout, head);

    let Ok(bytes) = bout.serialize() else {
        return false;
    };
    let Ok(mut restored) = Bout::deserialize(&bytes, std::sync::Arc::new(bout.catalog().clone()))
    else {
        return false;
    };

    if bout.state_hash() != restored.state_hash() {
        return false;
    }

    run_script(&mut bout, tail) == run_script(&mut restored, tail)
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for combat testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of the resolvers.
pub mod strategies {
    use proptest::prelude::*;
    use trigram_core::archetype::Archetype;
    use trigram_core::bout::Corner;
    use trigram_core::combatant::Combatant;
    use trigram_core::stance::Stance;

    use super::BoutAction;

    /// Any stance.
    pub fn arb_stance() -> impl Strategy<Value = Stance> {
        (0usize..8).prop_map(Stance::from_index)
    }

    /// Any archetype.
    pub fn arb_archetype() -> impl Strategy<Value = Archetype> {
        prop::sample::select(Archetype::ALL.to_vec())
    }

    /// Any corner.
    pub fn arb_corner() -> impl Strategy<Value = Corner> {
        prop::sample::select(Corner::ALL.to_vec())
    }

    /// Ki or stamina level, including empty.
    pub fn arb_resource() -> impl Strategy<Value = u32> {
        0u32..=150
    }

    /// Distance between combatants, in and out of reach.
    pub fn arb_distance() -> impl Strategy<Value = f64> {
        0.0f64..3.0
    }

    /// A healthy combatant with arbitrary stance and pools.
    pub fn arb_combatant(id: u32) -> impl Strategy<Value = Combatant> {
        (arb_archetype(), arb_stance(), arb_resource(), arb_resource()).prop_map(
            move |(archetype, stance, ki, stamina)| {
                let mut combatant = Combatant::new(id, format!("Fighter {id}"), archetype)
                    .with_stance(stance);
                combatant.ki = ki;
                combatant.stamina = stamina;
                combatant
            },
        )
    }

    /// One untargeted host action.
    pub fn arb_action() -> impl Strategy<Value = BoutAction> {
        prop_oneof![
            (arb_corner(), arb_distance()).prop_map(|(corner, distance)| BoutAction::Attack {
                corner,
                target: None,
                distance,
            }),
            (arb_corner(), arb_stance())
                .prop_map(|(corner, to)| BoutAction::ChangeStance { corner, to }),
            (arb_corner(), any::<bool>())
                .prop_map(|(corner, blocking)| BoutAction::Block { corner, blocking }),
            (0u64..2_000).prop_map(BoutAction::Advance),
        ]
    }

    /// A sequence of host actions.
    pub fn arb_script(max_len: usize) -> impl Strategy<Value = Vec<BoutAction>> {
        prop::collection::vec(arb_action(), 0..max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::bout;

    #[test]
    fn test_sample_script_is_deterministic() {
        verify_determinism(3, || bout(11), &sample_script()).assert_deterministic();
    }

    #[test]
    fn test_parallel_bouts_match() {
        run_parallel_bouts(|| bout(5), 4, &sample_script()).assert_deterministic();
    }

    #[test]
    fn test_no_divergence() {
        assert_eq!(find_first_divergence(|| bout(3), &sample_script()), None);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let script = sample_script();
        let a = run_script(&mut bout(1), &script);
        let b = run_script(&mut bout(2), &script);
        assert_ne!(a, b);
    }

    #[test]
    fn test_serialization_preserves_bout() {
        assert!(verify_serialization_determinism(|| bout(8), &sample_script()));
    }
}
