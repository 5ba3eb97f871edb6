//! Bout driver.
//!
//! Reference host loop for a single two-combatant bout. The [`Bout`] owns
//! the authoritative combatant snapshots, the match clock and the seeded
//! RNG; every action goes through the pure resolvers and the resulting
//! snapshots replace the old ones. The win condition is re-checked after
//! every mutation.
//!
//! Given the same catalog, config, seed and action sequence, two bouts end
//! in identical states (see [`Bout::state_hash`]).

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use std::io;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::anatomy::VitalPointId;
use crate::catalog::Catalog;
use crate::combat::{apply_outcome, resolve_attack, AttackOutcome, AttackRequest};
use crate::combatant::Combatant;
use crate::config::CombatConfig;
use crate::error::{GameError, Result};
use crate::events::CombatEvent;
use crate::rng::{self, CombatRng};
use crate::stance::Stance;
use crate::status;
use crate::transition::{TransitionResult, TransitionRules};
use crate::victory::{check_win_condition, MatchPhase, WinCheck};

/// One side of the bout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    /// Hong (홍), first combatant.
    Red,
    /// Cheong (청), second combatant.
    Blue,
}

impl Corner {
    /// Both corners.
    pub const ALL: [Corner; 2] = [Corner::Red, Corner::Blue];

    const fn index(self) -> usize {
        match self {
            Corner::Red => 0,
            Corner::Blue => 1,
        }
    }

    /// The other corner.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Corner::Red => Corner::Blue,
            Corner::Blue => Corner::Red,
        }
    }
}

/// An event stamped with the match time it happened at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// Match time.
    pub at_ms: u64,
    /// What happened.
    pub event: CombatEvent,
}

/// Serializable state of a bout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoutState {
    /// Red then blue.
    pub combatants: [Combatant; 2],
    /// Elapsed match time.
    pub clock_ms: u64,
    /// Win check after the last mutation.
    pub result: WinCheck,
    /// Every event so far.
    pub log: Vec<TimedEvent>,
}

#[derive(Serialize, Deserialize)]
struct BoutSnapshot {
    config: CombatConfig,
    state: BoutState,
    rng: CombatRng,
}

/// Writes bytes straight into a hasher.
struct HashWriter<'a>(&'a mut DefaultHasher);

impl io::Write for HashWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A bout in progress.
#[derive(Debug, Clone)]
pub struct Bout {
    catalog: Arc<Catalog>,
    config: CombatConfig,
    rules: TransitionRules,
    state: BoutState,
    rng: CombatRng,
}

impl Bout {
    /// Start a bout.
    ///
    /// # Errors
    ///
    /// Returns an error if both combatants share an id.
    pub fn new(
        catalog: Arc<Catalog>,
        config: CombatConfig,
        red: Combatant,
        blue: Combatant,
        seed: u64,
    ) -> Result<Self> {
        if red.id == blue.id {
            return Err(GameError::InvalidState(format!(
                "Both combatants have id {}",
                red.id
            )));
        }
        let rules = TransitionRules::from_config(&config);
        let mut bout = Self {
            catalog,
            config,
            rules,
            state: BoutState {
                combatants: [red, blue],
                clock_ms: 0,
                result: WinCheck {
                    phase: MatchPhase::InProgress,
                    winner: None,
                    reason: None,
                },
                log: Vec::new(),
            },
            rng: rng::seeded(seed),
        };
        tracing::debug!(
            red = bout.state.combatants[0].id,
            blue = bout.state.combatants[1].id,
            seed,
            "Bout started"
        );
        bout.check_win();
        Ok(bout)
    }

    /// The catalog in use.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The config in use.
    #[must_use]
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Full bout state.
    #[must_use]
    pub fn state(&self) -> &BoutState {
        &self.state
    }

    /// One combatant.
    #[must_use]
    pub fn combatant(&self, corner: Corner) -> &Combatant {
        &self.state.combatants[corner.index()]
    }

    /// Elapsed match time.
    #[must_use]
    pub fn clock_ms(&self) -> u64 {
        self.state.clock_ms
    }

    /// Time left on the clock.
    #[must_use]
    pub fn time_remaining_ms(&self) -> u64 {
        self.config.round_duration_ms.saturating_sub(self.state.clock_ms)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> MatchPhase {
        self.state.result.phase
    }

    /// Latest win check.
    #[must_use]
    pub fn result(&self) -> WinCheck {
        self.state.result
    }

    /// Every event so far.
    #[must_use]
    pub fn log(&self) -> &[TimedEvent] {
        &self.state.log
    }

    fn ensure_in_progress(&self) -> Result<()> {
        if self.state.result.is_over() {
            return Err(GameError::InvalidState("Bout is over".to_string()));
        }
        Ok(())
    }

    fn record(&mut self, events: impl IntoIterator<Item = CombatEvent>) {
        let at_ms = self.state.clock_ms;
        self.state
            .log
            .extend(events.into_iter().map(|event| TimedEvent { at_ms, event }));
    }

    fn check_win(&mut self) -> WinCheck {
        let [red, blue] = &self.state.combatants;
        let check = check_win_condition(
            [red, blue],
            self.time_remaining_ms(),
            self.config.tie_break,
        );
        if check.is_over() && !self.state.result.is_over() {
            tracing::info!(
                clock_ms = self.state.clock_ms,
                winner = ?check.winner,
                reason = ?check.reason,
                "Bout ended"
            );
            if let Some(reason) = check.reason {
                self.record([CombatEvent::BoutEnded {
                    winner: check.winner,
                    reason,
                }]);
            }
        }
        self.state.result = check;
        check
    }

    /// `corner` performs its stance's signature technique.
    ///
    /// # Errors
    ///
    /// Returns an error if the bout is over, the attacker cannot act
    /// (defeated, stunned or mid-attack) or the target is unknown.
    pub fn attack(
        &mut self,
        corner: Corner,
        target: Option<VitalPointId>,
        distance: f64,
    ) -> Result<AttackOutcome> {
        self.ensure_in_progress()?;
        let now = self.state.clock_ms;
        let attacker = &self.state.combatants[corner.index()];
        let defender = &self.state.combatants[corner.opponent().index()];

        if attacker.is_defeated() || attacker.is_stunned() || attacker.is_mid_attack(now) {
            return Err(GameError::InvalidState(format!(
                "{} cannot act at {now} ms",
                attacker.name
            )));
        }
        if let Some(id) = &target {
            self.catalog.require_vital_point(id)?;
        }

        let technique = self.catalog.technique_for_stance(attacker.stance);
        let request = AttackRequest { target, distance };
        let outcome = resolve_attack(
            attacker,
            defender,
            technique,
            &request,
            &self.catalog,
            &self.config,
            &mut self.rng,
        );
        let (next_attacker, next_defender) = apply_outcome(attacker, defender, &outcome, now);

        self.state.combatants[corner.index()] = next_attacker;
        self.state.combatants[corner.opponent().index()] = next_defender;
        self.record(outcome.events.iter().cloned());
        self.check_win();
        Ok(outcome)
    }

    /// `corner` tries to change stance.
    ///
    /// # Errors
    ///
    /// Returns an error if the bout is over. A refused change is not an
    /// error.
    pub fn change_stance(&mut self, corner: Corner, to: Stance) -> Result<TransitionResult> {
        self.ensure_in_progress()?;
        let current = self.combatant(corner);
        let from = current.stance;
        let result = self.rules.execute(current, to, self.state.clock_ms);
        if result.success() && from != to {
            let id = current.id;
            self.state.combatants[corner.index()] = result.combatant().clone();
            self.record([CombatEvent::StanceChanged {
                combatant: id,
                from,
                to,
            }]);
        }
        Ok(result)
    }

    /// Raise or lower `corner`'s guard.
    ///
    /// Lowering always succeeds while the bout runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the bout is over, or if the guard is raised by a
    /// combatant that is defeated, stunned or inside its attack window.
    pub fn set_blocking(&mut self, corner: Corner, blocking: bool) -> Result<()> {
        self.ensure_in_progress()?;
        let now = self.state.clock_ms;
        let combatant = &mut self.state.combatants[corner.index()];
        if blocking
            && (combatant.is_defeated() || combatant.is_stunned() || combatant.is_mid_attack(now))
        {
            return Err(GameError::InvalidState(format!(
                "{} cannot guard at {now} ms",
                combatant.name
            )));
        }
        combatant.blocking = blocking;
        Ok(())
    }

    /// Advance the clock, ticking both combatants' effects.
    ///
    /// The clock never runs past the end of the round.
    ///
    /// # Errors
    ///
    /// Returns an error if the bout is over.
    pub fn advance(&mut self, elapsed_ms: u64) -> Result<WinCheck> {
        self.ensure_in_progress()?;
        let step = elapsed_ms.min(self.time_remaining_ms());
        for combatant in &mut self.state.combatants {
            *combatant = status::tick(combatant, step);
        }
        self.state.clock_ms += step;
        tracing::trace!(clock_ms = self.state.clock_ms, step, "Bout advanced");
        Ok(self.check_win())
    }

    /// Hash of the bout state and RNG position.
    ///
    /// Two bouts with identical state produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        let encoded = bincode::serialize_into(HashWriter(&mut hasher), &self.state)
            .and_then(|()| bincode::serialize_into(HashWriter(&mut hasher), &self.rng));
        if let Err(e) = encoded {
            tracing::warn!(error = %e, "Failed to encode bout state for hashing");
        }
        hasher.finish()
    }

    /// Serialize the bout for replay or hand-off.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let snapshot = BoutSnapshot {
            config: self.config.clone(),
            state: self.state.clone(),
            rng: self.rng.clone(),
        };
        bincode::serialize(&snapshot)
            .map_err(|e| GameError::Serialization(format!("Failed to serialize bout: {e}")))
    }

    /// Restore a bout serialized with [`Bout::serialize`].
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid bout.
    pub fn deserialize(data: &[u8], catalog: Arc<Catalog>) -> Result<Self> {
        let snapshot: BoutSnapshot = bincode::deserialize(data)
            .map_err(|e| GameError::Serialization(format!("Failed to deserialize bout: {e}")))?;
        Ok(Self {
            catalog,
            rules: TransitionRules::from_config(&snapshot.config),
            config: snapshot.config,
            state: snapshot.state,
            rng: snapshot.rng,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Archetype;
    use crate::status::{EffectKind, StatusEffect};
    use crate::victory::EndReason;

    fn bout(seed: u64) -> Bout {
        Bout::new(
            Arc::new(Catalog::builtin()),
            CombatConfig::default(),
            Combatant::new(1, "Red", Archetype::Musa),
            Combatant::new(2, "Blue", Archetype::Amsalja),
            seed,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = Bout::new(
            Arc::new(Catalog::builtin()),
            CombatConfig::default(),
            Combatant::new(1, "A", Archetype::Musa),
            Combatant::new(1, "B", Archetype::Musa),
            0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_same_seed_same_hash() {
        fn exchange(bout: &mut Bout) {
            if !bout.result().is_over() {
                bout.attack(Corner::Red, None, 1.0).unwrap();
            }
            if !bout.result().is_over() {
                bout.advance(1_000).unwrap();
            }
        }

        let mut a = bout(42);
        let mut b = bout(42);
        for _ in 0..5 {
            exchange(&mut a);
            exchange(&mut b);
        }
        assert_eq!(a.state_hash(), b.state_hash());
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_mid_attack_cannot_act() {
        let mut b = bout(1);
        b.attack(Corner::Red, None, 1.0).unwrap();
        assert!(b.attack(Corner::Red, None, 1.0).is_err());
        b.advance(1_000).unwrap();
        assert!(b.attack(Corner::Red, None, 1.0).is_ok());
    }

    #[test]
    fn test_guard_locked_during_attack_window() {
        let mut b = bout(1);
        b.attack(Corner::Red, None, 1.0).unwrap();
        let err = b.set_blocking(Corner::Red, true).unwrap_err();
        assert!(matches!(err, GameError::InvalidState(_)));
        assert!(!b.combatant(Corner::Red).blocking);
        b.set_blocking(Corner::Red, false).unwrap();

        let window_end = b.combatant(Corner::Red).action_window_end_ms.unwrap();
        b.advance(window_end - b.clock_ms()).unwrap();
        b.set_blocking(Corner::Red, true).unwrap();
        assert!(b.combatant(Corner::Red).is_guarding());
    }

    #[test]
    fn test_stunned_combatant_cannot_guard() {
        let stunned = status::apply(
            &Combatant::new(2, "Blue", Archetype::Amsalja),
            StatusEffect::new(EffectKind::Stun, 1_000, 1.0, false, "test"),
        );
        let mut b = Bout::new(
            Arc::new(Catalog::builtin()),
            CombatConfig::default(),
            Combatant::new(1, "Red", Archetype::Musa),
            stunned,
            1,
        )
        .unwrap();
        assert!(b.set_blocking(Corner::Blue, true).is_err());
        b.set_blocking(Corner::Blue, false).unwrap();
        b.advance(1_000).unwrap();
        b.set_blocking(Corner::Blue, true).unwrap();
    }

    #[test]
    fn test_unknown_target_is_an_error() {
        let mut b = bout(1);
        let err = b
            .attack(Corner::Red, Some(VitalPointId::new("nowhere")), 1.0)
            .unwrap_err();
        assert!(matches!(err, GameError::UnknownVitalPoint(_)));
    }

    #[test]
    fn test_stance_change_logged() {
        let mut b = bout(1);
        let from = b.combatant(Corner::Blue).stance;
        let to = from.next();
        let result = b.change_stance(Corner::Blue, to).unwrap();
        assert!(result.success());
        assert_eq!(b.combatant(Corner::Blue).stance, to);
        assert!(matches!(
            b.log().last().map(|e| &e.event),
            Some(CombatEvent::StanceChanged { .. })
        ));
    }

    #[test]
    fn test_time_out_ends_bout() {
        let mut b = bout(1);
        let check = b.advance(200_000).unwrap();
        assert_eq!(b.clock_ms(), 90_000);
        assert_eq!(check.phase, MatchPhase::Victory);
        assert_eq!(check.reason, Some(EndReason::TimeOut));
        // Musa has more health than Amsalja
        assert_eq!(check.winner, Some(1));
        assert!(b.advance(1).is_err());
        assert!(b.attack(Corner::Red, None, 1.0).is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut b = bout(9);
        b.attack(Corner::Blue, None, 1.0).unwrap();
        b.advance(250).unwrap();

        let bytes = b.serialize().unwrap();
        let mut restored = Bout::deserialize(&bytes, Arc::new(Catalog::builtin())).unwrap();
        assert_eq!(b.state_hash(), restored.state_hash());

        b.advance(1_000).unwrap();
        restored.advance(1_000).unwrap();
        let left = b.attack(Corner::Red, None, 1.0).unwrap();
        let right = restored.attack(Corner::Red, None, 1.0).unwrap();
        assert_eq!(left, right);
    }
}
