//! # Trigram Core
//!
//! Deterministic combat resolution core for trigram martial-arts bouts.
//!
//! This crate contains **only** combat rules:
//! - No rendering
//! - No IO
//! - No audio side effects (results carry typed events instead)
//! - No system randomness (every roll goes through an injected RNG)
//!
//! This separation enables:
//! - Reproducible bouts from a seed
//! - Scripted-roll unit tests
//! - Replay and hand-off via serialized bout state
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`stance`] - The eight trigram stances and their ring
//! - [`effectiveness`] - Attacker/defender stance multipliers
//! - [`transition`] - Stance change costs and gating
//! - [`vital_point`] - Vital-point resolution
//! - [`combat`] - Attack resolution and outcome application
//! - [`status`] - Status effect ledger
//! - [`victory`] - Win condition
//! - [`catalog`] - Validated techniques, vital points and matrix
//! - [`bout`] - Reference host loop

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod anatomy;
pub mod archetype;
pub mod bout;
pub mod catalog;
pub mod combat;
pub mod combatant;
pub mod config;
pub mod data;
pub mod effectiveness;
pub mod error;
pub mod events;
pub mod rng;
pub mod stance;
pub mod status;
pub mod technique;
pub mod transition;
pub mod victory;
pub mod vital_point;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::anatomy::{Region, Severity, VitalPoint, VitalPointId};
    pub use crate::archetype::Archetype;
    pub use crate::bout::{Bout, Corner};
    pub use crate::catalog::Catalog;
    pub use crate::combat::{apply_outcome, resolve_attack, AttackOutcome, AttackRequest};
    pub use crate::combatant::{Combatant, CombatantId};
    pub use crate::config::{AttackKiGate, CombatConfig, KiCostPolicy, TieBreak};
    pub use crate::effectiveness::EffectivenessMatrix;
    pub use crate::error::{GameError, Result};
    pub use crate::events::CombatEvent;
    pub use crate::rng::{CombatRng, ScriptedRng};
    pub use crate::stance::Stance;
    pub use crate::status::{tick as tick_effects, EffectKind, StatusEffect};
    pub use crate::technique::{DamageRange, Technique};
    pub use crate::transition::{
        can_transition_stance, execute_stance_transition, TransitionCost, TransitionDenial,
        TransitionResult, TransitionRules,
    };
    pub use crate::victory::{check_win_condition, MatchPhase, WinCheck};
}
