//! Typed combat notifications.
//!
//! The core never plays sounds or drives animations. It attaches events to
//! its results and the host decides what to do with them.

use serde::{Deserialize, Serialize};

use crate::anatomy::{Severity, VitalPointId};
use crate::combatant::CombatantId;
use crate::stance::Stance;
use crate::victory::EndReason;

/// Something the presentation layer may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A strike connected.
    AttackLanded {
        /// Attacker.
        attacker: CombatantId,
        /// Defender.
        defender: CombatantId,
        /// Final damage.
        damage: u32,
    },
    /// A strike was critical.
    CriticalHit {
        /// Attacker.
        attacker: CombatantId,
        /// Final damage.
        damage: u32,
    },
    /// A strike found a vital point.
    VitalPointStruck {
        /// Defender.
        defender: CombatantId,
        /// Point struck.
        vital_point: VitalPointId,
        /// Its severity.
        severity: Severity,
    },
    /// A strike was absorbed by a guard.
    AttackBlocked {
        /// Defender who blocked.
        defender: CombatantId,
        /// Damage that still got through.
        damage: u32,
    },
    /// A strike missed.
    AttackMissed {
        /// Attacker.
        attacker: CombatantId,
    },
    /// A strike was refused before it started.
    AttackDenied {
        /// Attacker.
        attacker: CombatantId,
        /// Ki the technique needed.
        required_ki: u32,
        /// Ki available.
        available_ki: u32,
    },
    /// A combatant changed stance.
    StanceChanged {
        /// Who changed.
        combatant: CombatantId,
        /// Previous stance.
        from: Stance,
        /// New stance.
        to: Stance,
    },
    /// The bout ended.
    BoutEnded {
        /// Winner, if any.
        winner: Option<CombatantId>,
        /// Why it ended.
        reason: EndReason,
    },
}
