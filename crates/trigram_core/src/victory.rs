//! Win condition.

use serde::{Deserialize, Serialize};

use crate::combatant::{Combatant, CombatantId};
use crate::config::TieBreak;

/// Phase of a bout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Still being fought.
    #[default]
    InProgress,
    /// One combatant won.
    Victory,
    /// Nobody won.
    Draw,
}

/// Why a bout ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// The loser ran out of health.
    Knockout,
    /// The loser ran out of consciousness.
    Unconscious,
    /// Both were defeated together.
    MutualDefeat,
    /// The clock ran out and health (or the tie-break) decided.
    TimeOut,
}

/// Result of a win check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinCheck {
    /// Current phase.
    pub phase: MatchPhase,
    /// Winner, present only for [`MatchPhase::Victory`].
    pub winner: Option<CombatantId>,
    /// Why the bout ended, absent while in progress.
    pub reason: Option<EndReason>,
}

impl WinCheck {
    const IN_PROGRESS: Self = Self {
        phase: MatchPhase::InProgress,
        winner: None,
        reason: None,
    };

    const fn victory(winner: CombatantId, reason: EndReason) -> Self {
        Self {
            phase: MatchPhase::Victory,
            winner: Some(winner),
            reason: Some(reason),
        }
    }

    const fn draw(reason: EndReason) -> Self {
        Self {
            phase: MatchPhase::Draw,
            winner: None,
            reason: Some(reason),
        }
    }

    /// Has the bout ended?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase != MatchPhase::InProgress
    }
}

fn defeat_reason(loser: &Combatant) -> EndReason {
    if loser.health == 0 {
        EndReason::Knockout
    } else {
        EndReason::Unconscious
    }
}

/// Decide the state of a two-combatant bout.
#[must_use]
pub fn check_win_condition(
    combatants: [&Combatant; 2],
    time_remaining_ms: u64,
    tie_break: TieBreak,
) -> WinCheck {
    let [a, b] = combatants;
    match (a.is_defeated(), b.is_defeated()) {
        (true, true) => return WinCheck::draw(EndReason::MutualDefeat),
        (true, false) => return WinCheck::victory(b.id, defeat_reason(a)),
        (false, true) => return WinCheck::victory(a.id, defeat_reason(b)),
        (false, false) => {}
    }

    if time_remaining_ms > 0 {
        return WinCheck::IN_PROGRESS;
    }

    let by_health = a.health.cmp(&b.health);
    let decided = match tie_break {
        TieBreak::Draw => by_health,
        TieBreak::Consciousness => by_health.then(a.consciousness.cmp(&b.consciousness)),
    };
    match decided {
        std::cmp::Ordering::Greater => WinCheck::victory(a.id, EndReason::TimeOut),
        std::cmp::Ordering::Less => WinCheck::victory(b.id, EndReason::TimeOut),
        std::cmp::Ordering::Equal => WinCheck::draw(EndReason::TimeOut),
    }
}
