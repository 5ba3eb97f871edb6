//! Stance transitions.
//!
//! Moving between stances costs ki, stamina and time. Cost grows with the
//! distance around the ring, falls when moving into one of the archetype's
//! favored stances and rises when the combatant is badly hurt. Lost balance
//! slows the move down without making it more expensive.
//!
//! A denied transition is data ([`TransitionDenial`]), never an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combatant::{Combatant, MAX_BALANCE};
use crate::config::CombatConfig;
use crate::stance::{Stance, STANCE_COUNT};

/// Ki spent on a one-step transition.
pub const BASE_KI_COST: u32 = 8;

/// Stamina spent on a one-step transition.
pub const BASE_STAMINA_COST: u32 = 12;

/// Duration of a one-step transition.
pub const BASE_TIME_MS: u64 = 300;

/// Cost multiplier when moving into a favored stance.
pub const FAVORED_MODIFIER: f64 = 0.8;

/// Cost multiplier while wounded.
pub const WOUNDED_MODIFIER: f64 = 1.25;

/// Difficulty by ring distance (index 0 unused).
const DISTANCE_FACTORS: [f64; 5] = [0.0, 1.0, 1.4, 1.8, 2.2];

/// Resources and time a transition takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TransitionCost {
    /// Ki spent.
    pub ki: u32,
    /// Stamina spent.
    pub stamina: u32,
    /// Time the move takes.
    pub time_ms: u64,
}

impl TransitionCost {
    /// The free same-stance transition.
    pub const ZERO: Self = Self {
        ki: 0,
        stamina: 0,
        time_ms: 0,
    };

    /// Ki and stamina combined.
    #[must_use]
    pub const fn total_resources(&self) -> u32 {
        self.ki + self.stamina
    }

    fn scaled(distance: usize, resource_scale: f64, time_scale: f64) -> Self {
        let factor = DISTANCE_FACTORS[distance] * resource_scale;
        Self {
            ki: (f64::from(BASE_KI_COST) * factor).round() as u32,
            stamina: (f64::from(BASE_STAMINA_COST) * factor).round() as u32,
            time_ms: (BASE_TIME_MS as f64 * factor * time_scale).round() as u64,
        }
    }
}

impl std::ops::Add for TransitionCost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            ki: self.ki + rhs.ki,
            stamina: self.stamina + rhs.stamina,
            time_ms: self.time_ms + rhs.time_ms,
        }
    }
}

/// Why a stance change was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TransitionDenial {
    /// Health or consciousness is gone.
    #[error("Cannot change stance: incapacitated")]
    Incapacitated,
    /// Stunned or paralysed.
    #[error("Cannot change stance: stunned")]
    Stunned,
    /// Still executing a technique.
    #[error("Cannot change stance: mid-attack")]
    MidAttack,
    /// Changed stance too recently.
    #[error("Cannot change stance: cooldown active ({remaining_ms} ms remaining)")]
    Cooldown {
        /// Time until the next change is allowed.
        remaining_ms: u64,
    },
    /// Not enough ki.
    #[error("Cannot change stance: insufficient ki ({available}/{required})")]
    InsufficientKi {
        /// Ki the transition costs.
        required: u32,
        /// Ki the combatant has.
        available: u32,
    },
    /// Not enough stamina.
    #[error("Cannot change stance: insufficient stamina ({available}/{required})")]
    InsufficientStamina {
        /// Stamina the transition costs.
        required: u32,
        /// Stamina the combatant has.
        available: u32,
    },
}

/// Result of attempting a stance change.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionResult {
    /// The change happened.
    Completed {
        /// Combatant in the new stance with costs deducted.
        combatant: Combatant,
        /// What it cost.
        cost: TransitionCost,
    },
    /// The change was refused.
    Denied {
        /// The unchanged combatant.
        combatant: Combatant,
        /// Why.
        reason: TransitionDenial,
    },
}

impl TransitionResult {
    /// Did the change happen?
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// The resulting combatant either way.
    #[must_use]
    pub fn combatant(&self) -> &Combatant {
        match self {
            Self::Completed { combatant, .. } | Self::Denied { combatant, .. } => combatant,
        }
    }

    /// Consume the result, keeping the combatant.
    #[must_use]
    pub fn into_combatant(self) -> Combatant {
        match self {
            Self::Completed { combatant, .. } | Self::Denied { combatant, .. } => combatant,
        }
    }

    /// Denial reason, if refused.
    #[must_use]
    pub fn reason(&self) -> Option<&TransitionDenial> {
        match self {
            Self::Completed { .. } => None,
            Self::Denied { reason, .. } => Some(reason),
        }
    }
}

/// Cost of a transition for an archetype-neutral, healthy combatant.
#[must_use]
pub fn neutral_cost(from: Stance, to: Stance) -> TransitionCost {
    if from == to {
        return TransitionCost::ZERO;
    }
    TransitionCost::scaled(from.distance(to), 1.0, 1.0)
}

/// Cost of moving `combatant` from `from` to `to`.
#[must_use]
pub fn transition_cost(from: Stance, to: Stance, combatant: &Combatant) -> TransitionCost {
    if from == to {
        return TransitionCost::ZERO;
    }
    let mut resource_scale = 1.0;
    if combatant.archetype.favors(to) {
        resource_scale *= FAVORED_MODIFIER;
    }
    if combatant.is_wounded() {
        resource_scale *= WOUNDED_MODIFIER;
    }
    let lost_balance = MAX_BALANCE.saturating_sub(combatant.balance.min(MAX_BALANCE));
    let time_scale = 1.0 + f64::from(lost_balance) / 200.0;
    TransitionCost::scaled(from.distance(to), resource_scale, time_scale)
}

/// Shortest walk from `from` to `to`, excluding both ends. Clockwise wins
/// ties.
#[must_use]
pub fn optimal_path(from: Stance, to: Stance) -> Vec<Stance> {
    let clockwise = from.clockwise_steps(to);
    let (steps, step): (usize, fn(Stance) -> Stance) = if clockwise <= STANCE_COUNT - clockwise
    {
        (clockwise, Stance::next)
    } else {
        (STANCE_COUNT - clockwise, Stance::previous)
    };

    let mut path = Vec::with_capacity(steps.saturating_sub(1));
    let mut current = from;
    for _ in 1..steps {
        current = step(current);
        path.push(current);
    }
    path
}

/// Total cost of walking the optimal path one adjacent step at a time.
#[must_use]
pub fn path_cost(from: Stance, to: Stance, combatant: &Combatant) -> TransitionCost {
    let mut total = TransitionCost::ZERO;
    let mut current = from;
    for stance in optimal_path(from, to).into_iter().chain((from != to).then_some(to)) {
        total = total + transition_cost(current, stance, combatant);
        current = stance;
    }
    total
}

/// The seven other stances, cheapest first (neutral cost, then time, then
/// clockwise order from `from`).
#[must_use]
pub fn ranked_transitions(from: Stance) -> Vec<(Stance, TransitionCost)> {
    let mut ranked: Vec<_> = Stance::ALL
        .into_iter()
        .filter(|&to| to != from)
        .map(|to| (to, neutral_cost(from, to)))
        .collect();
    ranked.sort_by_key(|(to, cost)| (cost.total_resources(), cost.time_ms, from.clockwise_steps(*to)));
    ranked
}

/// [`TransitionRules::can_transition`] with the default cooldown.
#[must_use]
pub fn can_transition_stance(combatant: &Combatant, to: Stance, now_ms: u64) -> bool {
    TransitionRules::default().can_transition(combatant, to, now_ms)
}

/// [`TransitionRules::execute`] with the default cooldown.
#[must_use]
pub fn execute_stance_transition(combatant: &Combatant, to: Stance, now_ms: u64) -> TransitionResult {
    TransitionRules::default().execute(combatant, to, now_ms)
}

/// Gating rules for stance changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRules {
    /// Minimum time between two changes.
    pub cooldown_ms: u64,
}

impl Default for TransitionRules {
    fn default() -> Self {
        Self::from_config(&CombatConfig::default())
    }
}

impl TransitionRules {
    /// Rules from a combat config.
    #[must_use]
    pub fn from_config(config: &CombatConfig) -> Self {
        Self {
            cooldown_ms: config.transition_cooldown_ms,
        }
    }

    /// Check whether `combatant` may move to `to` at `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in the order incapacitated,
    /// stunned, mid-attack, cooldown, ki, stamina.
    pub fn check(
        &self,
        combatant: &Combatant,
        to: Stance,
        now_ms: u64,
    ) -> Result<TransitionCost, TransitionDenial> {
        let from = combatant.stance;
        if from == to {
            return Ok(TransitionCost::ZERO);
        }
        if combatant.is_defeated() {
            return Err(TransitionDenial::Incapacitated);
        }
        if combatant.is_stunned() {
            return Err(TransitionDenial::Stunned);
        }
        if combatant.is_mid_attack(now_ms) {
            return Err(TransitionDenial::MidAttack);
        }
        if let Some(last) = combatant.last_stance_change_ms {
            let ready_at = last.saturating_add(self.cooldown_ms);
            if now_ms < ready_at {
                return Err(TransitionDenial::Cooldown {
                    remaining_ms: ready_at - now_ms,
                });
            }
        }

        let cost = transition_cost(from, to, combatant);
        if combatant.ki < cost.ki {
            return Err(TransitionDenial::InsufficientKi {
                required: cost.ki,
                available: combatant.ki,
            });
        }
        if combatant.stamina < cost.stamina {
            return Err(TransitionDenial::InsufficientStamina {
                required: cost.stamina,
                available: combatant.stamina,
            });
        }
        Ok(cost)
    }

    /// Can `combatant` move to `to` at `now_ms`?
    #[must_use]
    pub fn can_transition(&self, combatant: &Combatant, to: Stance, now_ms: u64) -> bool {
        self.check(combatant, to, now_ms).is_ok()
    }

    /// Attempt the change.
    #[must_use]
    pub fn execute(&self, combatant: &Combatant, to: Stance, now_ms: u64) -> TransitionResult {
        match self.check(combatant, to, now_ms) {
            Ok(cost) if combatant.stance == to => TransitionResult::Completed {
                combatant: combatant.clone(),
                cost,
            },
            Ok(cost) => {
                let mut next = combatant.clone();
                next.ki -= cost.ki;
                next.stamina -= cost.stamina;
                next.stance = to;
                next.last_stance_change_ms = Some(now_ms);
                tracing::debug!(
                    combatant = combatant.id,
                    from = %combatant.stance,
                    to = %to,
                    ki = cost.ki,
                    stamina = cost.stamina,
                    time_ms = cost.time_ms,
                    "Stance changed"
                );
                TransitionResult::Completed {
                    combatant: next,
                    cost,
                }
            }
            Err(reason) => {
                tracing::debug!(combatant = combatant.id, to = %to, %reason, "Stance change denied");
                TransitionResult::Denied {
                    combatant: combatant.clone(),
                    reason,
                }
            }
        }
    }
}
