//! Stance effectiveness matrix.
//!
//! An 8×8 table of damage multipliers, attacker stance (row) against
//! defender stance (column). Data files carry the sparse
//! [`EffectivenessTable`] form; converting it into the dense
//! [`EffectivenessMatrix`] is the only fallible step, so lookups during a
//! match never fail.
//!
//! Invariants checked at load time:
//! - every (attacker, defender) pair is present
//! - every entry is finite and strictly positive
//! - the diagonal is exactly neutral (1.0)
//! - the 56 off-diagonal entries average within [`BALANCE_TOLERANCE`] of 1.0

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::stance::{Stance, STANCE_COUNT};

/// Allowed deviation of the off-diagonal mean from 1.0.
pub const BALANCE_TOLERANCE: f64 = 0.05;

/// Neutral multiplier.
pub const NEUTRAL: f64 = 1.0;

/// Multipliers by clockwise offset from attacker to defender.
///
/// Offset 5 is the attacker's counter stance, offset 3 is the stance that
/// counters the attacker.
const BUILTIN_BY_OFFSET: [f64; STANCE_COUNT] = [1.0, 1.1, 0.95, 0.75, 1.0, 1.3, 0.95, 0.9];

/// Serialized, possibly incomplete form of the matrix.
pub type EffectivenessTable = BTreeMap<Stance, BTreeMap<Stance, f64>>;

/// Complete, validated effectiveness matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EffectivenessTable", into = "EffectivenessTable")]
pub struct EffectivenessMatrix {
    rows: [[f64; STANCE_COUNT]; STANCE_COUNT],
}

impl EffectivenessMatrix {
    /// The built-in balanced matrix.
    #[must_use]
    pub fn builtin() -> Self {
        let mut rows = [[NEUTRAL; STANCE_COUNT]; STANCE_COUNT];
        for attacker in Stance::all() {
            for defender in Stance::all() {
                rows[attacker.index()][defender.index()] =
                    BUILTIN_BY_OFFSET[attacker.clockwise_steps(defender)];
            }
        }
        Self { rows }
    }

    /// Damage multiplier for `attacker` striking `defender`.
    #[must_use]
    pub fn get(&self, attacker: Stance, defender: Stance) -> f64 {
        self.rows[attacker.index()][defender.index()]
    }

    /// Mean of the 56 off-diagonal entries.
    #[must_use]
    pub fn off_diagonal_mean(&self) -> f64 {
        let mut sum = 0.0;
        for attacker in Stance::all() {
            for defender in Stance::all() {
                if attacker != defender {
                    sum += self.get(attacker, defender);
                }
            }
        }
        sum / (STANCE_COUNT * (STANCE_COUNT - 1)) as f64
    }

    /// Defender stance this attacker deals the most damage to.
    #[must_use]
    pub fn best_target(&self, attacker: Stance) -> Stance {
        Stance::all()
            .into_iter()
            .max_by(|a, b| self.get(attacker, *a).total_cmp(&self.get(attacker, *b)))
            .unwrap_or(attacker)
    }

    /// Check a sparse table, collecting every problem.
    #[must_use]
    pub fn validate_table(table: &EffectivenessTable) -> Vec<String> {
        let mut errors = Vec::new();
        let mut sum = 0.0;
        let mut count = 0usize;

        for attacker in Stance::all() {
            let Some(row) = table.get(&attacker) else {
                errors.push(format!("Effectiveness row for '{}' is missing", attacker.name()));
                continue;
            };
            for defender in Stance::all() {
                let Some(&value) = row.get(&defender) else {
                    errors.push(format!(
                        "Effectiveness entry '{}' -> '{}' is missing",
                        attacker.name(),
                        defender.name()
                    ));
                    continue;
                };
                if !value.is_finite() || value <= 0.0 {
                    errors.push(format!(
                        "Effectiveness entry '{}' -> '{}' must be positive, got {value}",
                        attacker.name(),
                        defender.name()
                    ));
                    continue;
                }
                if attacker == defender {
                    if (value - NEUTRAL).abs() > f64::EPSILON {
                        errors.push(format!(
                            "Effectiveness of '{}' against itself must be 1.0, got {value}",
                            attacker.name()
                        ));
                    }
                } else {
                    sum += value;
                    count += 1;
                }
            }
        }

        if errors.is_empty() && count > 0 {
            let mean = sum / count as f64;
            if (mean - NEUTRAL).abs() > BALANCE_TOLERANCE {
                errors.push(format!(
                    "Effectiveness off-diagonal mean {mean:.3} is outside 1.0 ± {BALANCE_TOLERANCE}"
                ));
            }
        }

        errors
    }

    /// Sparse form for serialization.
    #[must_use]
    pub fn to_table(&self) -> EffectivenessTable {
        Stance::all()
            .into_iter()
            .map(|attacker| {
                let row = Stance::all()
                    .into_iter()
                    .map(|defender| (defender, self.get(attacker, defender)))
                    .collect();
                (attacker, row)
            })
            .collect()
    }
}

impl Default for EffectivenessMatrix {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<EffectivenessTable> for EffectivenessMatrix {
    type Error = GameError;

    fn try_from(table: EffectivenessTable) -> Result<Self, Self::Error> {
        let errors = Self::validate_table(&table);
        if !errors.is_empty() {
            return Err(GameError::CatalogValidation(errors));
        }

        let mut rows = [[NEUTRAL; STANCE_COUNT]; STANCE_COUNT];
        for (attacker, row) in &table {
            for (defender, value) in row {
                rows[attacker.index()][defender.index()] = *value;
            }
        }
        Ok(Self { rows })
    }
}

impl From<EffectivenessMatrix> for EffectivenessTable {
    fn from(matrix: EffectivenessMatrix) -> Self {
        matrix.to_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_is_neutral() {
        let matrix = EffectivenessMatrix::builtin();
        for stance in Stance::all() {
            assert!((matrix.get(stance, stance) - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_builtin_is_balanced() {
        let matrix = EffectivenessMatrix::builtin();
        let mean = matrix.off_diagonal_mean();
        assert!((mean - 1.0).abs() <= BALANCE_TOLERANCE, "mean = {mean}");
        assert!(EffectivenessMatrix::validate_table(&matrix.to_table()).is_empty());
    }

    #[test]
    fn test_counter_is_best_target() {
        let matrix = EffectivenessMatrix::builtin();
        for stance in Stance::all() {
            assert_eq!(matrix.best_target(stance), stance.counter());
            assert!(matrix.get(stance, stance.counter()) > 1.0);
            assert!(matrix.get(stance, stance.countered_by()) < 1.0);
        }
        assert!((matrix.get(Stance::Geon, Stance::Gam) - 1.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_entry_is_reported() {
        let mut table = EffectivenessMatrix::builtin().to_table();
        table.get_mut(&Stance::Li).unwrap().remove(&Stance::Gon);
        table.remove(&Stance::Jin);

        let errors = EffectivenessMatrix::validate_table(&table);
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(EffectivenessMatrix::try_from(table).is_err());
    }

    #[test]
    fn test_non_neutral_diagonal_and_negative_rejected() {
        let mut table = EffectivenessMatrix::builtin().to_table();
        table.get_mut(&Stance::Tae).unwrap().insert(Stance::Tae, 1.2);
        table.get_mut(&Stance::Tae).unwrap().insert(Stance::Li, -0.5);

        let errors = EffectivenessMatrix::validate_table(&table);
        assert!(errors.iter().any(|e| e.contains("against itself")));
        assert!(errors.iter().any(|e| e.contains("must be positive")));
    }

    #[test]
    fn test_unbalanced_table_rejected() {
        let mut table = EffectivenessMatrix::builtin().to_table();
        for (attacker, row) in &mut table {
            for (defender, value) in row.iter_mut() {
                if attacker != defender {
                    *value = 1.5;
                }
            }
        }
        let errors = EffectivenessMatrix::validate_table(&table);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("mean"));
    }
}
