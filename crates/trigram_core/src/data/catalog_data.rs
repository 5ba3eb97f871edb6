//! Raw catalog definition combining every data table.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::technique_data::builtin_techniques;
use super::vital_point_data::builtin_vital_points;
use crate::anatomy::VitalPoint;
use crate::effectiveness::{EffectivenessMatrix, EffectivenessTable};
use crate::stance::Stance;
use crate::technique::Technique;

/// Unvalidated catalog as loaded from a RON file.
///
/// # Example RON
///
/// ```ron
/// CatalogData(
///     effectiveness: { geon: { geon: 1.0, tae: 1.1, ... }, ... },
///     techniques: [...],
///     vital_points: [...],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    /// Sparse effectiveness table, attacker row to defender column.
    pub effectiveness: EffectivenessTable,

    /// One signature technique per stance.
    pub techniques: Vec<Technique>,

    /// Vital points.
    #[serde(default)]
    pub vital_points: Vec<VitalPoint>,
}

impl CatalogData {
    /// The built-in tables.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            effectiveness: EffectivenessMatrix::builtin().to_table(),
            techniques: builtin_techniques(),
            vital_points: builtin_vital_points(),
        }
    }

    /// Find a technique by its ID.
    #[must_use]
    pub fn get_technique(&self, id: &str) -> Option<&Technique> {
        self.techniques.iter().find(|t| t.id == id)
    }

    /// Find a vital point by its ID.
    #[must_use]
    pub fn get_vital_point(&self, id: &str) -> Option<&VitalPoint> {
        self.vital_points.iter().find(|v| v.id.as_str() == id)
    }

    /// Validate internal consistency.
    ///
    /// Checks for:
    /// - a complete, positive, balanced effectiveness table
    /// - exactly one technique per stance, with unique ids
    /// - unique vital point ids
    /// - per-entry ranges (probabilities, damage ranges, multipliers, durations)
    ///
    /// Returns a list of validation errors.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = EffectivenessMatrix::validate_table(&self.effectiveness);

        for stance in Stance::all() {
            let count = self.techniques.iter().filter(|t| t.stance == stance).count();
            if count != 1 {
                errors.push(format!(
                    "Stance '{}' must have exactly one technique, found {count}",
                    stance.name()
                ));
            }
        }

        let mut technique_ids = HashSet::new();
        for technique in &self.techniques {
            if !technique_ids.insert(technique.id.as_str()) {
                errors.push(format!("Duplicate technique id '{}'", technique.id));
            }
            errors.extend(technique.validate());
        }

        let mut point_ids = HashSet::new();
        for point in &self.vital_points {
            if !point_ids.insert(point.id.as_str()) {
                errors.push(format!("Duplicate vital point id '{}'", point.id));
            }
            errors.extend(point.validate());
        }

        errors
    }
}

impl Default for CatalogData {
    fn default() -> Self {
        Self::builtin()
    }
}
