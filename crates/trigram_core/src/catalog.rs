//! Validated, read-only combat catalog.
//!
//! A [`Catalog`] is built once at startup from [`CatalogData`]. Every
//! integrity check runs there, so lookups during a bout cannot fail for
//! stances and only return `None` for unknown identifiers.

use std::collections::HashMap;

use crate::anatomy::{Region, VitalPoint, VitalPointId};
use crate::data::{builtin_techniques, builtin_vital_points, CatalogData};
use crate::effectiveness::EffectivenessMatrix;
use crate::error::{GameError, Result};
use crate::stance::Stance;
use crate::technique::Technique;

/// Techniques, vital points and the effectiveness matrix.
#[derive(Debug, Clone)]
pub struct Catalog {
    matrix: EffectivenessMatrix,
    /// Indexed by stance.
    techniques: Vec<Technique>,
    vital_points: Vec<VitalPoint>,
    vital_index: HashMap<VitalPointId, usize>,
}

impl Catalog {
    fn assemble(
        matrix: EffectivenessMatrix,
        mut techniques: Vec<Technique>,
        vital_points: Vec<VitalPoint>,
    ) -> Self {
        techniques.sort_by_key(|t| t.stance.index());
        let vital_index = vital_points
            .iter()
            .enumerate()
            .map(|(i, point)| (point.id.clone(), i))
            .collect();
        Self {
            matrix,
            techniques,
            vital_points,
            vital_index,
        }
    }

    /// The built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::assemble(
            EffectivenessMatrix::builtin(),
            builtin_techniques(),
            builtin_vital_points(),
        )
    }

    /// Validate raw data and build a catalog from it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::CatalogValidation`] listing every problem found.
    pub fn from_data(data: CatalogData) -> Result<Self> {
        let errors = data.validate();
        if !errors.is_empty() {
            tracing::warn!(count = errors.len(), "Catalog failed validation");
            return Err(GameError::CatalogValidation(errors));
        }
        let matrix = EffectivenessMatrix::try_from(data.effectiveness)?;
        let catalog = Self::assemble(matrix, data.techniques, data.vital_points);
        tracing::info!(
            techniques = catalog.techniques.len(),
            vital_points = catalog.vital_points.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a RON catalog and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DataParseError`] for malformed RON and
    /// [`GameError::CatalogValidation`] for inconsistent data.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let data: CatalogData = ron::from_str(source).map_err(|e| GameError::DataParseError {
            source_name: "catalog".to_string(),
            message: e.to_string(),
        })?;
        Self::from_data(data)
    }

    /// Raw form, for export.
    #[must_use]
    pub fn to_data(&self) -> CatalogData {
        CatalogData {
            effectiveness: self.matrix.to_table(),
            techniques: self.techniques.clone(),
            vital_points: self.vital_points.clone(),
        }
    }

    /// All stances in ring order.
    #[must_use]
    pub const fn all_stances(&self) -> [Stance; 8] {
        Stance::all()
    }

    /// All vital points in catalog order.
    #[must_use]
    pub fn all_vital_points(&self) -> &[VitalPoint] {
        &self.vital_points
    }

    /// Vital points in one region.
    pub fn vital_points_by_region(&self, region: Region) -> impl Iterator<Item = &VitalPoint> {
        self.vital_points.iter().filter(move |p| p.region == region)
    }

    /// Look up a vital point.
    #[must_use]
    pub fn vital_point(&self, id: &VitalPointId) -> Option<&VitalPoint> {
        self.vital_index.get(id).map(|&i| &self.vital_points[i])
    }

    /// Look up a vital point, failing on unknown ids.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownVitalPoint`].
    pub fn require_vital_point(&self, id: &VitalPointId) -> Result<&VitalPoint> {
        self.vital_point(id)
            .ok_or_else(|| GameError::UnknownVitalPoint(id.to_string()))
    }

    /// Signature technique of a stance.
    #[must_use]
    pub fn technique_for_stance(&self, stance: Stance) -> &Technique {
        &self.techniques[stance.index()]
    }

    /// Look up a technique by id.
    #[must_use]
    pub fn technique(&self, id: &str) -> Option<&Technique> {
        self.techniques.iter().find(|t| t.id == id)
    }

    /// All techniques in ring order.
    #[must_use]
    pub fn techniques(&self) -> &[Technique] {
        &self.techniques
    }

    /// The effectiveness matrix.
    #[must_use]
    pub fn matrix(&self) -> &EffectivenessMatrix {
        &self.matrix
    }

    /// Damage multiplier for `attacker` striking `defender`.
    #[must_use]
    pub fn effectiveness(&self, attacker: Stance, defender: Stance) -> f64 {
        self.matrix.get(attacker, defender)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookups() {
        let catalog = Catalog::builtin();
        for stance in catalog.all_stances() {
            assert_eq!(catalog.technique_for_stance(stance).stance, stance);
        }
        assert_eq!(
            catalog.technique_for_stance(Stance::Geon).english_name,
            "Heavenly Thunder Strike"
        );
        assert!(catalog.vital_point(&VitalPointId::new("gumi")).is_some());
        assert!(catalog.vital_point(&VitalPointId::new("nowhere")).is_none());
        assert!(matches!(
            catalog.require_vital_point(&VitalPointId::new("nowhere")),
            Err(GameError::UnknownVitalPoint(_))
        ));
    }

    #[test]
    fn test_by_region_covers_all_points() {
        let catalog = Catalog::builtin();
        let total: usize = Region::ALL
            .iter()
            .map(|&r| catalog.vital_points_by_region(r).count())
            .sum();
        assert_eq!(total, catalog.all_vital_points().len());
    }

    #[test]
    fn test_from_data_matches_builtin() {
        let catalog = Catalog::from_data(CatalogData::builtin()).unwrap();
        assert_eq!(catalog.matrix(), Catalog::builtin().matrix());
        assert!((catalog.effectiveness(Stance::Geon, Stance::Gam) - 1.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ron_round_trip() {
        let source = ron::to_string(&Catalog::builtin().to_data()).unwrap();
        let catalog = Catalog::from_ron_str(&source).unwrap();
        assert_eq!(catalog.all_vital_points().len(), builtin_vital_points().len());
    }

    #[test]
    fn test_invalid_data_rejected() {
        let mut data = CatalogData::builtin();
        data.techniques[0].accuracy = 2.0;
        assert!(matches!(
            Catalog::from_data(data),
            Err(GameError::CatalogValidation(_))
        ));
        assert!(matches!(
            Catalog::from_ron_str("CatalogData("),
            Err(GameError::DataParseError { .. })
        ));
    }
}
