//! Built-in vital point catalog.
//!
//! Points follow traditional Korean pressure-point naming. Accuracy falls
//! as severity rises: the most dangerous targets are the hardest to find.

use crate::anatomy::{Region, Severity, VitalPoint, VitalPointId};
use crate::status::{EffectKind, EffectSpec};

#[allow(clippy::too_many_arguments)]
fn point(
    id: &str,
    korean_name: &str,
    english_name: &str,
    region: Region,
    severity: Severity,
    base_accuracy: f64,
    base_damage: u32,
    damage_multiplier: f64,
    base_stun_ms: u64,
    effects: Vec<EffectSpec>,
) -> VitalPoint {
    VitalPoint {
        id: VitalPointId::new(id),
        korean_name: korean_name.to_string(),
        english_name: english_name.to_string(),
        region,
        severity,
        base_accuracy,
        base_damage,
        damage_multiplier,
        base_stun_ms,
        effects,
    }
}

/// The built-in vital points, grouped by region.
#[must_use]
pub fn builtin_vital_points() -> Vec<VitalPoint> {
    use EffectKind::*;
    use Region::*;
    use Severity::*;

    vec![
        // Head
        point(
            "baekhoe", "백회", "Crown", Head, Critical, 0.35, 20, 1.6, 2_000,
            vec![
                EffectSpec::new(Disoriented, 4_000, 0.7, false, 0.6),
                EffectSpec::new(Pain, 3_000, 0.5, false, 0.5),
            ],
        ),
        point(
            "taeyang", "태양", "Temple", Head, Critical, 0.45, 18, 1.5, 1_500,
            vec![EffectSpec::new(Disoriented, 3_000, 0.8, false, 0.7)],
        ),
        point(
            "indang", "인당", "Third Eye", Head, Severe, 0.5, 14, 1.3, 800,
            vec![EffectSpec::new(Disoriented, 2_500, 0.5, false, 0.5)],
        ),
        // Face
        point(
            "injung", "인중", "Philtrum", Face, Severe, 0.5, 12, 1.4, 1_000,
            vec![EffectSpec::new(Pain, 2_000, 0.6, false, 0.6)],
        ),
        point(
            "hagwan", "하관", "Jaw Hinge", Face, Severe, 0.55, 14, 1.3, 1_200,
            vec![EffectSpec::new(Disoriented, 2_000, 0.5, false, 0.5)],
        ),
        point(
            "jeongmyeong", "정명", "Inner Eye Corner", Face, Moderate, 0.4, 10, 1.2, 0,
            vec![
                EffectSpec::new(Disoriented, 3_000, 0.6, false, 0.8),
                EffectSpec::new(Pain, 1_500, 0.4, false, 0.4),
            ],
        ),
        // Neck
        point(
            "inyeong", "인영", "Carotid Sinus", Neck, Lethal, 0.25, 22, 1.8, 2_500,
            vec![
                EffectSpec::new(Paralysis, 1_500, 0.6, false, 0.3),
                EffectSpec::new(Disoriented, 3_000, 0.7, false, 0.5),
            ],
        ),
        point(
            "cheondol", "천돌", "Suprasternal Notch", Neck, Critical, 0.35, 16, 1.5, 1_000,
            vec![EffectSpec::new(Winded, 4_000, 0.8, false, 0.7)],
        ),
        point(
            "pungji", "풍지", "Base of Skull", Neck, Critical, 0.3, 18, 1.6, 1_800,
            vec![EffectSpec::new(Disoriented, 3_500, 0.6, false, 0.6)],
        ),
        // Torso
        point(
            "danjung", "단중", "Sternum Center", Torso, Severe, 0.6, 14, 1.3, 600,
            vec![EffectSpec::new(Winded, 3_000, 0.6, false, 0.6)],
        ),
        point(
            "ilwol", "일월", "Floating Ribs", Torso, Moderate, 0.6, 10, 1.2, 0,
            vec![EffectSpec::new(Pain, 2_500, 0.5, false, 0.6)],
        ),
        point(
            "yeonaek", "연액", "Armpit Nerve", Torso, Moderate, 0.45, 10, 1.2, 0,
            vec![EffectSpec::new(Paralysis, 1_000, 0.4, false, 0.3)],
        ),
        // Abdomen
        point(
            "gumi", "구미", "Solar Plexus", Abdomen, Critical, 0.5, 16, 1.5, 1_200,
            vec![EffectSpec::new(Winded, 5_000, 0.9, false, 0.8)],
        ),
        point(
            "singwol", "신궐", "Navel", Abdomen, Moderate, 0.65, 8, 1.1, 0,
            vec![EffectSpec::new(Winded, 2_000, 0.4, false, 0.5)],
        ),
        point(
            "gihae", "기해", "Sea of Qi", Abdomen, Severe, 0.55, 12, 1.3, 500,
            vec![EffectSpec::new(Weakened, 5_000, 0.5, false, 0.6)],
        ),
        // Back
        point(
            "myeongmun", "명문", "Gate of Life", Back, Severe, 0.35, 14, 1.4, 800,
            vec![
                EffectSpec::new(Weakened, 4_000, 0.6, false, 0.5),
                EffectSpec::new(Pain, 2_000, 0.4, false, 0.4),
            ],
        ),
        point(
            "sinsu", "신수", "Kidney", Back, Severe, 0.4, 15, 1.4, 600,
            vec![
                EffectSpec::new(Pain, 4_000, 0.7, false, 0.7),
                EffectSpec::new(Bleed, 3_000, 0.3, true, 0.3),
            ],
        ),
        point(
            "daechu", "대추", "Seventh Vertebra", Back, Severe, 0.4, 13, 1.3, 700,
            vec![EffectSpec::new(Paralysis, 1_000, 0.5, false, 0.3)],
        ),
        // Arms
        point(
            "gokji", "곡지", "Elbow Crease", Arms, Minor, 0.6, 6, 1.0, 0,
            vec![EffectSpec::new(Weakened, 3_000, 0.4, false, 0.6)],
        ),
        point(
            "naegwan", "내관", "Inner Wrist", Arms, Minor, 0.55, 5, 1.0, 0,
            vec![
                EffectSpec::new(Weakened, 2_500, 0.5, false, 0.5),
                EffectSpec::new(Bleed, 2_000, 0.4, true, 0.2),
            ],
        ),
        point(
            "hapgok", "합곡", "Hand Valley", Arms, Minor, 0.5, 5, 1.0, 0,
            vec![EffectSpec::new(Pain, 1_500, 0.4, false, 0.6)],
        ),
        // Legs
        point(
            "joksamni", "족삼리", "Leg Three Miles", Legs, Moderate, 0.6, 9, 1.1, 0,
            vec![
                EffectSpec::new(Unbalanced, 3_000, 0.6, false, 0.7),
                EffectSpec::new(Weakened, 2_000, 0.3, false, 0.3),
            ],
        ),
        point(
            "wijung", "위중", "Back of Knee", Legs, Moderate, 0.5, 10, 1.2, 400,
            vec![EffectSpec::new(Unbalanced, 4_000, 0.8, false, 0.8)],
        ),
        point(
            "sameumgyo", "삼음교", "Inner Ankle", Legs, Minor, 0.45, 6, 1.0, 0,
            vec![EffectSpec::new(Unbalanced, 2_500, 0.5, false, 0.6)],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique_and_entries_valid() {
        let points = builtin_vital_points();
        let ids: HashSet<_> = points.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), points.len());
        for point in &points {
            assert!(point.validate().is_empty(), "{:?}", point.validate());
        }
    }

    #[test]
    fn test_every_region_has_points() {
        let points = builtin_vital_points();
        for region in Region::ALL {
            assert!(points.iter().any(|p| p.region == region), "{region:?} empty");
        }
    }
}
