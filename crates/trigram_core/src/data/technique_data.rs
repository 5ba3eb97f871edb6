//! Built-in signature techniques, one per stance.

use crate::stance::Stance;
use crate::status::{EffectKind, EffectSpec};
use crate::technique::{DamageRange, Technique};

#[allow(clippy::too_many_arguments)]
fn technique(
    id: &str,
    korean_name: &str,
    english_name: &str,
    stance: Stance,
    damage: DamageRange,
    accuracy: f64,
    (ki_cost, stamina_cost): (u32, u32),
    (crit_chance, crit_multiplier): (f64, f64),
    range: f64,
    effects: Vec<EffectSpec>,
    (execution_ms, recovery_ms): (u64, u64),
) -> Technique {
    Technique {
        id: id.to_string(),
        korean_name: korean_name.to_string(),
        english_name: english_name.to_string(),
        stance,
        damage,
        accuracy,
        ki_cost,
        stamina_cost,
        crit_chance,
        crit_multiplier,
        range,
        effects,
        execution_ms,
        recovery_ms,
    }
}

/// The eight signature techniques in ring order.
#[must_use]
pub fn builtin_techniques() -> Vec<Technique> {
    use EffectKind::*;

    vec![
        technique(
            "heavenly_thunder_strike",
            "천둥벽력",
            "Heavenly Thunder Strike",
            Stance::Geon,
            DamageRange::new(24, 30),
            0.85,
            (15, 10),
            (0.15, 1.5),
            1.5,
            vec![EffectSpec::new(Stun, 500, 0.3, false, 0.2)],
            (400, 600),
        ),
        technique(
            "flowing_combo",
            "유수연타",
            "Flowing Combo",
            Stance::Tae,
            DamageRange::new(15, 20),
            0.9,
            (10, 12),
            (0.1, 1.4),
            1.2,
            vec![EffectSpec::new(Unbalanced, 2_000, 0.4, false, 0.3)],
            (300, 400),
        ),
        technique(
            "flame_spear",
            "화염지창",
            "Flame Spear",
            Stance::Li,
            DamageRange::new(20, 26),
            0.88,
            (14, 8),
            (0.25, 1.8),
            1.0,
            vec![EffectSpec::new(Bleed, 3_000, 0.5, true, 0.3)],
            (350, 450),
        ),
        technique(
            "thunder_flash",
            "벽력일섬",
            "Thunder Flash",
            Stance::Jin,
            DamageRange::new(26, 32),
            0.78,
            (18, 16),
            (0.2, 1.6),
            1.6,
            vec![EffectSpec::new(Paralysis, 800, 0.5, false, 0.15)],
            (450, 700),
        ),
        technique(
            "whirlwind_barrage",
            "선풍연격",
            "Whirlwind Barrage",
            Stance::Son,
            DamageRange::new(14, 20),
            0.92,
            (12, 14),
            (0.1, 1.3),
            1.4,
            vec![EffectSpec::new(Winded, 2_000, 0.4, false, 0.25)],
            (300, 350),
        ),
        technique(
            "water_counter",
            "수류반격",
            "Water Counter",
            Stance::Gam,
            DamageRange::new(18, 24),
            0.86,
            (12, 8),
            (0.2, 1.5),
            1.1,
            vec![EffectSpec::new(Disoriented, 2_000, 0.5, false, 0.25)],
            (250, 450),
        ),
        technique(
            "mountain_defense",
            "반석방어",
            "Mountain Defense",
            Stance::Gan,
            DamageRange::new(10, 14),
            0.95,
            (8, 6),
            (0.05, 1.2),
            0.9,
            vec![EffectSpec::new(Weakened, 3_000, 0.4, false, 0.3)],
            (300, 300),
        ),
        technique(
            "earth_embrace",
            "대지포옹",
            "Earth Embrace",
            Stance::Gon,
            DamageRange::new(20, 28),
            0.8,
            (16, 18),
            (0.1, 1.4),
            0.8,
            vec![EffectSpec::new(Unbalanced, 3_000, 0.7, false, 0.5)],
            (500, 700),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_valid_technique_per_stance() {
        let techniques = builtin_techniques();
        assert_eq!(techniques.len(), Stance::ALL.len());
        for (technique, stance) in techniques.iter().zip(Stance::ALL) {
            assert_eq!(technique.stance, stance);
            assert!(technique.validate().is_empty(), "{:?}", technique.validate());
        }
    }
}
