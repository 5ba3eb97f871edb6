//! Player archetypes.
//!
//! An archetype fixes a combatant's baseline pools and the stances they
//! move into cheaply.

use serde::{Deserialize, Serialize};

use crate::stance::Stance;

/// Baseline resource pools for a fresh combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaselineStats {
    /// Maximum health.
    pub health: u32,
    /// Maximum ki.
    pub ki: u32,
    /// Maximum stamina.
    pub stamina: u32,
}

/// Fighter archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// 무사 - traditional warrior.
    #[default]
    Musa,
    /// 암살자 - shadow assassin.
    Amsalja,
    /// 해커 - cyber warrior.
    Hacker,
    /// 정보요원 - intelligence operative.
    JeongboYowon,
    /// 조직폭력배 - organized-crime enforcer.
    JojikPokryeokbae,
}

impl Archetype {
    /// All archetypes.
    pub const ALL: [Archetype; 5] = [
        Archetype::Musa,
        Archetype::Amsalja,
        Archetype::Hacker,
        Archetype::JeongboYowon,
        Archetype::JojikPokryeokbae,
    ];

    /// Baseline pools.
    #[must_use]
    pub const fn baseline(self) -> BaselineStats {
        let (health, ki, stamina) = match self {
            Self::Musa => (120, 100, 120),
            Self::Amsalja => (90, 120, 110),
            Self::Hacker => (100, 130, 90),
            Self::JeongboYowon => (100, 110, 100),
            Self::JojikPokryeokbae => (140, 80, 130),
        };
        BaselineStats {
            health,
            ki,
            stamina,
        }
    }

    /// Stances this archetype transitions into at a discount.
    #[must_use]
    pub const fn favored_stances(self) -> [Stance; 2] {
        match self {
            Self::Musa => [Stance::Geon, Stance::Jin],
            Self::Amsalja => [Stance::Son, Stance::Gam],
            Self::Hacker => [Stance::Li, Stance::Tae],
            Self::JeongboYowon => [Stance::Tae, Stance::Gan],
            Self::JojikPokryeokbae => [Stance::Jin, Stance::Gon],
        }
    }

    /// Does this archetype favor `stance`?
    #[must_use]
    pub fn favors(self, stance: Stance) -> bool {
        self.favored_stances().contains(&stance)
    }

    /// Display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Musa => "Musa (무사)",
            Self::Amsalja => "Amsalja (암살자)",
            Self::Hacker => "Hacker (해커)",
            Self::JeongboYowon => "Jeongbo Yowon (정보요원)",
            Self::JojikPokryeokbae => "Jojik Pokryeokbae (조직폭력배)",
        }
    }
}
