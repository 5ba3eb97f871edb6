//! The eight trigram stances.
//!
//! Stances sit on a fixed ring (Geon → Tae → Li → Jin → Son → Gam → Gan →
//! Gon → Geon). Clockwise means increasing index. Two relations drive the
//! combat math:
//!
//! - **Cyclic distance**: minimum number of ring steps between two stances
//!   (0..=4). Drives transition difficulty.
//! - **Counter**: each stance has exactly one stance it is strongest
//!   against. The relation is a permutation of the ring but not an
//!   involution (Geon counters Gam, Gam counters Li).
//!
//! Element, hanja and symbol data are flavor only and never enter the math.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of stances on the ring.
pub const STANCE_COUNT: usize = 8;

/// Ring offset from a stance to the stance it counters.
const COUNTER_OFFSET: usize = 5;

/// One of the eight trigram stances.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    /// ☰ Heaven - direct, overwhelming force.
    #[default]
    Geon,
    /// ☱ Lake - fluid joint manipulation.
    Tae,
    /// ☲ Fire - precise nerve strikes.
    Li,
    /// ☳ Thunder - explosive bursts.
    Jin,
    /// ☴ Wind - continuous pressure.
    Son,
    /// ☵ Water - evasive counters.
    Gam,
    /// ☶ Mountain - immovable defense.
    Gan,
    /// ☷ Earth - grounding throws.
    Gon,
}

/// Flavor element associated with a stance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    /// 天 heaven.
    Heaven,
    /// 澤 lake.
    Lake,
    /// 火 fire.
    Fire,
    /// 雷 thunder.
    Thunder,
    /// 風 wind.
    Wind,
    /// 水 water.
    Water,
    /// 山 mountain.
    Mountain,
    /// 地 earth.
    Earth,
}

impl Stance {
    /// All stances in ring order.
    pub const ALL: [Stance; STANCE_COUNT] = [
        Stance::Geon,
        Stance::Tae,
        Stance::Li,
        Stance::Jin,
        Stance::Son,
        Stance::Gam,
        Stance::Gan,
        Stance::Gon,
    ];

    /// Returns all stances in ring order.
    #[must_use]
    pub const fn all() -> [Stance; STANCE_COUNT] {
        Self::ALL
    }

    /// Position on the ring (0..8).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stance at a ring position, wrapping modulo 8.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % STANCE_COUNT]
    }

    /// Next stance clockwise.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Next stance counter-clockwise.
    #[must_use]
    pub const fn previous(self) -> Self {
        Self::from_index(self.index() + STANCE_COUNT - 1)
    }

    /// Clockwise steps from `self` to `other` (0..8).
    #[must_use]
    pub const fn clockwise_steps(self, other: Stance) -> usize {
        (other.index() + STANCE_COUNT - self.index()) % STANCE_COUNT
    }

    /// Minimum ring distance between two stances (0..=4).
    ///
    /// Symmetric, and zero only for identical stances.
    #[must_use]
    pub const fn distance(self, other: Stance) -> usize {
        let cw = self.clockwise_steps(other);
        let ccw = STANCE_COUNT - cw;
        if cw == 0 {
            0
        } else if cw <= ccw {
            cw
        } else {
            ccw
        }
    }

    /// The two stances at distance 1, as `(previous, next)`.
    #[must_use]
    pub const fn adjacent(self) -> (Stance, Stance) {
        (self.previous(), self.next())
    }

    /// Is `other` one ring step away?
    #[must_use]
    pub const fn is_adjacent(self, other: Stance) -> bool {
        self.distance(other) == 1
    }

    /// The stance this stance is strongest against.
    #[must_use]
    pub const fn counter(self) -> Stance {
        Self::from_index(self.index() + COUNTER_OFFSET)
    }

    /// The stance that counters this one.
    #[must_use]
    pub const fn countered_by(self) -> Stance {
        Self::from_index(self.index() + STANCE_COUNT - COUNTER_OFFSET)
    }

    /// Advisory hint for UI: staying put, stepping to a neighbour or moving
    /// into the counter stance are the "natural" transitions.
    #[must_use]
    pub const fn is_optimal_transition(self, to: Stance) -> bool {
        self.index() == to.index() || self.is_adjacent(to) || self.counter().index() == to.index()
    }

    /// Romanized Korean name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Geon => "geon",
            Self::Tae => "tae",
            Self::Li => "li",
            Self::Jin => "jin",
            Self::Son => "son",
            Self::Gam => "gam",
            Self::Gan => "gan",
            Self::Gon => "gon",
        }
    }

    /// Korean name in Hangul.
    #[must_use]
    pub const fn korean_name(self) -> &'static str {
        match self {
            Self::Geon => "건",
            Self::Tae => "태",
            Self::Li => "리",
            Self::Jin => "진",
            Self::Son => "손",
            Self::Gam => "감",
            Self::Gan => "간",
            Self::Gon => "곤",
        }
    }

    /// Hanja for the trigram.
    #[must_use]
    pub const fn hanja(self) -> &'static str {
        match self {
            Self::Geon => "乾",
            Self::Tae => "兌",
            Self::Li => "離",
            Self::Jin => "震",
            Self::Son => "巽",
            Self::Gam => "坎",
            Self::Gan => "艮",
            Self::Gon => "坤",
        }
    }

    /// Trigram symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Geon => '☰',
            Self::Tae => '☱',
            Self::Li => '☲',
            Self::Jin => '☳',
            Self::Son => '☴',
            Self::Gam => '☵',
            Self::Gan => '☶',
            Self::Gon => '☷',
        }
    }

    /// Flavor element.
    #[must_use]
    pub const fn element(self) -> Element {
        match self {
            Self::Geon => Element::Heaven,
            Self::Tae => Element::Lake,
            Self::Li => Element::Fire,
            Self::Jin => Element::Thunder,
            Self::Son => Element::Wind,
            Self::Gam => Element::Water,
            Self::Gan => Element::Mountain,
            Self::Gon => Element::Earth,
        }
    }

    /// Parse a romanized name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_order_is_stable() {
        for (i, stance) in Stance::all().into_iter().enumerate() {
            assert_eq!(stance.index(), i);
            assert_eq!(Stance::from_index(i), stance);
        }
        assert_eq!(Stance::Gon.next(), Stance::Geon);
        assert_eq!(Stance::Geon.previous(), Stance::Gon);
    }

    #[test]
    fn test_distance_is_symmetric_and_bounded() {
        for a in Stance::all() {
            assert_eq!(a.distance(a), 0);
            for b in Stance::all() {
                assert_eq!(a.distance(b), b.distance(a));
                assert!(a.distance(b) <= 4);
                if a != b {
                    assert!(a.distance(b) > 0);
                }
            }
        }
        assert_eq!(Stance::Geon.distance(Stance::Son), 4);
        assert_eq!(Stance::Geon.distance(Stance::Gon), 1);
        assert_eq!(Stance::Geon.distance(Stance::Gam), 3);
    }

    #[test]
    fn test_adjacent() {
        assert_eq!(Stance::Geon.adjacent(), (Stance::Gon, Stance::Tae));
        assert_eq!(Stance::Son.adjacent(), (Stance::Jin, Stance::Gam));
    }

    #[test]
    fn test_counter_is_permutation_not_involution() {
        let mut seen = [false; STANCE_COUNT];
        for stance in Stance::all() {
            let counter = stance.counter();
            assert_ne!(counter, stance);
            assert!(!seen[counter.index()], "{counter} countered twice");
            seen[counter.index()] = true;
            assert_eq!(counter.countered_by(), stance);
        }
        assert_eq!(Stance::Geon.counter(), Stance::Gam);
        assert_ne!(Stance::Geon.counter().counter(), Stance::Geon);
    }

    #[test]
    fn test_optimal_transition_hint() {
        assert!(Stance::Geon.is_optimal_transition(Stance::Geon));
        assert!(Stance::Geon.is_optimal_transition(Stance::Tae));
        assert!(Stance::Geon.is_optimal_transition(Stance::Gam));
        assert!(!Stance::Geon.is_optimal_transition(Stance::Son));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Stance::from_name("GEON"), Some(Stance::Geon));
        assert_eq!(Stance::from_name(" gam "), Some(Stance::Gam));
        assert_eq!(Stance::from_name("fire"), None);
    }
}
