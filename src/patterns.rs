// 🏷️ Pattern Detection - Tensions and amplifications as data
//
// Tensions: two-sided checks over {western sign, chinese animal, life
// path}. A side matches if any one of its memberships holds (OR within a
// side); the tension fires when both sides match (AND across sides).
//
// Amplifications: two or more channels agreeing on Fire, Water or Earth,
// plus any master number in life path, birthday or expression.

use crate::channels::{ChineseAnimal, Element, WesternSign};
use crate::profile::Profile;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// TAGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tension {
    SpeedVsDepth,
    SecurityVsFreedom,
    SoloVsCollaborative,
    SpiritualVsMaterial,
    CreativeVsStructural,
}

impl Tension {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SpeedVsDepth => "speed_vs_depth",
            Self::SecurityVsFreedom => "security_vs_freedom",
            Self::SoloVsCollaborative => "solo_vs_collaborative",
            Self::SpiritualVsMaterial => "spiritual_vs_material",
            Self::CreativeVsStructural => "creative_vs_structural",
        }
    }
}

impl fmt::Display for Tension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amplification {
    DoubleFire,
    DoubleWater,
    DoubleEarth,
    MasterNumberPresence,
}

impl Amplification {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DoubleFire => "double_fire",
            Self::DoubleWater => "double_water",
            Self::DoubleEarth => "double_earth",
            Self::MasterNumberPresence => "master_number_presence",
        }
    }
}

impl fmt::Display for Amplification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TENSION TABLE
// ============================================================================

/// One side of a tension check
pub struct Side {
    pub signs: &'static [WesternSign],
    pub animals: &'static [ChineseAnimal],
    pub life_paths: &'static [u32],
}

impl Side {
    pub fn matches(&self, profile: &Profile) -> bool {
        self.signs.contains(&profile.western_zodiac.sign)
            || self.animals.contains(&profile.chinese_zodiac.animal)
            || self.life_paths.contains(&profile.life_path.number)
    }
}

pub struct TensionCheck {
    pub tension: Tension,
    pub side_a: Side,
    pub side_b: Side,
}

impl TensionCheck {
    pub fn fires(&self, profile: &Profile) -> bool {
        self.side_a.matches(profile) && self.side_b.matches(profile)
    }
}

use ChineseAnimal as A;
use WesternSign as W;

/// Checked in order; output order follows this table
pub static TENSION_CHECKS: [TensionCheck; 5] = [
    TensionCheck {
        tension: Tension::SpeedVsDepth,
        side_a: Side {
            signs: &[W::Aries, W::Sagittarius, W::Gemini],
            animals: &[A::Horse, A::Tiger, A::Monkey],
            life_paths: &[1, 3, 5],
        },
        side_b: Side {
            signs: &[W::Virgo, W::Scorpio, W::Capricorn],
            animals: &[A::Snake, A::Ox, A::Rooster],
            life_paths: &[4, 7, 22],
        },
    },
    TensionCheck {
        tension: Tension::SecurityVsFreedom,
        side_a: Side {
            signs: &[W::Taurus, W::Cancer, W::Capricorn],
            animals: &[A::Ox, A::Rabbit, A::Dog],
            life_paths: &[2, 4, 6],
        },
        side_b: Side {
            signs: &[W::Gemini, W::Sagittarius, W::Aquarius],
            animals: &[A::Horse, A::Monkey, A::Tiger],
            life_paths: &[1, 3, 5],
        },
    },
    TensionCheck {
        tension: Tension::SoloVsCollaborative,
        side_a: Side {
            signs: &[W::Aries, W::Leo, W::Scorpio],
            animals: &[A::Tiger, A::Horse, A::Dragon],
            life_paths: &[1, 7, 8],
        },
        side_b: Side {
            signs: &[W::Libra, W::Pisces, W::Gemini],
            animals: &[A::Rabbit, A::Goat, A::Pig],
            life_paths: &[2, 6, 9],
        },
    },
    TensionCheck {
        tension: Tension::SpiritualVsMaterial,
        side_a: Side {
            signs: &[W::Pisces, W::Sagittarius, W::Aquarius],
            animals: &[A::Snake, A::Rabbit],
            life_paths: &[7, 9, 11],
        },
        side_b: Side {
            signs: &[W::Taurus, W::Capricorn, W::Leo],
            animals: &[A::Dragon, A::Ox, A::Rat],
            life_paths: &[4, 8, 22],
        },
    },
    TensionCheck {
        tension: Tension::CreativeVsStructural,
        side_a: Side {
            signs: &[W::Leo, W::Pisces, W::Gemini],
            animals: &[A::Horse, A::Monkey, A::Goat],
            life_paths: &[3, 5, 9],
        },
        side_b: Side {
            signs: &[W::Virgo, W::Capricorn, W::Taurus],
            animals: &[A::Ox, A::Rooster, A::Dog],
            life_paths: &[4, 8, 22],
        },
    },
];

/// Life paths that count toward each element's agreement
const FIRE_LIFE_PATHS: &[u32] = &[1, 3, 5];
const WATER_LIFE_PATHS: &[u32] = &[2, 7, 9];
const EARTH_LIFE_PATHS: &[u32] = &[4, 8];

// ============================================================================
// DETECTION
// ============================================================================

pub fn detect_tensions(profile: &Profile) -> Vec<Tension> {
    TENSION_CHECKS
        .iter()
        .filter(|check| check.fires(profile))
        .map(|check| check.tension)
        .collect()
}

fn element_agreement(profile: &Profile, element: Element, life_paths: &[u32]) -> usize {
    [
        profile.western_zodiac.element == element,
        profile.chinese_zodiac.element == element,
        life_paths.contains(&profile.life_path.number),
    ]
    .iter()
    .filter(|agrees| **agrees)
    .count()
}

/// Fixed order: fire, water, earth, then master numbers
pub fn detect_amplifications(profile: &Profile) -> Vec<Amplification> {
    let elements = [
        (Element::Fire, FIRE_LIFE_PATHS, Amplification::DoubleFire),
        (Element::Water, WATER_LIFE_PATHS, Amplification::DoubleWater),
        (Element::Earth, EARTH_LIFE_PATHS, Amplification::DoubleEarth),
    ];

    let mut amplifications: Vec<Amplification> = elements
        .iter()
        .filter(|(element, life_paths, _)| element_agreement(profile, *element, life_paths) >= 2)
        .map(|(_, _, amp)| *amp)
        .collect();

    if profile.life_path.is_master || profile.birthday_number.is_master || profile.expression.is_master {
        amplifications.push(Amplification::MasterNumberPresence);
    }

    amplifications
}

// ============================================================================
// TESTS
// ============================================================================
