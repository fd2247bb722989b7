// ♈ Western Zodiac - Sign, element, modality and cusp neighbour
//
// Signs come from twelve ordered (month, day) lower boundaries. The cusp
// uses a pseudo day distance of (month - m) * 30 + (day - d), which is
// not true calendar distance near month ends; it is kept as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pseudo-days from a boundary that still count as "on the cusp"
const CUSP_WINDOW: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WesternSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl WesternSign {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for WesternSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classical element. Western signs use Fire/Earth/Air/Water; the Chinese
/// cycle adds Wood and Metal, so both channels compare on one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
    Wood,
    Metal,
}

impl Element {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Earth => "Earth",
            Self::Air => "Air",
            Self::Water => "Water",
            Self::Wood => "Wood",
            Self::Metal => "Metal",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    Cardinal,
    Fixed,
    Mutable,
}

impl Modality {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cardinal => "Cardinal",
            Self::Fixed => "Fixed",
            Self::Mutable => "Mutable",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// BOUNDARY TABLE
// ============================================================================

struct SignBoundary {
    month: u32,
    day: u32,
    sign: WesternSign,
    element: Element,
    modality: Modality,
}

const fn boundary(
    month: u32,
    day: u32,
    sign: WesternSign,
    element: Element,
    modality: Modality,
) -> SignBoundary {
    SignBoundary {
        month,
        day,
        sign,
        element,
        modality,
    }
}

/// First day of each sign, in calendar order
static SIGN_BOUNDARIES: [SignBoundary; 12] = [
    boundary(1, 20, WesternSign::Aquarius, Element::Air, Modality::Fixed),
    boundary(2, 19, WesternSign::Pisces, Element::Water, Modality::Mutable),
    boundary(3, 21, WesternSign::Aries, Element::Fire, Modality::Cardinal),
    boundary(4, 20, WesternSign::Taurus, Element::Earth, Modality::Fixed),
    boundary(5, 21, WesternSign::Gemini, Element::Air, Modality::Mutable),
    boundary(6, 21, WesternSign::Cancer, Element::Water, Modality::Cardinal),
    boundary(7, 23, WesternSign::Leo, Element::Fire, Modality::Fixed),
    boundary(8, 23, WesternSign::Virgo, Element::Earth, Modality::Mutable),
    boundary(9, 23, WesternSign::Libra, Element::Air, Modality::Cardinal),
    boundary(10, 23, WesternSign::Scorpio, Element::Water, Modality::Fixed),
    boundary(11, 22, WesternSign::Sagittarius, Element::Fire, Modality::Mutable),
    boundary(12, 22, WesternSign::Capricorn, Element::Earth, Modality::Cardinal),
];

// ============================================================================
// CALCULATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WesternZodiac {
    pub sign: WesternSign,
    pub element: Element,
    pub modality: Modality,
    /// Neighbouring sign when the date sits within the cusp window of
    /// another sign's boundary. Never changes `sign`.
    pub cusp: Option<WesternSign>,
    pub display: String,
}

pub fn calculate_western_zodiac(month: u32, day: u32) -> WesternZodiac {
    // Dates before Aquarius starts belong to the year-end boundary
    let mut current = &SIGN_BOUNDARIES[SIGN_BOUNDARIES.len() - 1];
    for b in SIGN_BOUNDARIES.iter() {
        if month > b.month || (month == b.month && day >= b.day) {
            current = b;
        }
    }

    let cusp = SIGN_BOUNDARIES
        .iter()
        .filter(|b| b.sign != current.sign)
        .find(|b| {
            let distance = (month as i32 - b.month as i32) * 30 + (day as i32 - b.day as i32);
            distance.abs() <= CUSP_WINDOW
        })
        .map(|b| b.sign);

    let display = match cusp {
        Some(neighbour) => format!("{} (cusp of {})", current.sign, neighbour),
        None => current.sign.to_string(),
    };

    WesternZodiac {
        sign: current.sign,
        element: current.element,
        modality: current.modality,
        cusp,
        display,
    }
}

// ============================================================================
// TESTS
// ============================================================================
