// 🐉 Chinese Zodiac - Animal, element and polarity of the lunar year
//
// Births before Lunar New Year belong to the previous year. New Year
// dates are tabled for 1924-2044; outside that range Jan 1 - Feb 3 is
// treated as "before new year".

use crate::channels::western::Element;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

const LNY_FIRST_YEAR: i32 = 1924;

/// Lunar New Year (month, day) for each year from 1924 through 2044
static LUNAR_NEW_YEAR: [(u32, u32); 121] = [
    (2, 5), (1, 25), (2, 13), (2, 2), (1, 23), (2, 10), (1, 30), (2, 17), (2, 6), (1, 26), // 1924
    (2, 14), (2, 4), (1, 24), (2, 11), (1, 31), (2, 19), (2, 8), (1, 27), (2, 15), (2, 5), // 1934
    (1, 25), (2, 13), (2, 2), (1, 22), (2, 10), (1, 29), (2, 17), (2, 6), (1, 27), (2, 14), // 1944
    (2, 3), (1, 24), (2, 12), (1, 31), (2, 18), (2, 8), (1, 28), (2, 15), (2, 5), (1, 25), // 1954
    (2, 13), (2, 2), (1, 21), (2, 9), (1, 30), (2, 17), (2, 6), (1, 27), (2, 15), (2, 3), // 1964
    (1, 23), (2, 11), (1, 31), (2, 18), (2, 7), (1, 28), (2, 16), (2, 5), (1, 25), (2, 13), // 1974
    (2, 2), (2, 20), (2, 9), (1, 29), (2, 17), (2, 6), (1, 27), (2, 15), (2, 4), (1, 23), // 1984
    (2, 10), (1, 31), (2, 19), (2, 7), (1, 28), (2, 16), (2, 5), (1, 24), (2, 12), (2, 1), // 1994
    (1, 22), (2, 9), (1, 29), (2, 18), (2, 7), (1, 26), (2, 14), (2, 3), (1, 23), (2, 10), // 2004
    (1, 31), (2, 19), (2, 8), (1, 28), (2, 16), (2, 5), (1, 25), (2, 12), (2, 1), (1, 22), // 2014
    (2, 10), (1, 29), (2, 17), (2, 6), (1, 26), (2, 13), (2, 3), (1, 23), (2, 11), (1, 31), // 2024
    (2, 19), (2, 8), (1, 28), (2, 15), (2, 4), (1, 24), (2, 12), (2, 1), (1, 22), (2, 10), // 2034
    (1, 30), // 2044
];

/// Tabled Lunar New Year (month, day) for `year`, if covered
pub fn lunar_new_year(year: i32) -> Option<(u32, u32)> {
    let index = usize::try_from(year - LNY_FIRST_YEAR).ok()?;
    LUNAR_NEW_YEAR.get(index).copied()
}

// ============================================================================
// CYCLES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChineseAnimal {
    Rat,
    Ox,
    Tiger,
    Rabbit,
    Dragon,
    Snake,
    Horse,
    Goat,
    Monkey,
    Rooster,
    Dog,
    Pig,
}

/// Twelve-year cycle starting at Rat (year 4 CE is a Rat year)
pub const ALL_ANIMALS: [ChineseAnimal; 12] = [
    ChineseAnimal::Rat,
    ChineseAnimal::Ox,
    ChineseAnimal::Tiger,
    ChineseAnimal::Rabbit,
    ChineseAnimal::Dragon,
    ChineseAnimal::Snake,
    ChineseAnimal::Horse,
    ChineseAnimal::Goat,
    ChineseAnimal::Monkey,
    ChineseAnimal::Rooster,
    ChineseAnimal::Dog,
    ChineseAnimal::Pig,
];

impl ChineseAnimal {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rat => "Rat",
            Self::Ox => "Ox",
            Self::Tiger => "Tiger",
            Self::Rabbit => "Rabbit",
            Self::Dragon => "Dragon",
            Self::Snake => "Snake",
            Self::Horse => "Horse",
            Self::Goat => "Goat",
            Self::Monkey => "Monkey",
            Self::Rooster => "Rooster",
            Self::Dog => "Dog",
            Self::Pig => "Pig",
        }
    }
}

impl fmt::Display for ChineseAnimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Five elements, each held for two consecutive years
pub type ChineseElement = Element;

const CHINESE_ELEMENTS: [ChineseElement; 5] = [
    Element::Wood,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Water,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Yang,
    Yin,
}

impl Polarity {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Yang => "Yang",
            Self::Yin => "Yin",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// CALCULATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChineseZodiac {
    pub animal: ChineseAnimal,
    pub element: ChineseElement,
    pub polarity: Polarity,
    /// Lunar year the birth belongs to
    pub effective_year: i32,
    pub display: String,
}

fn before_new_year(year: i32, month: u32, day: u32) -> bool {
    match lunar_new_year(year) {
        Some((lny_month, lny_day)) => month < lny_month || (month == lny_month && day < lny_day),
        None => {
            warn!(year, "no Lunar New Year entry, using Feb 4 cutoff");
            month == 1 || (month == 2 && day < 4)
        }
    }
}

pub fn calculate_chinese_zodiac(year: i32, month: u32, day: u32) -> ChineseZodiac {
    let effective_year = if before_new_year(year, month, day) {
        year - 1
    } else {
        year
    };

    let offset = effective_year - 4;
    let animal = ALL_ANIMALS[offset.rem_euclid(12) as usize];
    let element = CHINESE_ELEMENTS[(offset.rem_euclid(10) / 2) as usize];
    let polarity = if effective_year.rem_euclid(2) == 0 {
        Polarity::Yang
    } else {
        Polarity::Yin
    };

    ChineseZodiac {
        animal,
        element,
        polarity,
        effective_year,
        display: format!("{} {} ({})", element, animal, polarity),
    }
}

// ============================================================================
// TESTS
// ============================================================================
