// Name-derived numerology: Expression, Soul Urge, Personality
// Letters map through the 9-column table (A,J,S=1 ... I,R=9).
// Non A-Z characters carry no value and are skipped.

use crate::reducer::settle;
use serde::{Deserialize, Serialize};
use tracing::debug;

const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

/// Numerology value (1-9) for an ASCII letter, case-insensitive
pub fn letter_value(c: char) -> Option<u32> {
    let upper = c.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some((upper as u32 - 'A' as u32) % 9 + 1)
    } else {
        None
    }
}

fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

/// Uppercased A-Z letters of `text`, in order
fn letters(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_uppercase())
}

// ============================================================================
// EXPRESSION NUMBER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePart {
    pub name_part: String,
    /// Each letter with its value, in name order
    pub letter_values: Vec<(char, u32)>,
    pub raw_sum: u32,
    /// Part value: the raw sum reduced, masters preserved
    pub reduced: u32,
    pub is_master: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionNumber {
    pub number: u32,
    pub reduced: u32,
    pub is_master: bool,
    pub parts: Vec<NamePart>,
    pub calculation: String,
    pub total_before_reduction: u32,
}

fn name_part(token: &str) -> NamePart {
    let letter_values: Vec<(char, u32)> = letters(token)
        .filter_map(|c| letter_value(c).map(|v| (c, v)))
        .collect();
    let raw_sum = letter_values.iter().map(|(_, v)| v).sum();
    let (value, _, is_master) = settle(raw_sum);

    NamePart {
        name_part: token.to_uppercase(),
        letter_values,
        raw_sum,
        reduced: value,
        is_master,
    }
}

/// Expression number over the full birth name.
///
/// Each whitespace-separated token is reduced on its own (masters kept),
/// then the token values are summed and settled again.
pub fn calculate_expression_number(full_name: &str) -> ExpressionNumber {
    let parts: Vec<NamePart> = full_name.split_whitespace().map(name_part).collect();

    let total: u32 = parts.iter().map(|p| p.reduced).sum();
    let (number, reduced, is_master) = settle(total);

    let trace = parts
        .iter()
        .map(|p| format!("{}({}→{})", p.name_part, p.raw_sum, p.reduced))
        .collect::<Vec<_>>()
        .join(" + ");

    debug!(parts = parts.len(), total, number, "expression number");

    ExpressionNumber {
        number,
        reduced,
        is_master,
        calculation: format!("{} = {} → {}", trace, total, number),
        parts,
        total_before_reduction: total,
    }
}

// ============================================================================
// SOUL URGE / PERSONALITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoulUrge {
    pub number: u32,
    pub reduced: u32,
    pub is_master: bool,
    pub vowels_used: Vec<char>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityNumber {
    pub number: u32,
    pub reduced: u32,
    pub is_master: bool,
}

/// Soul Urge: vowels (A, E, I, O, U) of the whole name, one pass
pub fn calculate_soul_urge(full_name: &str) -> SoulUrge {
    let vowels_used: Vec<char> = letters(full_name).filter(|c| is_vowel(*c)).collect();
    let raw: u32 = vowels_used.iter().filter_map(|c| letter_value(*c)).sum();
    let (number, reduced, is_master) = settle(raw);

    SoulUrge {
        number,
        reduced,
        is_master,
        vowels_used,
    }
}

/// Personality: consonants of the whole name (Y counts as a consonant)
pub fn calculate_personality_number(full_name: &str) -> PersonalityNumber {
    let raw: u32 = letters(full_name)
        .filter(|c| !is_vowel(*c))
        .filter_map(letter_value)
        .sum();
    let (number, reduced, is_master) = settle(raw);

    PersonalityNumber {
        number,
        reduced,
        is_master,
    }
}

// ============================================================================
// TESTS
// ============================================================================
