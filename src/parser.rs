// 📅 Date Parser - Free-form date of birth → (month, day, year)
// Two accepted shapes: US (M/D/YYYY, M-D-YYYY) and ISO (YYYY-M-D)

use crate::error::{FrequencyError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ============================================================================
// DATE OF BIRTH
// ============================================================================

/// Parsed, calendar-valid date of birth. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateOfBirth {
    pub month: u32,
    pub day: u32,
    pub year: i32,
}

impl DateOfBirth {
    /// Build from components, rejecting days that do not exist
    /// (Feb 30, month 13, Feb 29 outside leap years)
    pub fn new(month: u32, day: u32, year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|_| DateOfBirth { month, day, year })
    }

    /// `YYYY-MM-DD`
    pub fn iso(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// `March 15, 1985`
    pub fn long_form(&self) -> String {
        let name = MONTH_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("Unknown");
        format!("{} {}, {}", name, self.day, self.year)
    }
}

impl fmt::Display for DateOfBirth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.month, self.day, self.year)
    }
}

impl FromStr for DateOfBirth {
    type Err = FrequencyError;

    fn from_str(s: &str) -> Result<Self> {
        parse_date(s)
    }
}

// ============================================================================
// PARSING
// ============================================================================

fn is_digits(part: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
}

/// Split `s` into exactly three fields on any of `separators`
fn three_fields<'a>(s: &'a str, separators: &[char]) -> Option<[&'a str; 3]> {
    let mut parts = s.split(|c| separators.contains(&c));
    let fields = [parts.next()?, parts.next()?, parts.next()?];
    if parts.next().is_some() {
        return None;
    }
    Some(fields)
}

/// `M/D/YYYY` or `M-D-YYYY` (1-2 digit month/day, separators may mix)
fn parse_us(s: &str) -> Option<(u32, u32, i32)> {
    let [m, d, y] = three_fields(s, &['/', '-'])?;
    if !(is_digits(m, 1, 2) && is_digits(d, 1, 2) && is_digits(y, 4, 4)) {
        return None;
    }
    Some((m.parse().ok()?, d.parse().ok()?, y.parse().ok()?))
}

/// `YYYY-M-D` (dash only)
fn parse_iso(s: &str) -> Option<(u32, u32, i32)> {
    let [y, m, d] = three_fields(s, &['-'])?;
    if !(is_digits(y, 4, 4) && is_digits(m, 1, 2) && is_digits(d, 1, 2)) {
        return None;
    }
    Some((m.parse().ok()?, d.parse().ok()?, y.parse().ok()?))
}

/// Parse a raw date-of-birth string.
///
/// Surrounding whitespace is ignored. Anything else that is not one of
/// the two accepted shapes, or names a non-existent calendar day, fails
/// with `InvalidDateFormat` carrying the raw input.
pub fn parse_date(raw: &str) -> Result<DateOfBirth> {
    let cleaned = raw.trim();

    parse_us(cleaned)
        .or_else(|| parse_iso(cleaned))
        .and_then(|(month, day, year)| DateOfBirth::new(month, day, year))
        .ok_or_else(|| FrequencyError::InvalidDateFormat(raw.to_string()))
}

// ============================================================================
// TESTS
// ============================================================================
