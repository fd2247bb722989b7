// Date-derived numerology: Life Path and Birthday Number

use crate::reducer::{digit_sum, is_karmic_debt, is_master, reduce, settle};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// LIFE PATH
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifePathComponents {
    pub month: u32,
    pub day: u32,
    pub year: u32,
    pub sum: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifePath {
    /// Final value; a master number when the component sum (or its
    /// reduction) lands on 11/22/33
    pub number: u32,
    /// Always a single digit
    pub reduced: u32,
    pub is_master: bool,
    pub calculation: String,
    pub components: LifePathComponents,
}

/// Life Path from the three date components.
///
/// Month, day and the year's digit sum are each reduced without master
/// preservation; only their sum may settle on a master number.
pub fn calculate_life_path(month: u32, day: u32, year: i32) -> LifePath {
    let m = reduce(month, false);
    let d = reduce(day, false);
    let y = reduce(digit_sum(year.unsigned_abs()), false);

    let sum = m + d + y;
    let (number, reduced, master) = settle(sum);

    debug!(month, day, year, sum, number, "life path");

    LifePath {
        number,
        reduced,
        is_master: master,
        calculation: format!(
            "{}→{} | {}→{} | {}→{} | {}+{}+{} = {} → {}",
            month, m, day, d, year, y, m, d, y, sum, number
        ),
        components: LifePathComponents {
            month: m,
            day: d,
            year: y,
            sum,
        },
    }
}

// ============================================================================
// BIRTHDAY NUMBER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayNumber {
    /// Raw day of month (1-31)
    pub compound: u32,
    /// Reduced with master preservation
    pub reduced: u32,
    pub is_master: bool,
    /// `"<day>/<reduced>"` for days 13, 14, 16 and 19
    pub karmic_debt: Option<String>,
    /// `"15/6"` for two-digit days, `"7"` otherwise
    pub display: String,
    pub calculation: String,
}

pub fn calculate_birthday_number(day: u32) -> BirthdayNumber {
    let reduced = reduce(day, true);

    // Karmic debt is a property of the raw day only
    let karmic_debt = is_karmic_debt(day).then(|| format!("{}/{}", day, reduced));

    let display = if day > 9 {
        format!("{}/{}", day, reduced)
    } else {
        day.to_string()
    };

    let calculation = match &karmic_debt {
        Some(k) => format!("Day {} → {} (Karmic Debt {})", day, reduced, k),
        None => format!("Day {} → {}", day, reduced),
    };

    BirthdayNumber {
        compound: day,
        reduced,
        is_master: is_master(day) || is_master(reduced),
        karmic_debt,
        display,
        calculation,
    }
}

// ============================================================================
// TESTS
// ============================================================================
