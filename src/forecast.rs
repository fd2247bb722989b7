// 🗓️ Forecast - Personal Year, Personal Month, Quarterly energies
// No master preservation anywhere in this chain.

use crate::reducer::{digit_sum, reduce};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalYear {
    pub number: u32,
    pub year: i32,
    pub calculation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalMonth {
    pub number: u32,
    pub month: u32,
    pub calculation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterForecast {
    pub quarter: u32,
    pub months: [u32; 3],
    pub energies: [u32; 3],
    pub dominant_energy: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyForecast {
    pub personal_year: u32,
    pub year: i32,
    pub quarters: Vec<QuarterForecast>,
}

pub fn calculate_personal_year(birth_month: u32, birth_day: u32, target_year: i32) -> PersonalYear {
    let m = reduce(birth_month, false);
    let d = reduce(birth_day, false);
    let y = reduce(digit_sum(target_year.unsigned_abs()), false);
    let total = m + d + y;
    let number = reduce(total, false);

    PersonalYear {
        number,
        year: target_year,
        calculation: format!(
            "{}→{} + {}→{} + {}→{} = {} → {}",
            birth_month, m, birth_day, d, target_year, y, total, number
        ),
    }
}

pub fn calculate_personal_month(personal_year: u32, calendar_month: u32) -> PersonalMonth {
    let total = personal_year + calendar_month;
    let number = reduce(total, false);

    PersonalMonth {
        number,
        month: calendar_month,
        calculation: format!("PY{} + M{} = {} → {}", personal_year, calendar_month, total, number),
    }
}

/// Most frequent energy; ties go to the lowest energy value.
///
/// Returns 0 for an empty slice.
pub fn dominant_energy(energies: &[u32]) -> u32 {
    let mut best = (0usize, 0u32);
    for &energy in energies {
        let count = energies.iter().filter(|&&e| e == energy).count();
        let better = count > best.0 || (count == best.0 && energy < best.1);
        if better {
            best = (count, energy);
        }
    }
    best.1
}

pub fn calculate_quarterly_forecast(birth_month: u32, birth_day: u32, target_year: i32) -> QuarterlyForecast {
    let personal_year = calculate_personal_year(birth_month, birth_day, target_year).number;

    let quarters = (1..=4)
        .map(|quarter| {
            let first = (quarter - 1) * 3 + 1;
            let months = [first, first + 1, first + 2];
            let energies = months.map(|m| calculate_personal_month(personal_year, m).number);
            QuarterForecast {
                quarter,
                months,
                energies,
                dominant_energy: dominant_energy(&energies),
            }
        })
        .collect();

    QuarterlyForecast {
        personal_year,
        year: target_year,
        quarters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_year() {
        // 3/15 in 2026: 3 + 6 + (2+0+2+6=10→1) = 10 → 1
        let py = calculate_personal_year(3, 15, 2026);
        assert_eq!(py.number, 1);
        assert_eq!(py.year, 2026);
        assert_eq!(py.calculation, "3→3 + 15→6 + 2026→1 = 10 → 1");
    }

    #[test]
    fn test_personal_year_never_master() {
        // 2/9/2000 → 2 + 9 + 2 = 13 → 4
        assert_eq!(calculate_personal_year(2, 9, 2000).number, 4);
        for year in 1990..2040 {
            for month in 1..=12 {
                let n = calculate_personal_year(month, 29, year).number;
                assert!((1..=9).contains(&n));
            }
        }
    }

    #[test]
    fn test_personal_month() {
        let pm = calculate_personal_month(9, 2);
        assert_eq!(pm.number, 2);
        assert_eq!(pm.calculation, "PY9 + M2 = 11 → 2");
    }

    #[test]
    fn test_dominant_energy_plurality() {
        assert_eq!(dominant_energy(&[4, 9, 9]), 9);
        assert_eq!(dominant_energy(&[7, 7, 1]), 7);
    }

    #[test]
    fn test_dominant_energy_tie_goes_to_lowest() {
        assert_eq!(dominant_energy(&[8, 3, 5]), 3);
        assert_eq!(dominant_energy(&[6, 2, 6, 2]), 2);
        assert_eq!(dominant_energy(&[]), 0);
    }

    #[test]
    fn test_quarterly_forecast_layout() {
        let qf = calculate_quarterly_forecast(3, 15, 2026);
        assert_eq!(qf.personal_year, 1);
        assert_eq!(qf.quarters.len(), 4);
        assert_eq!(qf.quarters[0].months, [1, 2, 3]);
        assert_eq!(qf.quarters[3].months, [10, 11, 12]);
        // PY1: months 1..3 → 2, 3, 4
        assert_eq!(qf.quarters[0].energies, [2, 3, 4]);
        assert_eq!(qf.quarters[0].dominant_energy, 2);
        // PY1: months 10..12 → 11→2, 12→3, 13→4
        assert_eq!(qf.quarters[3].energies, [2, 3, 4]);
    }
}
