// 🧬 Profile Assembly - All channels, computed once, never mutated
//
// `Profile` is the standard build. `ExtendedProfile` is a strict superset
// (profile + forecast) built in one pass; its base fields are identical
// to `calculate_profile` for the same input.

use crate::channels::{
    calculate_birthday_number, calculate_chinese_zodiac, calculate_expression_number,
    calculate_life_path, calculate_personality_number, calculate_soul_urge,
    calculate_western_zodiac, BirthdayNumber, ChineseZodiac, ExpressionNumber, LifePath,
    PersonalityNumber, SoulUrge, WesternZodiac,
};
use crate::error::Result;
use crate::forecast::{
    calculate_personal_month, calculate_personal_year, calculate_quarterly_forecast,
    PersonalMonth, PersonalYear, QuarterlyForecast,
};
use crate::parser::{parse_date, DateOfBirth};
use crate::request::required;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    pub dob: String,
    pub parsed: DateOfBirth,
}

/// Flat projection for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub life_path: u32,
    pub birthday: String,
    pub expression: u32,
    pub soul_urge: u32,
    pub personality: u32,
    pub western: String,
    pub chinese: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub input: ProfileInput,
    pub life_path: LifePath,
    pub birthday_number: BirthdayNumber,
    pub expression: ExpressionNumber,
    pub soul_urge: SoulUrge,
    pub personality: PersonalityNumber,
    pub western_zodiac: WesternZodiac,
    pub chinese_zodiac: ChineseZodiac,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedProfile {
    #[serde(flatten)]
    pub profile: Profile,
    pub personal_year: PersonalYear,
    pub personal_month: PersonalMonth,
    pub quarterly_forecast: QuarterlyForecast,
}

/// Standard profile for a full birth name and a raw date string
pub fn calculate_profile(full_name: &str, dob: &str) -> Result<Profile> {
    let name = required(Some(full_name), "name")?;
    required(Some(dob), "dob")?;
    let parsed = parse_date(dob)?;
    Ok(build_profile(name, dob, parsed))
}

/// Profile from an already-parsed date. Total: never fails.
pub fn build_profile(full_name: &str, dob: &str, parsed: DateOfBirth) -> Profile {
    let DateOfBirth { month, day, year } = parsed;

    let life_path = calculate_life_path(month, day, year);
    let birthday_number = calculate_birthday_number(day);
    let expression = calculate_expression_number(full_name);
    let soul_urge = calculate_soul_urge(full_name);
    let personality = calculate_personality_number(full_name);
    let western_zodiac = calculate_western_zodiac(month, day);
    let chinese_zodiac = calculate_chinese_zodiac(year, month, day);

    let summary = Summary {
        life_path: life_path.number,
        birthday: birthday_number.display.clone(),
        expression: expression.number,
        soul_urge: soul_urge.number,
        personality: personality.number,
        western: western_zodiac.display.clone(),
        chinese: chinese_zodiac.display.clone(),
    };

    debug!(
        life_path = life_path.number,
        expression = expression.number,
        western = %western_zodiac.sign,
        chinese = %chinese_zodiac.animal,
        "profile built"
    );

    Profile {
        input: ProfileInput {
            name: full_name.to_string(),
            dob: dob.to_string(),
            parsed,
        },
        life_path,
        birthday_number,
        expression,
        soul_urge,
        personality,
        western_zodiac,
        chinese_zodiac,
        summary,
    }
}

/// Profile plus forecast. `target_year` defaults to the current year;
/// the personal month is for the current calendar month.
pub fn calculate_extended_profile(
    full_name: &str,
    dob: &str,
    target_year: Option<i32>,
) -> Result<ExtendedProfile> {
    calculate_extended_profile_on(full_name, dob, target_year, Local::now().date_naive())
}

/// Same as `calculate_extended_profile` with an explicit "today"
pub fn calculate_extended_profile_on(
    full_name: &str,
    dob: &str,
    target_year: Option<i32>,
    today: NaiveDate,
) -> Result<ExtendedProfile> {
    let profile = calculate_profile(full_name, dob)?;
    let target_year = target_year.unwrap_or_else(|| today.year());
    let DateOfBirth { month, day, .. } = profile.input.parsed;

    let personal_year = calculate_personal_year(month, day, target_year);
    let personal_month = calculate_personal_month(personal_year.number, today.month());
    let quarterly_forecast = calculate_quarterly_forecast(month, day, target_year);

    Ok(ExtendedProfile {
        profile,
        personal_year,
        personal_month,
        quarterly_forecast,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{ChineseAnimal, WesternSign};
    use crate::error::FrequencyError;

    #[test]
    fn test_anthony_baker() {
        let p = calculate_profile("Anthony Baker", "3/15/1985").unwrap();
        assert_eq!(p.input.parsed, DateOfBirth { month: 3, day: 15, year: 1985 });
        assert_eq!(p.life_path.number, 5);
        assert!(!p.life_path.is_master);
        assert_eq!(p.birthday_number.display, "15/6");
        assert_eq!(p.western_zodiac.sign, WesternSign::Pisces);
        assert_eq!(p.chinese_zodiac.animal, ChineseAnimal::Ox);
        assert_eq!(p.summary.life_path, 5);
        assert_eq!(p.summary.western, "Pisces");
        assert_eq!(p.summary.chinese, "Wood Ox (Yin)");
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            calculate_profile("   ", "3/15/1985"),
            Err(FrequencyError::MissingRequiredField("name"))
        );
        assert_eq!(
            calculate_profile("Ann Lee", ""),
            Err(FrequencyError::MissingRequiredField("dob"))
        );
    }

    #[test]
    fn test_invalid_date_propagates() {
        assert_eq!(
            calculate_profile("Ann Lee", "31/31/1985"),
            Err(FrequencyError::InvalidDateFormat("31/31/1985".to_string()))
        );
    }

    #[test]
    fn test_iso_and_us_agree() {
        let a = calculate_profile("Ann Lee", "1984-02-02").unwrap();
        let b = calculate_profile("Ann Lee", "02/02/1984").unwrap();
        assert_eq!(a.input.parsed, b.input.parsed);
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn test_extended_is_superset() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
        let base = calculate_profile("Anthony Baker", "3/15/1985").unwrap();
        let ext = calculate_extended_profile_on("Anthony Baker", "3/15/1985", None, today).unwrap();
        assert_eq!(ext.profile, base);
        assert_eq!(ext.personal_year.year, 2026);
        assert_eq!(ext.personal_year.number, 1);
        assert_eq!(ext.personal_month.month, 5);
        assert_eq!(ext.personal_month.number, 6);
        assert_eq!(ext.quarterly_forecast.personal_year, 1);
    }

    #[test]
    fn test_extended_explicit_target_year() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let ext = calculate_extended_profile_on("Ann Lee", "3/15/1985", Some(2030), today).unwrap();
        // 3 + 6 + (2+0+3+0=5) = 14 → 5
        assert_eq!(ext.personal_year.number, 5);
        assert_eq!(ext.quarterly_forecast.year, 2030);
    }

    #[test]
    fn test_extended_serializes_flat() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let ext = calculate_extended_profile_on("Ann Lee", "3/15/1985", None, today).unwrap();
        let json = serde_json::to_value(&ext).unwrap();
        assert!(json.get("life_path").is_some());
        assert!(json.get("personal_year").is_some());
        assert_eq!(json["western_zodiac"]["sign"], "Pisces");
    }
}
