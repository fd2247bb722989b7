// Free-calculator teaser: enough to hook, not enough to satisfy

use crate::patterns::{detect_amplifications, detect_tensions};
use crate::profile::{Profile, Summary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teaser {
    pub first_name: String,
    pub summary: Summary,
    pub headline: String,
    pub body: String,
    pub tension_count: usize,
    pub amplification_count: usize,
    pub has_master_number: bool,
    pub has_karmic_debt: bool,
}

impl Teaser {
    pub fn build(full_name: &str, profile: &Profile) -> Self {
        // Raw first token, casing as typed
        let first = full_name.split_whitespace().next().unwrap_or("").to_string();
        let tension_count = detect_tensions(profile).len();
        let amplification_count = detect_amplifications(profile).len();

        let mut body = if tension_count > 0 {
            format!(
                "Your frequency profile contains {} active tension{}: conflicting signals that most founders never decode. This is where your biggest advantage is hiding.",
                tension_count,
                if tension_count > 1 { "s" } else { "" }
            )
        } else {
            "Your frequency channels are largely aligned, a rare configuration that gives you unusual clarity in decision-making.".to_string()
        };

        // Birthday masters count for the flag but not for the sentence
        if profile.life_path.is_master || profile.expression.is_master {
            body.push_str(
                " You carry a Master Number frequency. Only ~11% of the population does. This amplifies everything.",
            );
        }

        Teaser {
            headline: format!(
                "{}, your founder frequency is {}-{}-{}",
                first, profile.life_path.number, profile.expression.number, profile.western_zodiac.sign
            ),
            first_name: first,
            summary: profile.summary.clone(),
            body,
            tension_count,
            amplification_count,
            has_master_number: profile.life_path.is_master
                || profile.expression.is_master
                || profile.birthday_number.is_master,
            has_karmic_debt: profile.birthday_number.karmic_debt.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::calculate_profile;

    #[test]
    fn test_teaser_with_tensions() {
        let p = calculate_profile("anthony baker", "3/15/1985").unwrap();
        let t = Teaser::build("anthony baker", &p);
        assert_eq!(t.first_name, "anthony");
        assert_eq!(t.headline, "anthony, your founder frequency is 5-8-Pisces");
        assert_eq!(t.tension_count, 4);
        assert!(t.body.starts_with("Your frequency profile contains 4 active tensions:"));
        assert!(!t.has_master_number);
        assert!(!t.has_karmic_debt);
    }

    #[test]
    fn test_teaser_keeps_first_token_as_typed() {
        let p = calculate_profile("Ann Lee", "8/1/1990").unwrap();
        let t = Teaser::build("  mcKAY   Lee ", &p);
        assert_eq!(t.first_name, "mcKAY");
        assert!(t.headline.starts_with("mcKAY, your founder frequency is "));
    }

    #[test]
    fn test_teaser_aligned() {
        let p = calculate_profile("Ann Lee", "8/1/1990").unwrap();
        let t = Teaser::build("Ann Lee", &p);
        assert_eq!(t.tension_count, 0);
        assert_eq!(t.amplification_count, 1);
        assert!(t.body.starts_with("Your frequency channels are largely aligned"));
    }

    #[test]
    fn test_teaser_master_sentence() {
        // Life path 11 adds the sentence; karmic 16 sets the flag
        let p = calculate_profile("Ann Lee", "12/16/1990").unwrap();
        let t = Teaser::build("Ann Lee", &p);
        assert!(t.has_master_number);
        assert!(t.has_karmic_debt);
        assert!(t.body.ends_with("This amplifies everything."));

        // Master birthday only: flag without the sentence
        let p = calculate_profile("Ann Lee", "12/22/1990").unwrap();
        let t = Teaser::build("Ann Lee", &p);
        assert!(t.has_master_number);
        assert!(!t.body.contains("Master Number"));
    }
}
