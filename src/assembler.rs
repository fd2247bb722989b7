// 🧾 Prompt Assembler - Tier-specific prompt text from a profile
//
// Two product tiers:
//   - insight   → concise snapshot, one table, upgrade hint at the end
//   - blueprint → full report with partnership, action plan and forecast
//
// All descriptive text comes from the lookup tables; a missing entry
// renders as `{}` or a placeholder line, never an error.

use crate::error::Result;
use crate::forecast::{PersonalYear, QuarterlyForecast};
use crate::matrix::{LookupTables, Matrix};
use crate::patterns::{detect_amplifications, detect_tensions, Amplification, Tension};
use crate::profile::{calculate_extended_profile_on, calculate_profile, ExtendedProfile, Profile, Summary};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::info;

// ============================================================================
// TIERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Insight,
    Blueprint,
}

impl Tier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::Insight => "insight",
            Tier::Blueprint => "blueprint",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insight" => Ok(Tier::Insight),
            "blueprint" => Ok(Tier::Blueprint),
            other => Err(format!("Tier must be \"insight\" or \"blueprint\", got {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierSelection {
    Insight,
    Blueprint,
    Both,
}

impl TierSelection {
    fn includes(self, tier: Tier) -> bool {
        matches!(
            (self, tier),
            (TierSelection::Both, _)
                | (TierSelection::Insight, Tier::Insight)
                | (TierSelection::Blueprint, Tier::Blueprint)
        )
    }
}

impl From<Tier> for TierSelection {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Insight => TierSelection::Insight,
            Tier::Blueprint => TierSelection::Blueprint,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledPrompts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<String>,
}

/// Structured result shipped alongside a generated report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub summary: Summary,
    pub tensions: Vec<Tension>,
    pub amplifications: Vec<Amplification>,
    pub personal_year: PersonalYear,
    pub quarterly_forecast: QuarterlyForecast,
}

// ============================================================================
// SHARED TEXT
// ============================================================================

const SYSTEM_PROMPT_CORE: &str = r#"You are the Founder Frequency Report Engine. You generate deeply personal, applied-business intelligence reports that decode an entrepreneur's operating frequency: the invisible patterns that drive their decisions, risk tolerance, leadership style, and wealth-building approach.

Your analytical framework synthesizes five frequency channels: numerological life path, birthday talent imprint, expression frequency, western zodiac energy, and Chinese zodiac archetype. Together these channels form a unique founder frequency that shapes every business decision.

Your tone is direct, confident, and personal, like a strategic advisor who can see patterns the founder can't see in themselves. Write in second person ("you"), address the subject by first name throughout, and always tie abstract traits to concrete business behaviors the subject will recognize.

You NEVER:
- Use generic horoscope language without business-specific context
- Hedge with "this may or may not apply" disclaimers
- List traits without explaining their business implications
- Repeat the same insight in different chapters
- Use bullet points in narrative sections (tables and matrices are acceptable)

You ALWAYS:
- Reference the subject by first name at least 2x per chapter
- Tie every trait to a specific business scenario, decision type, or revenue pattern
- Name the specific number or sign driving each insight (e.g., "Your 7 frequency makes you...")
- Describe TENSIONS between conflicting frequency channels as the most valuable insights
- End each chapter with a concrete, actionable directive

FORMATTING:
- Callout boxes: wrap in [CALLOUT] ... [/CALLOUT] tags, one per chapter, actionable and specific
- Tables: use markdown table format
- Section headings: use **Bold Text** for sub-section headings within chapters
- Chapter headers: use ## CHAPTER N: Title format"#;

const INSIGHT_RULES: &str = r#"TIER-SPECIFIC RULES (FREQUENCY REPORT):
- This is a CONCISE frequency snapshot. Prioritize the single most important insight per chapter.
- Each chapter: 400-600 words. Total report: 3,500-5,000 words.
- Do NOT include Insight Boxes (those are Premium-exclusive). Only include Callout Boxes.
- Include ONE table only: a simplified 4-row risk matrix in Chapter 3.
- Use {first_name}'s name 15+ times total.
- Every chapter references at least 2 of the 5 frequency channels.
- End the report with an upgrade CTA teasing deeper frequency analysis available.
- Do NOT mention the Blueprint by name; simply hint that deeper analysis of burnout frequency, partnerships, and action planning exists."#;

const INSIGHT_STRUCTURE: &str = r#"Generate the Founder Frequency Report for {first_name}:

## EXECUTIVE PROFILE SNAPSHOT (~300 words)
- Who they are as a founder: 3 paragraphs, unified frequency profile
- [CALLOUT] Your Core Frequency, 2 sentences [/CALLOUT]

## CHAPTER 1: Decision-Making Frequency (~500 words)
- Primary decision loop (Life Path + Western Zodiac blend)
- One key tension described as a frequency conflict
- [CALLOUT] Your Decision Frequency in Practice [/CALLOUT]

## CHAPTER 2: Wealth Frequency (~500 words)
- Core money frequency (Expression number focus)
- Earning style overview
- [CALLOUT] Your Wealth Frequency [/CALLOUT]

## CHAPTER 3: Risk Tolerance Profile (~600 words)
- Dual-channel overview (analytical vs. emotional frequency)
- Include a simplified table: 4 scenarios | Tolerance | Driver
- [CALLOUT] Your Risk Frequency [/CALLOUT]

## CHAPTER 4: Leadership Frequency (~400 words)
- Primary leadership archetype + one pressure-mode shift
- [CALLOUT] Your Leadership Frequency [/CALLOUT]

## CHAPTER 5: Scaling Snapshot (~400 words)
- Natural scaling pattern named
- Where growth typically stalls for this frequency
- [CALLOUT] Your Scaling Rule [/CALLOUT]

## CHAPTER 6: Blind Spots (~400 words)
- TWO blind spots (the most expensive + the stress response)
- Each tied to specific frequency channels
- [CALLOUT] The Uncomfortable Truth [/CALLOUT]

## CHAPTER 7: Revenue Model Fit (~400 words)
- Top 3 aligned models (1 sentence each)
- One "proceed with caution" model
- [CALLOUT] Your Revenue Frequency Filter, 2 questions [/CALLOUT]

## CLOSING (~150 words)
- Personal, encouraging, honest
- Hint that deeper frequency analysis exists (burnout pattern, partnership compatibility, 90-day plan)
- Do NOT name the product; let curiosity drive the upgrade"#;

const BLUEPRINT_RULES: &str = r#"TIER-SPECIFIC RULES (FULL FREQUENCY BLUEPRINT):
- This is a COMPREHENSIVE frequency blueprint. Go deep on every chapter.
- Each main chapter: 900-1200 words. Premium sections: 500-700 words. Total: 8,000-12,000 words.
- Include [INSIGHT] boxes on every chapter, each containing a genuine "uncomfortable truth."
- Include tables in Risk Tolerance (8-scenario matrix), Scaling (5-7 tendencies), and Revenue Models (alignment table).
- Include the Partnership Compatibility Matrix as a table in Chapter 9.
- Use {first_name}'s name 25+ times total.
- Every chapter references at least 3 of the 5 frequency channels.
- All detected frequency tensions must be described as dynamics throughout the report.
- The 90-Day Action Plan must reference their specific frequency markers.
- The Quarterly Forecast must tie frequency themes to concrete business actions.
- Do NOT include any upsell CTA; this is the top tier."#;

const BLUEPRINT_STRUCTURE: &str = r#"Generate the complete Founder Frequency Blueprint for {first_name}:

## EXECUTIVE PROFILE SYNTHESIS (~500 words)
- Full unified frequency profile, all 5 channels woven together
- What makes this specific frequency combination rare or noteworthy
- Central tension in their founder frequency
- [CALLOUT] Your Core Frequency [/CALLOUT]

## CHAPTER 1: Decision-Making Frequency (~1,000 words)
- 3-4 sub-sections: primary loop, override pattern, speed modifier, talent layer
- All active frequency tensions described as dynamics
- [CALLOUT] Your Decision Frequency in Practice [/CALLOUT]
- [INSIGHT] The decision pattern they can't see [/INSIGHT]

## CHAPTER 2: Wealth Frequency (~1,000 words)
- 3-4 sub-sections: money frequency, earning style, communication multiplier, wealth type
- [CALLOUT] Your Wealth Frequency [/CALLOUT]
- [INSIGHT] The financial belief costing them money [/INSIGHT]

## CHAPTER 3: Risk Tolerance Profile (~1,200 words)
- 3-4 sub-sections: dual frequency channels, collision points, triggers, speculative vs. strategic
- FULL Risk Matrix Table: 6-8 scenarios | Tolerance | Driver
- [CALLOUT] Your Risk Frequency: The Real Answer [/CALLOUT]
- [INSIGHT] The risk behavior they rationalize [/INSIGHT]

## CHAPTER 4: Leadership Frequency (~1,000 words)
- 3-4 sub-sections: default mode, command mode, delegation patterns, team culture
- [CALLOUT] Your Leadership Frequency [/CALLOUT]
- [INSIGHT] The leadership weakness they call a strength [/INSIGHT]

## CHAPTER 5: Scaling Frequency (~1,000 words)
- 3-4 sub-sections: scaling pattern, growth stage strength, plateau causes, partner needs
- Scaling Tendencies Table: 5-7 patterns | Impact
- [CALLOUT] Your Scaling Rule [/CALLOUT]
- [INSIGHT] The scaling behavior that feels productive but stalls growth [/INSIGHT]

## CHAPTER 6: Emotional Blind Spots (~1,000 words)
- 4 named blind spots: most expensive, relationship, stress response, self-perception
- Each tied to specific frequency channels
- [CALLOUT] The Uncomfortable Truth: the meta-blind-spot [/CALLOUT]
- [INSIGHT] What they need externally to compensate [/INSIGHT]

## CHAPTER 7: Revenue Model Alignment (~1,000 words)
- Tier 1 Highest (2-3 models, detailed), Tier 2 Strong (2-3), Tier 3 Caution (2-3)
- Revenue Model Alignment Table: model | tier | driver
- [CALLOUT] Your Revenue Frequency Filter, 3 questions [/CALLOUT]
- [INSIGHT] The model they're attracted to but shouldn't lead with [/INSIGHT]

## CHAPTER 8: Your Burnout Frequency (~700 words) [PREMIUM]
- 5-phase cycle: Trigger → Escalation → Break → Recovery → Re-entry
- Specific to their frequency combination, not generic
- [CALLOUT] Burnout Prevention Protocol, 3 actions [/CALLOUT]

## CHAPTER 9: Partnership Compatibility Matrix (~700 words) [PREMIUM]
- Use the partnership data provided to describe ideal frequency matches for: Co-founder, Operations #2, Creative collaborator, Investor, Mentor
- Include a summary table: Role | Ideal Type | Why | Red Flag Type
- [CALLOUT] Your Ideal #2 [/CALLOUT]

## CHAPTER 10: 90-Day Strategic Action Plan (~600 words) [PREMIUM]
- Use the action plan archetype data provided
- Phase 1 (Days 1-30): Foundation, specific focus + avoid
- Phase 2 (Days 31-60): Build, specific focus + avoid
- Phase 3 (Days 61-90): Launch, specific focus + avoid
- Include the 3 permission slips
- [CALLOUT] Your Non-Negotiable for the Next 90 Days [/CALLOUT]

## CHAPTER 11: Quarterly Frequency Forecast (~500 words) [PREMIUM]
- Use the quarterly data provided
- Map each quarter to a frequency theme + specific business action
- Name the Power Quarter: when to make biggest moves
- [CALLOUT] Your Power Quarter [/CALLOUT]

## CLOSING: Final Word (~300 words)
- Deep, personal, direct
- Central challenge and central capacity
- No upsell CTA; this is the top tier"#;

// ============================================================================
// HELPERS
// ============================================================================

/// First whitespace token, first letter upper, rest lower
pub fn first_name(full_name: &str) -> String {
    let token = full_name.split_whitespace().next().unwrap_or("");
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Channels holding a master number, e.g. `["Life Path 11", "Birthday 22"]`
pub fn master_positions(profile: &Profile) -> Vec<String> {
    let mut positions = Vec::new();
    if profile.life_path.is_master {
        positions.push(format!("Life Path {}", profile.life_path.number));
    }
    if profile.birthday_number.is_master {
        positions.push(format!("Birthday {}", profile.birthday_number.compound));
    }
    if profile.expression.is_master {
        positions.push(format!("Expression {}", profile.expression.number));
    }
    positions
}

fn birthday_entry(matrix: &Matrix, compound: u32, reduced: u32) -> String {
    let reduced_key = reduced.to_string();
    let compound_key = compound.to_string();
    let base = matrix.entry(&["birthday_number", &reduced_key]);
    let compound_note = matrix.text(&["birthday_compound", &compound_key], "");

    let mut parts = Vec::new();
    if let Some(talent) = base.get("talent").and_then(Value::as_str) {
        let gift = base.get("business_gift").and_then(Value::as_str).unwrap_or("N/A");
        parts.push(format!("Talent: {}", talent));
        parts.push(format!("Business Gift: {}", gift));
    }
    if !compound_note.is_empty() {
        parts.push(format!("Compound {} Note: {}", compound, compound_note));
    }

    if parts.is_empty() {
        format!("Birthday {}: No entry.", compound)
    } else {
        parts.join("\n")
    }
}

fn chinese_entry(matrix: &Matrix, animal: &str, element: &str) -> String {
    let mut parts = Vec::new();
    if let Some(a) = matrix.get(&["chinese_zodiac", "animals", animal]).filter(|v| non_empty_object(v)) {
        parts.push(format!("ANIMAL ({}):\n{}", animal, to_pretty(a)));
    }
    if let Some(e) = matrix.get(&["chinese_zodiac", "elements", element]).filter(|v| non_empty_object(v)) {
        parts.push(format!("ELEMENT ({}):\n{}", element, to_pretty(e)));
    }
    parts.join("\n\n")
}

fn non_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(|o| !o.is_empty())
}

fn to_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// `- tag: description` lines for tags that have a description
fn pattern_lines<'a>(matrix: &Matrix, table: &str, tags: impl Iterator<Item = &'a str>) -> Vec<String> {
    tags.filter_map(|tag| {
        let text = matrix.text(&["combination_rules", table, tag], "");
        (!text.is_empty()).then(|| format!("- {}: {}", tag, text))
    })
    .collect()
}

fn priority_text(matrix: &Matrix) -> String {
    let Some(priority) = matrix
        .get(&["combination_rules", "priority_hierarchy"])
        .and_then(Value::as_object)
    else {
        return String::new();
    };

    priority
        .iter()
        .map(|(channel, signals)| {
            let chain = signals
                .as_array()
                .map(|list| list.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(" > "))
                .unwrap_or_default();
            format!("  {}: {}", channel, chain)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn partnership_data(extended: &Matrix, life_path: u32) -> String {
    let key = life_path.to_string();
    let entry = extended.entry(&["partnership_compatibility", &key]);
    if entry.is_empty() {
        "No partnership data for this Life Path.".to_string()
    } else {
        to_pretty(&Value::Object(entry))
    }
}

/// Best-scoring action plan archetype. Ties go to the first in table order.
pub fn action_plan(extended: &Matrix, life_path: u32, expression: u32, western: &str, animal: &str) -> String {
    let Some(plans) = extended.get(&["action_plan_archetypes"]).and_then(Value::as_object) else {
        return "No matching action plan archetype.".to_string();
    };

    let lp = format!("LP{}", life_path);
    let expr = format!("Expr{}", expression);
    let lp_expr = format!("LP{} + Expr{}", life_path, expression);
    let lp_sign = format!("LP{} + {}", life_path, western);

    let mut best: Option<(&String, &Value, &str, u32)> = None;
    for (key, plan) in plans {
        if key.starts_with('_') {
            continue;
        }
        let Some(applies) = plan.get("applies_to").and_then(Value::as_str) else {
            continue;
        };

        // Substring matches: "LP1" also matches inside "LP11"
        let score = [
            (applies.contains(&lp), 3),
            (applies.contains(&expr), 2),
            (applies.contains(western), 1),
            (applies.contains(animal), 1),
            (applies.contains(&lp_expr), 5),
            (applies.contains(&lp_sign), 4),
        ]
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, points)| points)
        .sum::<u32>();

        if best.map_or(true, |(_, _, _, top)| score > top) {
            best = Some((key, plan, applies, score));
        }
    }

    match best {
        Some((key, plan, applies, _)) => {
            format!("ARCHETYPE: {}\nApplies to: {}\n{}", key, applies, to_pretty(plan))
        }
        None => "No matching action plan archetype.".to_string(),
    }
}

fn quarterly_data(extended: &Matrix, forecast: &QuarterlyForecast) -> String {
    let py = forecast.personal_year.to_string();
    let theme = extended.text(&["personal_year_business", &py, "theme"], "N/A");
    let mut lines = vec![format!("PERSONAL YEAR: {} - {}", forecast.personal_year, theme)];

    for q in &forecast.quarters {
        lines.push(format!(
            "\nQ{} (Months {}-{}), Dominant Energy: {}",
            q.quarter, q.months[0], q.months[2], q.dominant_energy
        ));
        for (month, energy) in q.months.iter().zip(q.energies.iter()) {
            let energy_key = energy.to_string();
            let text = extended.text(&["personal_month_business", &energy_key], "");
            lines.push(format!("  Month {} (PM{}): {}", month, energy, text));
        }
    }

    lines.join("\n")
}

// ============================================================================
// CHANNEL DIGEST
// ============================================================================

/// Everything the templates read, resolved once against the tables
struct ChannelDigest {
    full_name: String,
    first_name: String,
    dob_display: String,
    lp_num: u32,
    lp_archetype: String,
    bd_display: String,
    bd_talent: String,
    expr_num: u32,
    expr_archetype: String,
    su_num: u32,
    pn_num: u32,
    w_sign: String,
    w_display: String,
    w_elem: String,
    w_mod: String,
    c_animal: String,
    c_elem: String,
    c_display: String,
    karmic: Option<String>,
    karmic_text: String,
    masters: Vec<String>,
    tensions: Vec<Tension>,
    tension_descriptions: Vec<String>,
    amp_descriptions: Vec<String>,
    lp_matrix: String,
    bd_matrix: String,
    expr_matrix: String,
    western_matrix: String,
    chinese_matrix: String,
    priority_text: String,
}

impl ChannelDigest {
    fn new(profile: &Profile, matrix: &Matrix) -> Self {
        let lp_key = profile.life_path.number.to_string();
        let expr_key = profile.expression.number.to_string();
        let bd_key = profile.birthday_number.reduced.to_string();
        let sign = profile.western_zodiac.sign.name();
        let animal = profile.chinese_zodiac.animal.name();
        let element = profile.chinese_zodiac.element.name();

        let tensions = detect_tensions(profile);
        let amplifications = detect_amplifications(profile);
        let karmic = profile.birthday_number.karmic_debt.clone();
        let karmic_text = karmic
            .as_deref()
            .map(|k| matrix.text(&["karmic_debt_business_impact", k], ""))
            .unwrap_or_default();

        ChannelDigest {
            full_name: profile.input.name.clone(),
            first_name: first_name(&profile.input.name),
            dob_display: profile.input.parsed.long_form(),
            lp_num: profile.life_path.number,
            lp_archetype: matrix.text(&["life_path", &lp_key, "archetype"], &format!("LP {}", lp_key)),
            bd_display: profile.birthday_number.display.clone(),
            bd_talent: matrix.text(&["birthday_number", &bd_key, "talent"], ""),
            expr_num: profile.expression.number,
            // Expression archetypes share the life_path table
            expr_archetype: matrix.text(&["life_path", &expr_key, "archetype"], &format!("Expr {}", expr_key)),
            su_num: profile.soul_urge.number,
            pn_num: profile.personality.number,
            w_sign: sign.to_string(),
            w_display: profile.western_zodiac.display.clone(),
            w_elem: profile.western_zodiac.element.to_string(),
            w_mod: profile.western_zodiac.modality.to_string(),
            c_animal: animal.to_string(),
            c_elem: element.to_string(),
            c_display: profile.chinese_zodiac.display.clone(),
            karmic,
            karmic_text,
            masters: master_positions(profile),
            tension_descriptions: pattern_lines(
                matrix,
                "tension_patterns",
                tensions.iter().map(|t| t.as_str()),
            ),
            amp_descriptions: pattern_lines(
                matrix,
                "amplification_patterns",
                amplifications.iter().map(|a| a.as_str()),
            ),
            tensions,
            lp_matrix: matrix.pretty(&["life_path", &lp_key]),
            bd_matrix: birthday_entry(
                matrix,
                profile.birthday_number.compound,
                profile.birthday_number.reduced,
            ),
            expr_matrix: matrix.pretty(&["life_path", &expr_key]),
            western_matrix: matrix.pretty(&["western_zodiac", sign]),
            chinese_matrix: chinese_entry(matrix, animal, element),
            priority_text: priority_text(matrix),
        }
    }

    /// `<subject_profile>` block; `extra` lines are appended verbatim
    fn subject_profile(&self, secondary_note: &str, extra: &[String]) -> String {
        let mut lines = vec![
            format!("NAME: {}", self.full_name),
            format!("FIRST NAME: {}", self.first_name),
            format!("DATE OF BIRTH: {}", self.dob_display),
            String::new(),
            "FREQUENCY CHANNELS:".to_string(),
            format!("- Life Path Frequency: {} - {}", self.lp_num, self.lp_archetype),
            format!("- Birthday Imprint: {} - {}", self.bd_display, self.bd_talent),
            format!("- Expression Frequency: {} - {}", self.expr_num, self.expr_archetype),
            format!("- Soul Urge: {} | Personality: {}{}", self.su_num, self.pn_num, secondary_note),
            format!("- Western Zodiac: {} | {}, {}", self.w_display, self.w_elem, self.w_mod),
            format!("- Chinese Zodiac: {}", self.c_display),
        ];
        if let Some(k) = &self.karmic {
            lines.push(format!("- KARMIC DEBT: {} - {}", k, self.karmic_text));
        }
        if !self.masters.is_empty() {
            lines.push(format!("- MASTER NUMBERS: {}", self.masters.join(", ")));
        }
        lines.extend(extra.iter().cloned());
        format!("<subject_profile>\n{}\n</subject_profile>", lines.join("\n"))
    }

    /// Channel sections shared by both tiers
    fn channel_sections(&self) -> String {
        format!(
            "=== LIFE PATH {} ===\n{}\n\n=== BIRTHDAY {} ===\n{}\n\n=== EXPRESSION {} ===\n{}\n\n=== WESTERN: {} ===\n{}\n\n=== CHINESE: {} + {} ===\n{}",
            self.lp_num,
            self.lp_matrix,
            self.bd_display,
            self.bd_matrix,
            self.expr_num,
            self.expr_matrix,
            self.w_sign,
            self.western_matrix,
            self.c_animal,
            self.c_elem,
            self.chinese_matrix,
        )
    }

    fn system_block(&self, rules: &str) -> String {
        format!(
            "<s>\n{}\n\n{}\n</s>",
            SYSTEM_PROMPT_CORE,
            rules.replace("{first_name}", &self.first_name)
        )
    }

    fn structure_block(&self, structure: &str) -> String {
        format!(
            "<report_structure>\n{}\n</report_structure>",
            structure.replace("{first_name}", &self.first_name)
        )
    }
}

// ============================================================================
// ASSEMBLER
// ============================================================================

pub struct PromptAssembler {
    tables: LookupTables,
    today: Option<NaiveDate>,
    target_year: Option<i32>,
}

impl PromptAssembler {
    pub fn new(tables: LookupTables) -> Self {
        PromptAssembler {
            tables,
            today: None,
            target_year: None,
        }
    }

    /// Forecast year; defaults to the current year
    pub fn with_target_year(mut self, year: Option<i32>) -> Self {
        self.target_year = year;
        self
    }

    /// Pin "today" (forecast year and personal month)
    #[cfg(test)]
    pub(crate) fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn extended_profile(&self, full_name: &str, dob: &str) -> Result<ExtendedProfile> {
        calculate_extended_profile_on(full_name, dob, self.target_year, self.today())
    }

    pub fn assemble_insight_prompt(&self, full_name: &str, dob: &str) -> Result<String> {
        let profile = calculate_profile(full_name, dob)?;
        let d = ChannelDigest::new(&profile, &self.tables.matrix);

        let top_tension = d
            .tension_descriptions
            .first()
            .cloned()
            .unwrap_or_else(|| "None detected.".to_string());

        info!(tier = "insight", tensions = d.tensions.len(), "prompt assembled");

        Ok([
            d.system_block(INSIGHT_RULES),
            d.subject_profile(" (secondary)", &[]),
            format!(
                "<frequency_data>\n{}\n\n=== PRIMARY FREQUENCY TENSION ===\n{}\n</frequency_data>",
                d.channel_sections(),
                top_tension
            ),
            d.structure_block(INSIGHT_STRUCTURE),
        ]
        .join("\n\n"))
    }

    pub fn assemble_blueprint_prompt(&self, full_name: &str, dob: &str) -> Result<String> {
        let ext = self.extended_profile(full_name, dob)?;
        let profile = &ext.profile;
        let d = ChannelDigest::new(profile, &self.tables.matrix);
        let extended = &self.tables.extended;
        let year = ext.personal_year.year;

        let partnership = partnership_data(extended, d.lp_num);
        let plan = action_plan(extended, d.lp_num, d.expr_num, &d.w_sign, &d.c_animal);
        let py_key = ext.personal_year.number.to_string();
        let py_data = extended.pretty(&["personal_year_business", &py_key]);
        let quarterly = quarterly_data(extended, &ext.quarterly_forecast);

        let tensions = if d.tension_descriptions.is_empty() {
            "None - signals largely aligned.".to_string()
        } else {
            d.tension_descriptions.join("\n")
        };
        let amplifications = if d.amp_descriptions.is_empty() {
            "None detected.".to_string()
        } else {
            d.amp_descriptions.join("\n")
        };

        let forecast_lines = [
            format!("- Personal Year ({}): {}", year, ext.personal_year.number),
            format!("- Personal Month: {}", ext.personal_month.number),
        ];

        info!(tier = "blueprint", tensions = d.tensions.len(), year, "prompt assembled");

        Ok([
            d.system_block(BLUEPRINT_RULES),
            d.subject_profile("", &forecast_lines),
            format!(
                "<frequency_data>\n{}\n\n=== COMBINATION RULES ===\nPRIORITY HIERARCHY:\n{}\n\nACTIVE FREQUENCY TENSIONS:\n{}\n\nFREQUENCY AMPLIFICATIONS:\n{}\n</frequency_data>",
                d.channel_sections(),
                d.priority_text,
                tensions,
                amplifications
            ),
            format!(
                "<premium_data>\n=== PARTNERSHIP COMPATIBILITY (Life Path {}) ===\n{}\n\n=== 90-DAY ACTION PLAN ARCHETYPE ===\n{}\n\n=== PERSONAL YEAR FORECAST ===\n{}\n\n=== QUARTERLY FREQUENCY FORECAST ({}) ===\n{}\n</premium_data>",
                d.lp_num, partnership, plan, py_data, year, quarterly
            ),
            d.structure_block(BLUEPRINT_STRUCTURE),
        ]
        .join("\n\n"))
    }

    pub fn prompt(&self, full_name: &str, dob: &str, tier: Tier) -> Result<String> {
        match tier {
            Tier::Insight => self.assemble_insight_prompt(full_name, dob),
            Tier::Blueprint => self.assemble_blueprint_prompt(full_name, dob),
        }
    }

    pub fn assemble(&self, full_name: &str, dob: &str, selection: TierSelection) -> Result<AssembledPrompts> {
        let mut prompts = AssembledPrompts::default();
        if selection.includes(Tier::Insight) {
            prompts.insight = Some(self.assemble_insight_prompt(full_name, dob)?);
        }
        if selection.includes(Tier::Blueprint) {
            prompts.blueprint = Some(self.assemble_blueprint_prompt(full_name, dob)?);
        }
        Ok(prompts)
    }

    pub fn metadata(&self, full_name: &str, dob: &str) -> Result<ProfileMetadata> {
        let ext = self.extended_profile(full_name, dob)?;
        Ok(ProfileMetadata {
            summary: ext.profile.summary.clone(),
            tensions: detect_tensions(&ext.profile),
            amplifications: detect_amplifications(&ext.profile),
            personal_year: ext.personal_year,
            quarterly_forecast: ext.quarterly_forecast,
        })
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        PromptAssembler::new(LookupTables::empty())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrequencyError;
    use serde_json::json;

    fn tables() -> LookupTables {
        LookupTables::new(
            Matrix::from_value(json!({
                "life_path": {
                    "5": { "archetype": "The Catalyst" },
                    "8": { "archetype": "The Builder" }
                },
                "birthday_number": { "6": { "talent": "Nurturing operator" } },
                "birthday_compound": { "15": "Magnetic persuader" },
                "western_zodiac": { "Pisces": { "business_style": "intuitive" } },
                "chinese_zodiac": {
                    "animals": { "Ox": { "trait": "endurance" } },
                    "elements": { "Wood": {} }
                },
                "combination_rules": {
                    "priority_hierarchy": { "decisions": ["life_path", "western"] },
                    "tension_patterns": { "speed_vs_depth": "Fast instincts, slow verification." },
                    "amplification_patterns": {}
                }
            })),
            Matrix::from_value(json!({
                "partnership_compatibility": { "5": { "co_founder": "LP4" } },
                "action_plan_archetypes": {
                    "_comment": "ignored",
                    "steady_builder": { "applies_to": "LP4, Capricorn" },
                    "catalyst_sprint": { "applies_to": "LP5 + Pisces, Ox" },
                    "plain_catalyst": { "applies_to": "LP5" }
                },
                "personal_year_business": { "1": { "theme": "New beginnings" } },
                "personal_month_business": { "2": "Partnerships" }
            })),
        )
    }

    fn assembler() -> PromptAssembler {
        PromptAssembler::new(tables()).with_today(NaiveDate::from_ymd_opt(2026, 5, 10).unwrap())
    }

    #[test]
    fn test_first_name() {
        assert_eq!(first_name("  aNTHONY baker"), "Anthony");
        assert_eq!(first_name(""), "");
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!("insight".parse::<Tier>(), Ok(Tier::Insight));
        assert_eq!(" Blueprint ".parse::<Tier>(), Ok(Tier::Blueprint));
        assert!("circle".parse::<Tier>().is_err());
    }

    #[test]
    fn test_insight_prompt_content() {
        let prompt = assembler().assemble_insight_prompt("Anthony Baker", "3/15/1985").unwrap();
        assert!(prompt.starts_with("<s>\nYou are the Founder Frequency Report Engine."));
        assert!(prompt.contains("Use Anthony's name 15+ times total."));
        assert!(prompt.contains("DATE OF BIRTH: March 15, 1985"));
        assert!(prompt.contains("- Life Path Frequency: 5 - The Catalyst"));
        assert!(prompt.contains("- Birthday Imprint: 15/6 - Nurturing operator"));
        assert!(prompt.contains("Talent: Nurturing operator\nBusiness Gift: N/A\nCompound 15 Note: Magnetic persuader"));
        assert!(prompt.contains("(secondary)"));
        assert!(prompt.contains("=== PRIMARY FREQUENCY TENSION ===\n- speed_vs_depth: Fast instincts, slow verification."));
        assert!(prompt.contains("ANIMAL (Ox):"));
        assert!(!prompt.contains("ELEMENT (Wood)"));
        assert!(!prompt.contains("<premium_data>"));
        assert!(!prompt.contains("KARMIC DEBT"));
    }

    #[test]
    fn test_blueprint_prompt_content() {
        let prompt = assembler().assemble_blueprint_prompt("Anthony Baker", "3/15/1985").unwrap();
        assert!(prompt.contains("Use Anthony's name 25+ times total."));
        assert!(prompt.contains("- Personal Year (2026): 1"));
        assert!(prompt.contains("- Personal Month: 6"));
        assert!(prompt.contains("  decisions: life_path > western"));
        assert!(prompt.contains("ARCHETYPE: catalyst_sprint"));
        assert!(prompt.contains("PERSONAL YEAR: 1 - New beginnings"));
        assert!(prompt.contains("  Month 1 (PM2): Partnerships"));
        assert!(prompt.contains("FREQUENCY AMPLIFICATIONS:\nNone detected."));
        assert!(prompt.contains("\"co_founder\": \"LP4\""));
    }

    #[test]
    fn test_missing_tables_render_placeholders() {
        let a = PromptAssembler::default().with_today(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        let prompt = a.assemble_blueprint_prompt("Ann Lee", "12/16/1990").unwrap();
        // 12→3, 16→7, 1990→1: 11 stays a master
        assert!(prompt.contains("=== LIFE PATH 11 ===\n{}"));
        assert!(prompt.contains("- MASTER NUMBERS: Life Path 11"));
        assert!(prompt.contains("Birthday 16: No entry."));
        assert!(prompt.contains("- KARMIC DEBT: 16/7 - "));
        assert!(prompt.contains("No partnership data for this Life Path."));
        assert!(prompt.contains("No matching action plan archetype."));
        assert!(prompt.contains("PERSONAL YEAR:"));
    }

    #[test]
    fn test_action_plan_scoring() {
        let t = tables();
        // LP5 (+3) and "LP5 + Pisces" (+4), Pisces (+1), Ox (+1) beats LP5 alone
        let plan = action_plan(&t.extended, 5, 6, "Pisces", "Ox");
        assert!(plan.starts_with("ARCHETYPE: catalyst_sprint\nApplies to: LP5 + Pisces, Ox"));
        // Nothing scores: first eligible entry wins the tie at zero
        let plan = action_plan(&t.extended, 9, 9, "Leo", "Pig");
        assert!(plan.starts_with("ARCHETYPE: steady_builder"));
    }

    #[test]
    fn test_master_positions() {
        let p = calculate_profile("Ann Lee", "12/22/1990").unwrap();
        assert_eq!(master_positions(&p), vec!["Birthday 22".to_string()]);
    }

    #[test]
    fn test_assemble_selection() {
        let a = assembler();
        let both = a.assemble("Anthony Baker", "3/15/1985", TierSelection::Both).unwrap();
        assert!(both.insight.is_some() && both.blueprint.is_some());
        let one = a.assemble("Anthony Baker", "3/15/1985", Tier::Insight.into()).unwrap();
        assert!(one.insight.is_some() && one.blueprint.is_none());
    }

    #[test]
    fn test_metadata() {
        let meta = assembler().metadata("Anthony Baker", "3/15/1985").unwrap();
        assert_eq!(meta.summary.life_path, 5);
        assert_eq!(meta.personal_year.number, 1);
        assert_eq!(meta.tensions.len(), 4);
        assert_eq!(meta.quarterly_forecast.quarters.len(), 4);
    }

    #[test]
    fn test_target_year() {
        let meta = assembler()
            .with_target_year(Some(2030))
            .metadata("Anthony Baker", "3/15/1985")
            .unwrap();
        assert_eq!(meta.personal_year.year, 2030);
        assert_eq!(meta.personal_year.number, 5);
    }

    #[test]
    fn test_invalid_input_surfaces() {
        assert_eq!(
            assembler().assemble_insight_prompt("Ann", "not a date"),
            Err(FrequencyError::InvalidDateFormat("not a date".to_string()))
        );
        assert_eq!(
            assembler().metadata("Ann", "  "),
            Err(FrequencyError::MissingRequiredField("dob"))
        );
    }
}
