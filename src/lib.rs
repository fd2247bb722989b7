// Founder Frequency - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod error;
pub mod reducer;
pub mod parser;
pub mod channels;       // Life path, birthday, name numbers, western + chinese zodiac
pub mod forecast;       // Personal year/month, quarterly energies
pub mod profile;
pub mod patterns;       // Tensions + amplifications
pub mod matrix;         // Lookup tables (opaque JSON)
pub mod assembler;      // Tier prompts
pub mod teaser;
pub mod request;
pub mod config;
pub mod generate;

// Re-export commonly used types
pub use error::{FrequencyError, Result};
pub use reducer::{reduce, is_master, is_karmic_debt, MASTER_NUMBERS, KARMIC_DEBT_NUMBERS};
pub use parser::{parse_date, DateOfBirth};
pub use channels::{
    calculate_life_path, calculate_birthday_number,
    calculate_expression_number, calculate_soul_urge, calculate_personality_number,
    calculate_western_zodiac, calculate_chinese_zodiac,
    LifePath, BirthdayNumber, ExpressionNumber, SoulUrge, PersonalityNumber,
    WesternZodiac, WesternSign, ChineseZodiac, ChineseAnimal, Element, Modality, Polarity,
};
pub use forecast::{
    calculate_personal_year, calculate_personal_month, calculate_quarterly_forecast,
    PersonalYear, PersonalMonth, QuarterForecast, QuarterlyForecast,
};
pub use profile::{
    calculate_profile, calculate_extended_profile, build_profile,
    Profile, ExtendedProfile, Summary,
};
pub use patterns::{detect_tensions, detect_amplifications, Tension, Amplification};
pub use matrix::{Matrix, LookupTables};
pub use assembler::{PromptAssembler, Tier, TierSelection, AssembledPrompts, ProfileMetadata};
pub use teaser::Teaser;
pub use request::{ProfileRequest, load_requests};
pub use config::Config;
pub use generate::{generate_report, GeneratedReport, GenerationError, GenerationRequest, TextGenerator};
#[cfg(feature = "server")]
pub use generate::AnthropicClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
