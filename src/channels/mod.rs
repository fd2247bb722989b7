// Frequency Channels - Pure calculators over a parsed date and a name
//
// Five primary channels (life path, birthday, expression, western and
// chinese zodiac) plus two name-derived auxiliaries (soul urge,
// personality). Each depends only on the date parser and the reducer.

pub mod numerology;
pub mod name;
pub mod western;
pub mod chinese;

pub use numerology::{
    calculate_birthday_number, calculate_life_path, BirthdayNumber, LifePath, LifePathComponents,
};
pub use name::{
    calculate_expression_number, calculate_personality_number, calculate_soul_urge,
    letter_value, ExpressionNumber, NamePart, PersonalityNumber, SoulUrge,
};
pub use western::{calculate_western_zodiac, Element, Modality, WesternSign, WesternZodiac};
pub use chinese::{
    calculate_chinese_zodiac, lunar_new_year, ChineseAnimal, ChineseElement, ChineseZodiac,
    Polarity,
};
