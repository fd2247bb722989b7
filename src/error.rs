// ⚠️ Error Types - Client-input failures raised before any calculation
// Everything downstream of a parsed date is a total function.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrequencyError {
    /// Input matched neither accepted date shape, or named a day that
    /// does not exist on the calendar
    #[error("Cannot parse date: {0}. Use MM/DD/YYYY format.")]
    InvalidDateFormat(String),

    /// Name or date absent/blank at the boundary
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),
}

pub type Result<T> = std::result::Result<T, FrequencyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_carries_raw_input() {
        let err = FrequencyError::InvalidDateFormat("15.03.1985".to_string());
        assert_eq!(
            err.to_string(),
            "Cannot parse date: 15.03.1985. Use MM/DD/YYYY format."
        );
    }

    #[test]
    fn test_missing_field_names_field() {
        let err = FrequencyError::MissingRequiredField("dob");
        assert_eq!(err.to_string(), "Missing required field: dob");
    }
}
