// 📥 Requests - Boundary input validation, cache keys, batch loading

use crate::error::{FrequencyError, Result};
use crate::parser::parse_date;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Name + date as they arrive from a form, a CSV row or the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
}

impl ProfileRequest {
    pub fn new(name: impl Into<String>, dob: impl Into<String>) -> Self {
        ProfileRequest {
            name: Some(name.into()),
            dob: Some(dob.into()),
        }
    }

    /// Trimmed `(name, dob)`, or the first missing field
    pub fn validate(&self) -> Result<(&str, &str)> {
        let name = required(self.name.as_deref(), "name")?;
        let dob = required(self.dob.as_deref(), "dob")?;
        Ok((name, dob))
    }

    /// SHA-256 over the normalized name, the parsed date and the target year.
    /// Accepted date shapes for the same day share a key.
    pub fn cache_key(&self, target_year: Option<i32>) -> Result<String> {
        let (name, dob) = self.validate()?;
        let parsed = parse_date(dob)?;
        let normalized = name
            .split_whitespace()
            .map(str::to_uppercase)
            .collect::<Vec<_>>()
            .join(" ");
        let year = target_year.map(|y| y.to_string()).unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(format!("{}|{}|{}", normalized, parsed.iso(), year));
        Ok(format!("{:x}", hasher.finalize()))
    }
}

/// Trimmed value, or `MissingRequiredField` when absent or blank
pub(crate) fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(FrequencyError::MissingRequiredField(field))
}

/// Read `name,dob` rows for a batch run
pub fn load_requests(csv_path: &Path) -> anyhow::Result<Vec<ProfileRequest>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .context("Failed to open CSV file")?;

    let mut requests = Vec::new();
    for result in rdr.deserialize() {
        let request: ProfileRequest = result.context("Failed to deserialize request row")?;
        requests.push(request);
    }

    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate_trims() {
        let req = ProfileRequest::new("  Ann Lee ", " 3/15/1985 ");
        assert_eq!(req.validate(), Ok(("Ann Lee", "3/15/1985")));
    }

    #[test]
    fn test_validate_missing_fields() {
        let req = ProfileRequest { name: None, dob: Some("3/15/1985".into()) };
        assert_eq!(req.validate(), Err(FrequencyError::MissingRequiredField("name")));
        let req = ProfileRequest::new("Ann", "   ");
        assert_eq!(req.validate(), Err(FrequencyError::MissingRequiredField("dob")));
    }

    #[test]
    fn test_required_shared_by_request_and_profile() {
        assert_eq!(required(Some(" Ann "), "name"), Ok("Ann"));
        assert_eq!(required(None, "name"), Err(FrequencyError::MissingRequiredField("name")));
        assert_eq!(
            crate::profile::calculate_profile("Ann", " \t"),
            Err(FrequencyError::MissingRequiredField("dob"))
        );
    }

    #[test]
    fn test_cache_key_normalizes() {
        let a = ProfileRequest::new("ann   lee", "03/15/1985").cache_key(Some(2026)).unwrap();
        let b = ProfileRequest::new("ANN LEE", "1985-03-15").cache_key(Some(2026)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let other_year = ProfileRequest::new("Ann Lee", "3/15/1985").cache_key(Some(2027)).unwrap();
        assert_ne!(a, other_year);
        let no_year = ProfileRequest::new("Ann Lee", "3/15/1985").cache_key(None).unwrap();
        assert_ne!(a, no_year);
    }

    #[test]
    fn test_cache_key_rejects_bad_date() {
        let err = ProfileRequest::new("Ann", "02/30/1990").cache_key(None);
        assert_eq!(err, Err(FrequencyError::InvalidDateFormat("02/30/1990".to_string())));
    }

    #[test]
    fn test_load_requests() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,dob").unwrap();
        writeln!(file, "Anthony Baker, 3/15/1985").unwrap();
        writeln!(file, "Ann Lee,").unwrap();

        let rows = load_requests(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ProfileRequest::new("Anthony Baker", "3/15/1985"));
        assert_eq!(rows[1].validate(), Err(FrequencyError::MissingRequiredField("dob")));
    }
}
