// 📚 Lookup Tables - Read-only descriptive text keyed by channel/value
//
// Content is opaque JSON. Every accessor has an explicit fallback: a
// missing key yields `{}`, an empty string, or the caller's default.
// Nothing here panics or errors on absent data.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    root: Value,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::empty()
    }
}

impl Matrix {
    pub fn empty() -> Self {
        Matrix {
            root: Value::Object(Map::new()),
        }
    }

    pub fn from_value(root: Value) -> Self {
        Matrix { root }
    }

    /// Load a JSON table from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read matrix file: {:?}", path.as_ref()))?;

        let root: Value = serde_json::from_str(&content).context("Failed to parse matrix JSON")?;

        debug!(path = ?path.as_ref(), "matrix loaded");
        Ok(Matrix::from_value(root))
    }

    /// Load from `path` when given; fall back to an empty table on any
    /// failure so prompts still render with placeholders
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        match path {
            None => Matrix::empty(),
            Some(p) => Matrix::from_file(p).unwrap_or_else(|e| {
                warn!(error = %e, "matrix unavailable, using empty table");
                Matrix::empty()
            }),
        }
    }

    /// Walk `path` through nested objects
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.root, |node, key| node.get(*key))
    }

    /// Object at `path`, or `{}` when absent or not an object
    pub fn entry(&self, path: &[&str]) -> Map<String, Value> {
        self.get(path)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    /// String at `path`, or `default`
    pub fn text(&self, path: &[&str], default: &str) -> String {
        self.get(path)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    /// Pretty JSON of the value at `path`, `{}` when absent
    pub fn pretty(&self, path: &[&str]) -> String {
        let value = self.get(path).cloned().unwrap_or_else(|| Value::Object(Map::new()));
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Both tables consumed by the prompt assembler
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    /// Per-channel descriptions and combination rules
    pub matrix: Matrix,
    /// Partnership, action-plan and personal year/month business text
    pub extended: Matrix,
}

impl LookupTables {
    pub fn new(matrix: Matrix, extended: Matrix) -> Self {
        LookupTables { matrix, extended }
    }

    pub fn empty() -> Self {
        LookupTables::new(Matrix::empty(), Matrix::empty())
    }

    pub fn load(matrix_path: Option<&Path>, extended_path: Option<&Path>) -> Self {
        LookupTables::new(
            Matrix::load_or_empty(matrix_path),
            Matrix::load_or_empty(extended_path),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn sample() -> Matrix {
        Matrix::from_value(json!({
            "life_path": {
                "7": { "archetype": "The Analyst", "strength": "depth" }
            },
            "karmic_debt_business_impact": { "16/7": "Rebuild after collapse." }
        }))
    }

    #[test]
    fn test_nested_lookup() {
        let m = sample();
        assert_eq!(m.text(&["life_path", "7", "archetype"], "LP 7"), "The Analyst");
        assert_eq!(m.text(&["karmic_debt_business_impact", "16/7"], ""), "Rebuild after collapse.");
    }

    #[test]
    fn test_missing_keys_fall_back() {
        let m = sample();
        assert_eq!(m.text(&["life_path", "3", "archetype"], "LP 3"), "LP 3");
        assert!(m.entry(&["life_path", "3"]).is_empty());
        assert_eq!(m.pretty(&["western_zodiac", "Leo"]), "{}");
        assert!(m.get(&["nope"]).is_none());
    }

    #[test]
    fn test_non_object_entry_is_empty() {
        let m = sample();
        assert!(m.entry(&["karmic_debt_business_impact", "16/7"]).is_empty());
    }

    #[test]
    fn test_empty_table() {
        let m = Matrix::empty();
        assert_eq!(m.text(&["a", "b"], "x"), "x");
        assert_eq!(m.pretty(&[]), "{}");
    }

    #[test]
    fn test_from_file_and_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"life_path": {{"1": {{"archetype": "The Pioneer"}}}}}}"#).unwrap();

        let m = Matrix::from_file(file.path()).unwrap();
        assert_eq!(m.text(&["life_path", "1", "archetype"], ""), "The Pioneer");

        let missing = Matrix::load_or_empty(Some(Path::new("/definitely/not/here.json")));
        assert_eq!(missing, Matrix::empty());
        assert!(Matrix::from_file("/definitely/not/here.json").is_err());
    }
}
