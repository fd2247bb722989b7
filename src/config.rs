use crate::assembler::Tier;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the calculator and server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Text generation provider
    pub generator: GeneratorConfig,

    /// Model settings per product tier
    pub tiers: TiersConfig,

    /// Channel descriptions and combination rules (JSON)
    pub matrix_path: Option<PathBuf>,

    /// Partnership, action plan and forecast text (JSON)
    pub matrix_extended_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub api_version: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiersConfig {
    pub insight: TierConfig,
    pub blueprint: TierConfig,
}

impl TiersConfig {
    pub fn get(&self, tier: Tier) -> &TierConfig {
        match tier {
            Tier::Insight => &self.insight,
            Tier::Blueprint => &self.blueprint,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            timeout_secs: 300,
        }
    }
}

impl Default for TiersConfig {
    fn default() -> Self {
        Self {
            insight: TierConfig {
                model: "claude-sonnet-4-5-20250929".to_string(),
                max_tokens: 8000,
                temperature: 0.7,
            },
            blueprint: TierConfig {
                model: "claude-opus-4-5-20250929".to_string(),
                max_tokens: 16000,
                temperature: 0.7,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            generator: GeneratorConfig::default(),
            tiers: TiersConfig::default(),
            matrix_path: None,
            matrix_extended_path: None,
        }
    }
}

impl Config {
    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load config from a JSON file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let mut config: Config = serde_json::from_str(&content).context("Failed to parse config JSON")?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("FREQUENCY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("FREQUENCY_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("FREQUENCY_PORT is not a port: {:?}", port))?;
        }
        if let Some(key) = lookup("ANTHROPIC_API_KEY").filter(|k| !k.is_empty()) {
            self.generator.api_key = Some(key);
        }
        if let Some(path) = lookup("FREQUENCY_MATRIX") {
            self.matrix_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("FREQUENCY_MATRIX_EXTENDED") {
            self.matrix_extended_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Get the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
        assert_eq!(config.tiers.get(Tier::Insight).max_tokens, 8000);
        assert_eq!(config.tiers.get(Tier::Blueprint).model, "claude-opus-4-5-20250929");
        assert!(config.generator.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("FREQUENCY_HOST", "0.0.0.0"),
            ("FREQUENCY_PORT", "8080"),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("FREQUENCY_MATRIX", "/data/matrix.json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.generator.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.matrix_path, Some(PathBuf::from("/data/matrix.json")));
        assert_eq!(config.matrix_extended_path, None);
    }

    #[test]
    fn test_bad_port_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_overrides(|k| (k == "FREQUENCY_PORT").then(|| "lots".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_single_field_sections_fill_from_defaults() {
        let config: Config = serde_json::from_str(r#"{"server": {"port": 8080}}"#).unwrap();
        assert_eq!(config.server_addr(), "127.0.0.1:8080");

        let config: Config = serde_json::from_str(r#"{"generator": {"timeout_secs": 60}}"#).unwrap();
        assert_eq!(config.generator.timeout_secs, 60);
        assert_eq!(config.generator.base_url, "https://api.anthropic.com");
        assert_eq!(config.generator.api_version, "2023-06-01");

        let config: Config = serde_json::from_str(
            r#"{"tiers": {"blueprint": {"model": "m", "max_tokens": 100, "temperature": 0.2}}}"#,
        )
        .unwrap();
        assert_eq!(config.tiers.blueprint.max_tokens, 100);
        assert_eq!(config.tiers.insight.model, "claude-sonnet-4-5-20250929");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"server": {"host": "localhost", "port": 9000}}"#).unwrap();
        assert_eq!(config.server_addr(), "localhost:9000");
        assert_eq!(config.generator.timeout_secs, 300);
        assert_eq!(config.tiers.insight.temperature, 0.7);
    }
}
