// 🤖 Report Generation - Prompt in, report text out
//
// The provider sits behind `TextGenerator`; the HTTP client only builds
// with the `server` feature. Tests drive `generate_report` with an
// in-memory generator.

use crate::assembler::{PromptAssembler, ProfileMetadata, Tier};
use crate::config::{TierConfig, TiersConfig};
use crate::error::FrequencyError;
use crate::request::ProfileRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Server configuration error: API key not set")]
    MissingApiKey,

    #[error("Provider unavailable: {0}")]
    Transport(String),

    #[error("Provider rejected request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Malformed provider response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Frequency(#[from] FrequencyError),
}

impl GenerationError {
    /// Worth retrying the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::Transport(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn from_tier(prompt: String, tier: &TierConfig) -> Self {
        GenerationRequest {
            prompt,
            model: tier.model.clone(),
            max_tokens: tier.max_tokens,
            temperature: tier.temperature,
        }
    }
}

/// Anything that turns a prompt into report text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    #[serde(flatten)]
    pub profile: ProfileMetadata,
    pub model: String,
    pub prompt_tokens: usize,
    pub report_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub report_id: Uuid,
    pub report: String,
    pub tier: Tier,
    pub metadata: ReportMetadata,
}

/// Validate, assemble the tier prompt, call the generator
pub async fn generate_report<G>(
    generator: &G,
    assembler: &PromptAssembler,
    tiers: &TiersConfig,
    request: &ProfileRequest,
    tier: Tier,
) -> Result<GeneratedReport, GenerationError>
where
    G: TextGenerator + ?Sized,
{
    let (name, dob) = request.validate()?;
    let prompt = assembler.prompt(name, dob, tier)?;
    let metadata = assembler.metadata(name, dob)?;

    let prompt_tokens = prompt.chars().count() / 4;
    let generation = GenerationRequest::from_tier(prompt, tiers.get(tier));
    let report = generator.generate(&generation).await?;
    let report_length = report.chars().count();

    let report_id = Uuid::new_v4();
    info!(%report_id, %tier, model = %generation.model, prompt_tokens, report_length, "report generated");

    Ok(GeneratedReport {
        report_id,
        report,
        tier,
        metadata: ReportMetadata {
            profile: metadata,
            model: generation.model,
            prompt_tokens,
            report_length,
        },
    })
}

/// Join the `text` blocks of a messages response. No content → empty report.
pub fn extract_text(response: &Value) -> String {
    response
        .get("content")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

// ============================================================================
// HTTP PROVIDER
// ============================================================================

#[cfg(feature = "server")]
pub use client::AnthropicClient;

#[cfg(feature = "server")]
mod client {
    use super::{extract_text, GenerationError, GenerationRequest, TextGenerator};
    use crate::config::GeneratorConfig;
    use async_trait::async_trait;
    use reqwest::Client;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tracing::{debug, error};

    pub struct AnthropicClient {
        client: Client,
        config: GeneratorConfig,
    }

    impl AnthropicClient {
        pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
            if config.api_key.is_none() {
                return Err(GenerationError::MissingApiKey);
            }
            let client = Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .map_err(|e| GenerationError::Transport(e.to_string()))?;
            Ok(Self { client, config })
        }
    }

    #[async_trait]
    impl TextGenerator for AnthropicClient {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            let api_key = self.config.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;
            let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));

            let body = json!({
                "model": request.model,
                "max_tokens": request.max_tokens,
                "temperature": request.temperature,
                "messages": [{ "role": "user", "content": request.prompt }],
            });

            debug!(model = %request.model, max_tokens = request.max_tokens, "calling provider");

            let response = self
                .client
                .post(&url)
                .header("x-api-key", api_key)
                .header("anthropic-version", &self.config.api_version)
                .json(&body)
                .send()
                .await
                .map_err(|e| GenerationError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                error!(status = status.as_u16(), body = %body, "provider error");
                return Err(if status.is_server_error() {
                    GenerationError::Transport(format!("HTTP {}: {}", status, body))
                } else {
                    GenerationError::Rejected {
                        status: status.as_u16(),
                        body,
                    }
                });
            }

            let data: Value = response
                .json()
                .await
                .map_err(|e| GenerationError::Malformed(e.to_string()))?;

            Ok(extract_text(&data))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::LookupTables;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records requests and answers with a canned reply
    struct CannedGenerator {
        reply: Result<String, u16>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl CannedGenerator {
        fn ok(reply: &str) -> Self {
            Self { reply: Ok(reply.to_string()), seen: Mutex::new(Vec::new()) }
        }

        fn failing(status: u16) -> Self {
            Self { reply: Err(status), seen: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) if *status >= 500 => Err(GenerationError::Transport(format!("HTTP {}", status))),
                Err(status) => Err(GenerationError::Rejected { status: *status, body: "no".into() }),
            }
        }
    }

    fn assembler() -> PromptAssembler {
        PromptAssembler::new(LookupTables::empty()).with_today(NaiveDate::from_ymd_opt(2026, 5, 10).unwrap())
    }

    #[tokio::test]
    async fn test_generate_report() {
        let generator = CannedGenerator::ok("## CHAPTER 1: Hello");
        let tiers = TiersConfig::default();
        let request = ProfileRequest::new("Anthony Baker", "3/15/1985");

        let report = generate_report(&generator, &assembler(), &tiers, &request, Tier::Blueprint)
            .await
            .unwrap();

        assert_eq!(report.report, "## CHAPTER 1: Hello");
        assert_eq!(report.tier, Tier::Blueprint);
        assert_eq!(report.metadata.model, "claude-opus-4-5-20250929");
        assert_eq!(report.metadata.report_length, 19);
        assert_eq!(report.metadata.profile.summary.life_path, 5);
        assert_eq!(report.metadata.profile.personal_year.number, 1);

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].max_tokens, 16000);
        assert_eq!(report.metadata.prompt_tokens, seen[0].prompt.chars().count() / 4);
        assert!(seen[0].prompt.contains("<premium_data>"));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_generator() {
        let generator = CannedGenerator::ok("unused");
        let tiers = TiersConfig::default();
        let request = ProfileRequest::new("Ann Lee", "13/45/1990");

        let err = generate_report(&generator, &assembler(), &tiers, &request, Tier::Insight)
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Frequency(FrequencyError::InvalidDateFormat(_))));
        assert!(!err.is_retryable());
        assert!(generator.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failures_classified() {
        let tiers = TiersConfig::default();
        let request = ProfileRequest::new("Ann Lee", "8/1/1990");

        let err = generate_report(&CannedGenerator::failing(503), &assembler(), &tiers, &request, Tier::Insight)
            .await
            .unwrap_err();
        assert!(err.is_retryable());

        let err = generate_report(&CannedGenerator::failing(400), &assembler(), &tiers, &request, Tier::Insight)
            .await
            .unwrap_err();
        assert!(!err.is_retryable());
        assert!(matches!(err, GenerationError::Rejected { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_trait_object_generator() {
        let generator: Box<dyn TextGenerator> = Box::new(CannedGenerator::ok("ok"));
        let request = ProfileRequest::new("Ann Lee", "8/1/1990");
        let report = generate_report(generator.as_ref(), &assembler(), &TiersConfig::default(), &request, Tier::Insight)
            .await
            .unwrap();
        assert_eq!(report.metadata.model, "claude-sonnet-4-5-20250929");
    }

    #[test]
    fn test_extract_text() {
        let data = json!({
            "content": [
                { "type": "text", "text": "Part one" },
                { "type": "tool_use", "id": "x" },
                { "type": "text", "text": "Part two" }
            ]
        });
        assert_eq!(extract_text(&data), "Part one\nPart two");
        assert_eq!(extract_text(&json!({})), "");
    }
}
