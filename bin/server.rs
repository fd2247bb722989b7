// Founder Frequency - Web Server
// Free calculator + paid report generation over REST

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use founder_frequency::{
    calculate_profile, generate_report, parse_date, AnthropicClient, Config, FrequencyError,
    GeneratedReport, GenerationError, LookupTables, ProfileRequest, PromptAssembler, Teaser,
    TextGenerator, Tier,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Shared application state
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    assembler: Arc<PromptAssembler>,
    /// None when no API key is configured
    generator: Option<Arc<dyn TextGenerator>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Status + message, rendered as a failed ApiResponse
struct ApiError(StatusCode, String);

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        ApiError(StatusCode::BAD_REQUEST, message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(ApiResponse::<()>::err(self.1))).into_response()
    }
}

impl From<FrequencyError> for ApiError {
    fn from(e: FrequencyError) -> Self {
        ApiError::bad_request(e.to_string())
    }
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::Frequency(inner) => inner.into(),
            GenerationError::MissingApiKey => ApiError(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error: API key not set.".to_string(),
            ),
            other => {
                error!(error = %other, retryable = other.is_retryable(), "generation failed");
                ApiError(
                    StatusCode::BAD_GATEWAY,
                    "Report generation failed. Please try again.".to_string(),
                )
            }
        }
    }
}

#[derive(Deserialize)]
struct GenerateRequest {
    #[serde(flatten)]
    profile: ProfileRequest,
    #[serde(default)]
    tier: Option<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/calculate - Free calculator: summary + teaser
async fn calculate(Json(request): Json<ProfileRequest>) -> Result<Json<ApiResponse<Teaser>>, ApiError> {
    let (name, dob) = request.validate()?;
    let profile = calculate_profile(name, dob)?;
    Ok(Json(ApiResponse::ok(Teaser::build(name, &profile))))
}

/// POST /api/generate - Paid report for a tier
async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<ApiResponse<GeneratedReport>>, ApiError> {
    let missing = || ApiError::bad_request("Name, date of birth, and tier are required.");

    let (_, dob) = request.profile.validate().map_err(|_| missing())?;
    let tier: Tier = request
        .tier
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(missing)?
        .parse::<Tier>()
        .map_err(|e: String| ApiError::bad_request(e))?;

    // Reject bad dates before touching the provider
    parse_date(dob)?;

    let generator = state
        .generator
        .as_ref()
        .ok_or(GenerationError::MissingApiKey)?;

    let report = generate_report(
        generator.as_ref(),
        &state.assembler,
        &state.config.tiers,
        &request.profile,
        tier,
    )
    .await?;

    Ok(Json(ApiResponse::ok(report)))
}

// ============================================================================
// Main Server
// ============================================================================

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/calculate", post(calculate))
        .route("/generate", post(generate))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::var("FREQUENCY_CONFIG") {
        Ok(path) => Config::from_file(std::path::Path::new(&path))?,
        Err(_) => Config::from_env()?,
    };

    let tables = LookupTables::load(
        config.matrix_path.as_deref(),
        config.matrix_extended_path.as_deref(),
    );

    let generator: Option<Arc<dyn TextGenerator>> = match AnthropicClient::new(config.generator.clone()) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "report generation disabled");
            None
        }
    };

    let addr = config.server_addr();
    let state = AppState {
        config: Arc::new(config),
        assembler: Arc::new(PromptAssembler::new(tables)),
        generator,
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "🚀 Founder Frequency server listening");

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
