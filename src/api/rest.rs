// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.
//
//   GET  /api/v1/health
//   GET  /api/v1/params             current default scoring windows
//   POST /api/v1/params             partial update of the defaults
//   GET  /api/v1/analysis/:symbol   analyse a dataset from the provider
//   POST /api/v1/analyze            analyse a dataset sent in the body
//
// Both analysis routes accept `?short_window=&long_window=` overrides.
//
// CORS is configured permissively for development.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::analysis::{analyze, AnalysisOptions, AnalysisReport};
use crate::app_state::AppState;
use crate::error::{ScoreError, SnapshotError};
use crate::market_data::{MarketDataset, ProviderError};
use crate::signals::ScoringParams;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/params", get(get_params).post(set_params))
        .route("/api/v1/analysis/:symbol", get(analysis_for_symbol))
        .route("/api/v1/analyze", post(analyze_inline))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Errors
// =============================================================================

/// Every failure a handler can surface, mapped onto an HTTP status.
#[derive(Debug)]
pub enum ApiError {
    Score(ScoreError),
    Snapshot(SnapshotError),
    Provider(ProviderError),
    Internal(String),
}

impl From<ScoreError> for ApiError {
    fn from(e: ScoreError) -> Self {
        Self::Score(e)
    }
}

impl From<SnapshotError> for ApiError {
    fn from(e: SnapshotError) -> Self {
        Self::Snapshot(e)
    }
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        Self::Provider(e)
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Score(ScoreError::DataInsufficient { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "data_insufficient")
            }
            Self::Score(ScoreError::EmptySeries) => (StatusCode::UNPROCESSABLE_ENTITY, "empty_series"),
            Self::Score(ScoreError::InvalidParams(_)) => (StatusCode::BAD_REQUEST, "invalid_params"),
            Self::Snapshot(_) => (StatusCode::BAD_REQUEST, "invalid_snapshot"),
            Self::Provider(ProviderError::InvalidSymbol(_)) => {
                (StatusCode::BAD_REQUEST, "invalid_symbol")
            }
            Self::Provider(ProviderError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Provider(_) => (StatusCode::BAD_GATEWAY, "upstream_failure"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Score(e) => e.to_string(),
            Self::Snapshot(e) => e.to_string(),
            Self::Provider(e) => e.to_string(),
            Self::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let body = serde_json::json!({
            "error": self.message(),
            "kind": kind,
        });
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Scoring parameters
// =============================================================================

/// Optional window overrides, used both for the params update body and as
/// per-request query parameters.
#[derive(Debug, Default, Deserialize)]
struct WindowOverride {
    #[serde(default)]
    short_window: Option<usize>,
    #[serde(default)]
    long_window: Option<usize>,
}

impl WindowOverride {
    fn apply(&self, mut params: ScoringParams) -> ScoringParams {
        if let Some(short) = self.short_window {
            params.short_window = short;
        }
        if let Some(long) = self.long_window {
            params.long_window = long;
        }
        params
    }
}

async fn get_params(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let params = state.runtime_config.read().scoring;
    Json(params)
}

async fn set_params(
    State(state): State<Arc<AppState>>,
    Json(update): Json<WindowOverride>,
) -> Result<Json<ScoringParams>, ApiError> {
    let mut config = state.runtime_config.write();
    let candidate = update.apply(config.scoring);
    candidate.validate()?;
    config.scoring = candidate;

    info!(
        short_window = candidate.short_window,
        long_window = candidate.long_window,
        "default scoring windows updated via API"
    );
    Ok(Json(candidate))
}

// =============================================================================
// Analysis
// =============================================================================

fn options_with(state: &AppState, overrides: &WindowOverride) -> AnalysisOptions {
    let mut options = state.analysis_options();
    options.params = overrides.apply(options.params);
    options
}

fn run_analysis(dataset: MarketDataset, options: &AnalysisOptions) -> Result<AnalysisReport, ApiError> {
    let (symbol, snapshot, headlines) = dataset.into_parts()?;
    Ok(analyze(&symbol, &snapshot, &headlines, options)?)
}

fn log_outcome(symbol: &str, result: &Result<AnalysisReport, ApiError>) {
    match result {
        Ok(report) => info!(
            symbol,
            report_id = %report.id,
            technical = report.scores.technical_score,
            smart_money = report.scores.smart_money_score,
            sentiment = report.scores.sentiment_score,
            composite = report.composite_score,
            tier = %report.tier,
            "analysis complete"
        ),
        Err(e) => warn!(symbol, error = %e.message(), "analysis failed"),
    }
}

async fn analysis_for_symbol(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(overrides): Query<WindowOverride>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let options = options_with(&state, &overrides);
    let provider = state.provider.clone();
    let sym = symbol.clone();

    let result = tokio::task::spawn_blocking(move || {
        let dataset = provider.load(&sym)?;
        run_analysis(dataset, &options)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("analysis task failed: {e}")))
    .and_then(|r| r);

    log_outcome(&symbol, &result);
    result.map(Json)
}

async fn analyze_inline(
    State(state): State<Arc<AppState>>,
    Query(overrides): Query<WindowOverride>,
    Json(dataset): Json<MarketDataset>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let options = options_with(&state, &overrides);
    let symbol = dataset.symbol.clone();

    let result = run_analysis(dataset, &options);
    log_outcome(&symbol, &result);
    result.map(Json)
}
