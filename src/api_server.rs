// Axum API Server Module
//
// Purpose: JSON API over the advisory engines plus the groundwater and price
// datasets loaded at start-up.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::advice::{build_advisory, render_markdown};
use crate::config::{AdvisorConfig, AdvisorContext};
use crate::data::{load_groundwater_history, load_groundwater_snapshot, load_price_book};
use crate::error::AdvisorError;
use crate::groundwater::{
    forecast_history, forecast_state, project_groundwater, GroundwaterHistory, GroundwaterSnapshot,
    Metric, ScenarioMode, ScenarioParams, DEFAULT_BASE_YEAR,
};
use crate::groundwater::snapshot::AGGREGATE_LABEL;
use crate::input::{EnvironmentalInput, FieldObservation};
use crate::irrigation::assess_irrigation;
use crate::market::{price_outlook, PriceBook, PricePoint};
use crate::suitability::{rank_crops_top, score_crop};
use crate::yield_forecast::{forecast_yield, YieldInputs};

const TOP_STATES: usize = 10;
const MAX_RECOMMENDATIONS: usize = 12;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub context: Arc<AdvisorContext>,
    pub groundwater: Arc<GroundwaterSnapshot>,
    pub history: Arc<GroundwaterHistory>,
    pub prices: Arc<PriceBook>,
    pub cache: Cache<String, serde_json::Value>,
    pub config: Arc<AdvisorConfig>,
}

impl AppState {
    /// Load datasets from `config.data_dir`. A missing file leaves that
    /// dataset empty; a malformed one is an error.
    pub async fn new(config: AdvisorConfig) -> anyhow::Result<Self> {
        let groundwater_path = config.groundwater_path();
        let prices_path = config.prices_path();
        let history_path = config.history_path();

        let (groundwater, history, prices) = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
            let groundwater = if groundwater_path.exists() {
                load_groundwater_snapshot(&groundwater_path)?
            } else {
                tracing::warn!("Groundwater snapshot not found at {}", groundwater_path.display());
                GroundwaterSnapshot::default()
            };
            let history = if history_path.exists() {
                load_groundwater_history(&history_path)?
            } else {
                tracing::warn!("Groundwater history not found at {}", history_path.display());
                GroundwaterHistory::default()
            };
            let prices = if prices_path.exists() {
                load_price_book(&prices_path)?
            } else {
                tracing::warn!("Price book not found at {}", prices_path.display());
                PriceBook::default()
            };
            Ok((groundwater, history, prices))
        })
        .await??;

        let context = AdvisorContext::new(Default::default(), config.defaults.clone());
        Ok(Self::from_parts(config, context, groundwater, prices).with_history(history))
    }

    pub fn from_parts(
        config: AdvisorConfig,
        context: AdvisorContext,
        groundwater: GroundwaterSnapshot,
        prices: PriceBook,
    ) -> Self {
        tracing::info!(
            "Initializing Moka cache ({} entries, {}s TTL)",
            config.cache_capacity,
            config.cache_ttl_secs
        );
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();

        Self {
            context: Arc::new(context),
            groundwater: Arc::new(groundwater),
            history: Arc::new(GroundwaterHistory::default()),
            prices: Arc::new(prices),
            cache,
            config: Arc::new(config),
        }
    }

    /// Attach multi-year groundwater history
    pub fn with_history(mut self, history: GroundwaterHistory) -> Self {
        self.history = Arc::new(history);
        self
    }

    fn validate(&self, observation: &FieldObservation) -> Result<EnvironmentalInput, AppError> {
        Ok(EnvironmentalInput::from_observation(observation, &self.context.defaults)?)
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Crop suitability
        .route("/api/crops", get(list_crops))
        .route("/api/crops/recommend", post(recommend_crops))
        .route("/api/crops/score", post(score_named_crop))
        // Field engines
        .route("/api/irrigation", post(irrigation))
        .route("/api/yield", post(yield_forecast))
        .route("/api/advisory", post(advisory))
        // Groundwater
        .route("/api/groundwater/states", get(groundwater_states))
        .route("/api/groundwater/top10", get(groundwater_top10))
        .route("/api/groundwater/projection", get(groundwater_projection))
        .route("/api/groundwater/forecast", get(groundwater_forecast))
        .route("/api/groundwater/trend", get(groundwater_trend))
        // Prices
        .route("/api/prices/forecast", post(forecast_prices))
        .route("/api/prices/:commodity", get(commodity_prices))
        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct RecommendRequest {
    #[serde(flatten)]
    observation: FieldObservation,
    top: Option<usize>,
}

/// Observation plus the date the advice is for (defaults to today)
#[derive(Debug, Deserialize)]
struct DatedRequest {
    #[serde(flatten)]
    observation: FieldObservation,
    today: Option<NaiveDate>,
}

impl DatedRequest {
    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[derive(Debug, Deserialize)]
struct MetricQuery {
    metric: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectionQuery {
    state: Option<String>,
    base_year: Option<String>,
}

/// All values arrive as text; unparsable numbers fall back to defaults
#[derive(Debug, Deserialize)]
struct ForecastQuery {
    state: Option<String>,
    metric: Option<String>,
    periods: Option<String>,
    base_year: Option<String>,
    mode: Option<String>,
    rate: Option<String>,
    delta: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrendQuery {
    state: Option<String>,
    periods: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceForecastRequest {
    history: Vec<PricePoint>,
}

fn parse_or<T: std::str::FromStr>(raw: Option<&String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "crops": state.context.catalog.len(),
        "groundwater_states": state.groundwater.len(),
        "history_states": state.history.states().len(),
        "commodities": state.prices.len(),
    }))
}

async fn list_crops(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = "crops".to_string();
    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    let result = serde_json::json!({
        "count": state.context.catalog.len(),
        "crops": state.context.catalog.templates(),
    });
    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

async fn recommend_crops(
    State(state): State<AppState>,
    Json(payload): Json<RecommendRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let input = state.validate(&payload.observation)?;
    let top = payload.top.unwrap_or(3).clamp(1, MAX_RECOMMENDATIONS);
    let context = state.context.clone();

    tracing::info!("Ranking crops for {} (top {})", input.location, top);

    // CPU-bound work: run in blocking thread pool
    let (input, results) = tokio::task::spawn_blocking(move || {
        let results = rank_crops_top(context.catalog.templates(), &input, top);
        (input, results)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    Ok(Json(serde_json::json!({
        "location": input.location,
        "results": results,
    })))
}

async fn score_named_crop(
    State(state): State<AppState>,
    Json(observation): Json<FieldObservation>,
) -> Result<Json<serde_json::Value>, AppError> {
    let crop = observation
        .crop
        .as_deref()
        .ok_or(AdvisorError::MissingField { field: "crop" })?;
    let template = state.context.catalog.find(crop)?;
    let input = state.validate(&observation)?;

    Ok(Json(serde_json::to_value(score_crop(template, &input))?))
}

async fn irrigation(
    State(state): State<AppState>,
    Json(payload): Json<DatedRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let input = state.validate(&payload.observation)?;
    let recommendation = assess_irrigation(&input, payload.today());
    Ok(Json(serde_json::to_value(recommendation)?))
}

async fn yield_forecast(
    State(state): State<AppState>,
    Json(payload): Json<DatedRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let crop = payload
        .observation
        .crop
        .clone()
        .ok_or(AdvisorError::MissingField { field: "crop" })?;
    let input = state.validate(&payload.observation)?;

    let irrigation = assess_irrigation(&input, payload.today());
    let weather = input.weather();
    let inputs = YieldInputs::from_input(&crop, &input, &irrigation, &weather);
    let forecast = forecast_yield(&state.context.catalog, &inputs);

    Ok(Json(serde_json::json!({
        "irrigation": irrigation,
        "yield": forecast,
    })))
}

async fn advisory(
    State(state): State<AppState>,
    Json(payload): Json<DatedRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let input = state.validate(&payload.observation)?;
    let today = payload.today();
    let context = state.context.clone();

    let advisory = tokio::task::spawn_blocking(move || build_advisory(&context, &input, today))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    Ok(Json(serde_json::json!({
        "markdown": render_markdown(&advisory),
        "advisory": advisory,
    })))
}

async fn groundwater_states(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = "groundwater:states".to_string();
    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for groundwater summary");
        return Ok(Json(cached));
    }

    let result = serde_json::to_value(state.groundwater.summary())?;
    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

async fn groundwater_top10(
    State(state): State<AppState>,
    Query(params): Query<MetricQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let metric = Metric::parse(params.metric.as_deref().unwrap_or("availability"))?;
    let items = state.groundwater.top_n(metric, TOP_STATES);
    Ok(Json(serde_json::json!({
        "metric": metric,
        "items": items,
    })))
}

async fn groundwater_projection(
    State(state): State<AppState>,
    Query(params): Query<ProjectionQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let query = params.state.as_deref().unwrap_or(AGGREGATE_LABEL);
    let base_year = parse_or(params.base_year.as_ref(), DEFAULT_BASE_YEAR);

    let cache_key = format!("groundwater:projection:{}:{}", query.trim().to_lowercase(), base_year);
    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    let record = state.groundwater.resolve(query)?;
    let projection = project_groundwater(&record, base_year)?;
    let result = serde_json::to_value(projection)?;
    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

async fn groundwater_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let metric = params
        .metric
        .as_deref()
        .ok_or_else(|| {
            AppError::BadRequest(
                "metric query param required (availability|extraction|stage)".to_string(),
            )
        })
        .and_then(|m| Ok(Metric::parse(m)?))?;

    let defaults = ScenarioParams::default();
    let scenario = ScenarioParams {
        periods: parse_or(params.periods.as_ref(), defaults.periods),
        base_year: parse_or(params.base_year.as_ref(), defaults.base_year),
        mode: params
            .mode
            .as_deref()
            .map(ScenarioMode::parse)
            .unwrap_or_default(),
        rate: parse_or(params.rate.as_ref(), defaults.rate),
        delta: parse_or(params.delta.as_ref(), defaults.delta),
    };
    let query = params.state.as_deref().unwrap_or(AGGREGATE_LABEL);

    let forecast = forecast_state(&state.groundwater, query, metric, &scenario)?;
    Ok(Json(serde_json::to_value(forecast)?))
}

async fn groundwater_trend(
    State(state): State<AppState>,
    Query(params): Query<TrendQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let query = params.state.as_deref().unwrap_or(AGGREGATE_LABEL);
    let periods = params.periods.as_ref().and_then(|p| p.trim().parse::<u32>().ok());

    let forecast = forecast_history(&state.history, query, periods)?;
    Ok(Json(serde_json::to_value(forecast)?))
}

async fn forecast_prices(Json(payload): Json<PriceForecastRequest>) -> Result<Json<serde_json::Value>, AppError> {
    match price_outlook(&payload.history) {
        Some(outlook) => Ok(Json(serde_json::to_value(outlook)?)),
        None => Ok(Json(serde_json::json!({ "predictions": [] }))),
    }
}

async fn commodity_prices(
    State(state): State<AppState>,
    Path(commodity): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let history = state
        .prices
        .history(&commodity)
        .ok_or_else(|| AppError::NotFound(format!("No price history for '{}'", commodity)))?;

    Ok(Json(serde_json::json!({
        "commodity": commodity,
        "history": history,
        "outlook": price_outlook(history),
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<AdvisorError> for AppError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::UnknownCrop(_) | AdvisorError::UnknownState(_) => {
                AppError::NotFound(err.to_string())
            }
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON serialization error: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
