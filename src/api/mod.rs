use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    BikecastError, ErrorCode, analytics, export,
    history::{HistoryEntry, LedgerSummary, SortOrder},
    models::{DemandLevel, ForecastInsights, ForecastRequest, ForecastResult, UsageCategory},
    session::{CompletedForecast, SessionRegistry},
    validation,
};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    #[must_use]
    pub fn new(sessions: SessionRegistry) -> Self {
        Self {
            sessions: Arc::new(sessions),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: ErrorCode,
    pub message: String,
}

impl IntoResponse for BikecastError {
    fn into_response(self) -> Response {
        let status = match &self {
            BikecastError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BikecastError::EngineFailure { .. } => StatusCode::BAD_GATEWAY,
            BikecastError::ExportRefused | BikecastError::Busy => StatusCode::CONFLICT,
            BikecastError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
            BikecastError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!("Request failed: {}", self);
        }
        let body = ApiError {
            error: self.code(),
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Unreadable or mistyped request bodies are input errors like any other
impl From<JsonRejection> for BikecastError {
    fn from(rejection: JsonRejection) -> Self {
        BikecastError::validation(rejection.body_text())
    }
}

#[derive(Serialize, Deserialize)]
pub struct ApiSession {
    pub id: Uuid,
}

#[derive(Serialize, Deserialize)]
pub struct ApiForecast {
    pub result: ForecastResult,
    pub level: DemandLevel,
    pub category: UsageCategory,
    pub insights: ForecastInsights,
    pub entry: HistoryEntry,
}

#[derive(Serialize, Deserialize)]
pub struct ApiCurrentForecast {
    pub request: ForecastRequest,
    pub result: ForecastResult,
    pub level: DemandLevel,
    pub category: UsageCategory,
    pub insights: ForecastInsights,
}

impl From<CompletedForecast> for ApiCurrentForecast {
    fn from(current: CompletedForecast) -> Self {
        let prediction = current.result.prediction;
        Self {
            level: DemandLevel::classify(prediction),
            category: UsageCategory::classify(prediction),
            insights: ForecastInsights::derive(prediction, current.request.temperature),
            request: current.request,
            result: current.result,
        }
    }
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Serialize, Deserialize)]
pub struct ApiHealth {
    pub status: String,
    pub version: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/dashboard", get(dashboard))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", delete(delete_session))
        .route("/sessions/{id}/forecasts", post(submit_forecast))
        .route("/sessions/{id}/forecasts/current", get(current_forecast))
        .route(
            "/sessions/{id}/history",
            get(get_history).delete(clear_history),
        )
        .route("/sessions/{id}/summary", get(get_summary))
        .route("/sessions/{id}/export", get(export_history))
        .with_state(state)
}

async fn health() -> Json<ApiHealth> {
    Json(ApiHealth {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// Stateless engine call: the request/response contract a frontend or
/// another instance's remote provider talks to.
async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ForecastResult>, BikecastError> {
    let Json(request) = payload?;
    validation::validate(&request)?;
    let result = state.sessions.provider().forecast(&request).await?;
    Ok(Json(result))
}

async fn dashboard() -> Json<analytics::DashboardAnalytics> {
    Json(analytics::dashboard())
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<ApiSession>) {
    let session = state.sessions.create();
    (StatusCode::CREATED, Json(ApiSession { id: session.id() }))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, BikecastError> {
    state.sessions.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn submit_forecast(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ApiForecast>, BikecastError> {
    let session = state.sessions.get(&id)?;
    let Json(request) = payload?;
    let temperature = request.temperature;
    let submission = session.submit(request).await?;
    let prediction = submission.result.prediction;

    Ok(Json(ApiForecast {
        result: submission.result,
        level: DemandLevel::classify(prediction),
        category: UsageCategory::classify(prediction),
        insights: ForecastInsights::derive(prediction, temperature),
        entry: submission.entry,
    }))
}

async fn current_forecast(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, BikecastError> {
    let session = state.sessions.get(&id)?;
    Ok(match session.current() {
        Some(current) => Json(ApiCurrentForecast::from(current)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, BikecastError> {
    let session = state.sessions.get(&id)?;
    Ok(Json(session.history(query.order)))
}

async fn clear_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, BikecastError> {
    state.sessions.get(&id)?.clear_history();
    Ok(StatusCode::NO_CONTENT)
}

async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LedgerSummary>, BikecastError> {
    Ok(Json(state.sessions.get(&id)?.summary()))
}

async fn export_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, BikecastError> {
    let session = state.sessions.get(&id)?;
    let csv = session.export_csv()?;
    let filename = export::export_filename(Utc::now().date_naive());
    info!(session = %session.id(), %filename, "History exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
