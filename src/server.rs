use crate::config::ServerConfig;
use crate::db::Database;
use crate::error::SmartGrowError;
use crate::logic::DecisionEngine;
use crate::models::{
    AutomationCommand, ControllerSnapshot, Decision, ManualCommand, ModeMap, SensorReading,
    StoredReading,
};
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

const DEFAULT_HISTORY_LIMIT: usize = 100;

pub struct ApiError(SmartGrowError);

impl From<SmartGrowError> for ApiError {
    fn from(err: SmartGrowError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SmartGrowError::UnknownActuator(_) => StatusCode::NOT_FOUND,
            SmartGrowError::AutomationActive(_) => StatusCode::CONFLICT,
            SmartGrowError::InvalidData(_) | SmartGrowError::MissingInput(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DecisionEngine>,
    pub db: Database,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub irrigation_level: f64,
    pub ventilation_level: f64,
    pub lighting_level: f64,
    pub mode: ModeMap,
    pub actuators: ControllerSnapshot,
}

impl From<ControllerSnapshot> for StatusResponse {
    fn from(snapshot: ControllerSnapshot) -> Self {
        Self {
            irrigation_level: snapshot.irrigation.level,
            ventilation_level: snapshot.ventilation.level,
            lighting_level: snapshot.lighting.level,
            mode: snapshot.modes(),
            actuators: snapshot,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadingResponse {
    pub status: String,
    pub decision: Decision,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

pub fn router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/readings", post(post_reading).get(list_readings))
        .route("/status", get(status))
        .route("/automation", post(set_automation))
        .route("/manual", post(manual_command))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = router(state, config.body_limit_bytes);
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "message": "SmartGrow greenhouse controller",
    }))
}

async fn post_reading(
    State(state): State<AppState>,
    Json(reading): Json<SensorReading>,
) -> Result<Json<ReadingResponse>, ApiError> {
    let decision = state.engine.process(&reading)?;

    // State is already committed; a storage failure is reported but not undone.
    if let Err(e) = state.db.insert_reading(&reading) {
        tracing::warn!("Failed to persist reading: {}", e);
        return Err(e.into());
    }

    Ok(Json(ReadingResponse {
        status: "success".into(),
        decision,
    }))
}

async fn list_readings(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<StoredReading>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Ok(Json(state.db.recent_readings(limit)?))
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(state.engine.controller().snapshot().into())
}

async fn set_automation(
    State(state): State<AppState>,
    Json(cmd): Json<AutomationCommand>,
) -> Result<Json<StatusResponse>, ApiError> {
    let snapshot = state.engine.controller().apply_automation_command(&cmd)?;
    Ok(Json(snapshot.into()))
}

async fn manual_command(
    State(state): State<AppState>,
    Json(cmd): Json<ManualCommand>,
) -> Result<Json<StatusResponse>, ApiError> {
    let snapshot = state.engine.controller().apply_manual_command(&cmd)?;
    Ok(Json(snapshot.into()))
}
