use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::error;

use crate::api::{state::AppState, types::*};
use crate::error::InferdError;
use crate::model::Model;
use crate::serving;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Translate core error kinds to HTTP status classes. Client-class bodies
/// name the offending fields; server-class bodies stay generic.
fn error_response(err: InferdError) -> ApiError {
    match &err {
        InferdError::MissingFeature { .. } | InferdError::InvalidFeatureType { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(err.to_string())),
        ),
        InferdError::ServiceNotReady => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Model not loaded")),
        ),
        _ => {
            error!(error = %err, "prediction request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
        }
    }
}

/// GET /health -- liveness probe, independent of model state
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// GET /ready -- readiness probe, true only while an artifact is loaded
pub async fn ready(State(state): State<AppState>) -> Result<Json<ReadyResponse>, ApiError> {
    if !state.service.is_ready() {
        return Err(error_response(InferdError::ServiceNotReady));
    }
    Ok(Json(ReadyResponse {
        status: "ready".to_string(),
        model_loaded: true,
    }))
}

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let artifact = state
        .service
        .current()
        .await
        .ok_or_else(|| error_response(InferdError::ServiceNotReady))?;

    let prediction = serving::run_inference(&artifact, &state.metrics, &request.features)
        .map_err(error_response)?;

    Ok(Json(prediction.into()))
}

/// GET /model/info
pub async fn model_info(
    State(state): State<AppState>,
) -> Result<Json<ModelInfoResponse>, ApiError> {
    let artifact = state
        .service
        .current()
        .await
        .ok_or_else(|| error_response(InferdError::ServiceNotReady))?;

    Ok(Json(artifact.describe().into()))
}

/// GET /metrics -- Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .metrics
        .prometheus(state.service.is_ready(), state.uptime_seconds().max(0) as u64);

    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; charset=utf-8",
        )],
        body,
    )
}
