use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use skimlit_core::api::{
    DemoResponse, HealthResponse, MetricsResponse, PredictRequest, PredictResponse,
};
use skimlit_core::{DEMO_ABSTRACT, ServiceError};

use crate::AppState;
use crate::error::ApiError;

pub const METRICS_IMAGE_PATH: &str = "/api/metrics/image";

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(health))
        .route("/api/demo", get(demo))
        .route("/api/predict", post(predict))
        .route("/api/metrics", get(metrics))
        .route(METRICS_IMAGE_PATH, get(metrics_image))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.page.to_string())
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        model: state.service.is_available(),
        metrics: state.metrics.is_available(),
    })
}

async fn demo() -> Json<DemoResponse> {
    Json(DemoResponse {
        text: DEMO_ABSTRACT.to_string(),
    })
}

async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ServiceError::InvalidInput(e.body_text()))?;

    // The model call blocks; keep it off the async workers.
    let service = state.service.clone();
    let classified = tokio::task::spawn_blocking(move || service.classify(&req.text, req.mode))
        .await
        .map_err(|e| ServiceError::Inference(format!("inference task failed: {e}")))??;

    Ok(Json(classified.into()))
}

async fn metrics(State(state): State<AppState>) -> Result<Json<MetricsResponse>, ApiError> {
    let report = state.metrics.get_metrics()?;
    let response = report
        .to_response(METRICS_IMAGE_PATH)
        .map_err(|e| ServiceError::from(&e))?;
    Ok(Json(response))
}

async fn metrics_image(State(state): State<AppState>) -> Result<Response, ApiError> {
    let report = state.metrics.get_metrics()?;
    Ok((
        [(header::CONTENT_TYPE, report.image_mime)],
        report.image.clone(),
    )
        .into_response())
}
