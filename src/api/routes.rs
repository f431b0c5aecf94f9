//! HTTP route handlers for Axum.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::{
    api::types::{ErrorBody, HealthResponse, PredictRequest, PredictResponse, TimelineRequest},
    error::Error,
    inference::MoodTimeline,
};

use super::AppState;

pub const TEXT_REQUIRED: &str = "Text field is required.";

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Status plus message, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(ErrorBody { error: self.1 })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(%rejection, "rejected request body");
        ApiError(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!(error = %format!("{err:#}"), "inference failed");
        let status = match err.downcast_ref::<Error>() {
            Some(Error::Scorer(_)) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, err.to_string())
    }
}

pub async fn predict(
    state: State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> ApiResult<PredictResponse> {
    let Json(request) = payload?;
    let Some(text) = request.text else {
        return Err(ApiError(StatusCode::BAD_REQUEST, TEXT_REQUIRED.to_string()));
    };
    let predictions = state.predictor.analyze(&text).await?;
    Ok(Json(PredictResponse { text, predictions }))
}

pub async fn timeline(
    state: State<AppState>,
    payload: Result<Json<TimelineRequest>, JsonRejection>,
) -> ApiResult<MoodTimeline> {
    let Json(request) = payload?;
    Ok(Json(state.predictor.timeline(&request.entries).await?))
}

pub async fn health(state: State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        scorer: state.predictor.scorer_name(),
        labels: state.predictor.labels().len(),
    })
}
