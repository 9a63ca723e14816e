//! Drain pass control handlers.

use super::DrainStatus;
use crate::api::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// POST /drain - Start a drain pass
///
/// Pre-flight errors (already running, no destination, empty queue) are
/// reported synchronously as 409; otherwise the pass runs on a background
/// task and progress is observable on the event stream.
#[utoipa::path(
    post,
    path = "/drain",
    tag = "drain",
    responses(
        (status = 202, description = "Drain pass started"),
        (status = 409, description = "Already running, no destination set, or queue empty")
    )
)]
pub async fn start_drain(State(state): State<AppState>) -> Response {
    match state.relay.spawn_drain().await {
        Ok(handle) => {
            // The pass reports through events and its own logging; the task
            // keeps running after the handle is dropped.
            drop(handle);
            (
                StatusCode::ACCEPTED,
                Json(json!({"status": "drain started"})),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Drain start rejected");
            e.into_response()
        }
    }
}

/// POST /drain/cancel - Request cancellation of the running drain pass
#[utoipa::path(
    post,
    path = "/drain/cancel",
    tag = "drain",
    responses(
        (status = 204, description = "Cancellation requested, the in-flight item completes first"),
        (status = 409, description = "No drain pass is running")
    )
)]
pub async fn cancel_drain(State(state): State<AppState>) -> Response {
    match state.relay.cancel_drain().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /drain - Get drain status
#[utoipa::path(
    get,
    path = "/drain",
    tag = "drain",
    responses(
        (status = 200, description = "Whether a drain pass is currently running", body = DrainStatus)
    )
)]
pub async fn drain_status(State(state): State<AppState>) -> impl IntoResponse {
    let status = DrainStatus {
        draining: state.relay.is_draining().await,
    };
    (StatusCode::OK, Json(status))
}
