//! Link intake handlers.

use super::EnqueueRequest;
use crate::api::AppState;
use crate::error::ApiError;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// POST /links - Add links to the queue
#[utoipa::path(
    post,
    path = "/links",
    tag = "links",
    request_body = EnqueueRequest,
    responses(
        (status = 200, description = "Links filtered and appended", body = crate::types::EnqueueOutcome),
        (status = 400, description = "Empty request"),
        (status = 503, description = "Shutting down, intake closed")
    )
)]
pub async fn enqueue_links(
    State(state): State<AppState>,
    Json(request): Json<EnqueueRequest>,
) -> Response {
    if request.urls.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError::validation("urls must not be empty")),
        )
            .into_response();
    }

    match state.relay.enqueue(request.urls).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Enqueue rejected");
            e.into_response()
        }
    }
}
