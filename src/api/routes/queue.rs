//! Queue inspection and clearing handlers.

use super::PeekQueueQuery;
use crate::api::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

/// Default number of entries returned by GET /queue when no limit is given
const DEFAULT_PEEK_LIMIT: usize = 50;

/// GET /queue - Look at the front of the queue
#[utoipa::path(
    get,
    path = "/queue",
    tag = "queue",
    params(
        ("limit" = Option<usize>, Query, description = "Maximum number of entries to return (default: 50)")
    ),
    responses(
        (status = 200, description = "Front of the queue plus total length", body = crate::types::QueueSnapshot)
    )
)]
pub async fn peek_queue(
    State(state): State<AppState>,
    Query(query): Query<PeekQueueQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_PEEK_LIMIT);
    let snapshot = state.relay.peek_queue(limit).await;
    (StatusCode::OK, Json(snapshot))
}

/// DELETE /queue - Remove every queued link
#[utoipa::path(
    delete,
    path = "/queue",
    tag = "queue",
    responses(
        (status = 200, description = "Queue cleared, body reports how many links were removed")
    )
)]
pub async fn clear_queue(State(state): State<AppState>) -> impl IntoResponse {
    let removed = state.relay.clear_queue().await;
    (StatusCode::OK, Json(json!({ "removed": removed })))
}

/// GET /queue/stats - Get queue statistics
#[utoipa::path(
    get,
    path = "/queue/stats",
    tag = "queue",
    responses(
        (status = 200, description = "Queue statistics", body = crate::types::QueueStats)
    )
)]
pub async fn queue_stats(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.relay.queue_stats().await;
    (StatusCode::OK, Json(stats))
}
