//! Destination chat handlers.

use super::{SetTargetRequest, TargetResponse};
use crate::api::AppState;
use crate::types::ChatId;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// GET /target - Get the configured destination chat
#[utoipa::path(
    get,
    path = "/target",
    tag = "target",
    responses(
        (status = 200, description = "The configured destination, chat_id is null when unset", body = TargetResponse)
    )
)]
pub async fn get_target(State(state): State<AppState>) -> impl IntoResponse {
    let response = TargetResponse {
        chat_id: state.relay.target().await,
    };
    (StatusCode::OK, Json(response))
}

/// PUT /target - Set the destination chat for uploads
///
/// Takes effect for the next drain pass; a pass already in flight keeps
/// delivering to the destination it started with.
#[utoipa::path(
    put,
    path = "/target",
    tag = "target",
    request_body = SetTargetRequest,
    responses(
        (status = 204, description = "Destination updated")
    )
)]
pub async fn set_target(
    State(state): State<AppState>,
    Json(request): Json<SetTargetRequest>,
) -> impl IntoResponse {
    state.relay.set_target(ChatId::new(request.chat_id)).await;
    StatusCode::NO_CONTENT
}
