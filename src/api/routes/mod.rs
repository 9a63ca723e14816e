//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`links`] — Link intake
//! - [`queue`] — Queue inspection and clearing
//! - [`drain`] — Drain pass control
//! - [`target`] — Destination chat management
//! - [`system`] — Health, capabilities, events, OpenAPI, shutdown

use crate::types::ChatId;
use serde::{Deserialize, Serialize};

mod drain;
mod links;
mod queue;
mod system;
mod target;

// Re-export all handlers so `routes::function_name` continues to work
pub use drain::*;
pub use links::*;
pub use queue::*;
pub use system::*;
pub use target::*;

// ============================================================================
// Query/Request Types (shared across handlers)
// ============================================================================

/// Request body for POST /links
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct EnqueueRequest {
    /// Candidate links, in the order they should be queued
    pub urls: Vec<String>,
}

/// Query parameters for GET /queue
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PeekQueueQuery {
    /// Maximum number of entries to return (default: 50)
    pub limit: Option<usize>,
}

/// Request body for PUT /target
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SetTargetRequest {
    /// The destination chat or channel identifier
    pub chat_id: i64,
}

/// Response for GET /target
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TargetResponse {
    /// The configured destination, or null if none has been set
    pub chat_id: Option<ChatId>,
}

/// Response for GET /drain
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DrainStatus {
    /// Whether a drain pass is currently running
    pub draining: bool,
}
