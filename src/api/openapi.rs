//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the link-relay REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the link-relay REST API
///
/// This struct is used to generate the OpenAPI 3.1 specification that describes
/// all available endpoints, request/response types, and API behavior.
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "link-relay REST API",
        version = "0.1.0",
        description = "REST API for queueing video links and draining them through a fetch-upload-delete pipeline",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8090", description = "Local development server")
    ),
    paths(
        // Link intake
        crate::api::routes::enqueue_links,

        // Queue inspection
        crate::api::routes::peek_queue,
        crate::api::routes::clear_queue,
        crate::api::routes::queue_stats,

        // Drain control
        crate::api::routes::start_drain,
        crate::api::routes::cancel_drain,
        crate::api::routes::drain_status,

        // Destination
        crate::api::routes::get_target,
        crate::api::routes::set_target,

        // System
        crate::api::routes::health_check,
        crate::api::routes::get_capabilities,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
        crate::api::routes::shutdown,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::ChatId,
        crate::types::FailureStage,
        crate::types::Event,
        crate::types::EnqueueOutcome,
        crate::types::QueueEntry,
        crate::types::QueueSnapshot,
        crate::types::QueueStats,
        crate::types::ToolStatus,
        crate::types::Capabilities,

        // Config types from config.rs
        crate::config::Config,
        crate::config::QueueConfig,
        crate::config::DrainConfig,
        crate::config::ToolsConfig,
        crate::config::UploadConfig,
        crate::config::ApiConfig,

        // API request/response types from routes
        crate::api::routes::EnqueueRequest,
        crate::api::routes::SetTargetRequest,
        crate::api::routes::TargetResponse,
        crate::api::routes::DrainStatus,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "links", description = "Link intake - Submit video links to the queue"),
        (name = "queue", description = "Queue inspection - Peek, clear, and get statistics"),
        (name = "drain", description = "Drain control - Start, cancel, and observe the sequential delivery pass"),
        (name = "target", description = "Destination - Get and set the chat links are delivered to"),
        (name = "system", description = "System endpoints - Health checks, capabilities, OpenAPI spec, events, shutdown"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security addon to add API key authentication scheme to OpenAPI spec
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new("X-Api-Key"),
                    ),
                ),
            );
        }
    }
}
