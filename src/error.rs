//! Error types for link-relay
//!
//! This module provides comprehensive error handling for the library, including:
//! - Domain-specific error types (Drain, Fetch, Upload, Config, etc.)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes
//! - Context information (URL, tool name, failure reason, etc.)

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for link-relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for link-relay
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "download_dir")
        key: Option<String>,
    },

    /// Drain control error (already running, nothing to drain, etc.)
    #[error("drain error: {0}")]
    Drain(#[from] DrainError),

    /// Fetching a link with the external downloader failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Forwarding a fetched file to the destination failed
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Shutdown in progress - not accepting new links
    #[error("shutdown in progress: not accepting new links")]
    ShuttingDown,

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Drain control errors
///
/// These are pre-flight and state errors for the drain pass itself, as opposed
/// to failures of individual links inside a pass.
#[derive(Debug, Error)]
pub enum DrainError {
    /// A drain pass is already active
    #[error("a drain pass is already running")]
    AlreadyRunning,

    /// No destination channel has been configured
    #[error("no destination channel configured")]
    NoTarget,

    /// The queue has nothing to drain
    #[error("the queue is empty")]
    EmptyQueue,

    /// Cancel was requested but no drain pass is active
    #[error("no drain pass is running")]
    NotRunning,
}

/// Errors from the external downloader step
#[derive(Debug, Error)]
pub enum FetchError {
    /// No downloader binary was found at startup
    #[error("no downloader binary is available")]
    ToolUnavailable,

    /// The downloader process could not be launched at all
    #[error("failed to launch {tool}: {message}")]
    Spawn {
        /// The binary that failed to launch (e.g., "yt-dlp")
        tool: String,
        /// The underlying launch error
        message: String,
    },

    /// The downloader ran but failed for this link
    #[error("download failed for {url}: {message}")]
    Failed {
        /// The link that failed to download
        url: String,
        /// Human-readable failure reason, translated from tool output where possible
        message: String,
    },

    /// The downloader exited successfully but no output file could be located
    #[error("downloader reported success for {url} but produced no output file")]
    OutputMissing {
        /// The link whose output file is missing
        url: String,
    },
}

/// Errors from the upload step
#[derive(Debug, Error)]
pub enum UploadError {
    /// No credentials are configured for the upload API
    #[error("no bot token configured for uploads")]
    NoCredentials,

    /// The upload API accepted the request but rejected the file
    #[error("upload rejected for {url}: {reason}")]
    Rejected {
        /// The link whose file was rejected
        url: String,
        /// The rejection reason reported by the API
        reason: String,
    },

    /// The upload request never completed (connection, timeout, etc.)
    #[error("upload failed for {url}: {message}")]
    Transport {
        /// The link whose file could not be delivered
        url: String,
        /// The underlying transport error
        message: String,
    },
}

/// API error response format
///
/// This structure is returned by API endpoints when an error occurs.
/// It follows a standard format with machine-readable error codes,
/// human-readable messages, and optional contextual details.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "download_failed",
///     "message": "fetch error: download failed for https://example.com/v/1: video unavailable",
///     "details": {
///       "url": "https://example.com/v/1"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "no_target", "validation_error")
    ///
    /// Clients can use this for programmatic error handling.
    pub code: String,

    /// Human-readable error message
    ///
    /// This is suitable for displaying to end users.
    pub message: String,

    /// Optional additional context about the error
    ///
    /// This can include fields like the failing URL, tool name, rejection reason, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create a "conflict" error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("conflict", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }

    /// Create an "unauthorized" error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("unauthorized", message)
    }

    /// Create a "service unavailable" error
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new("service_unavailable", message)
    }
}

/// Convert errors to HTTP status codes for API responses
///
/// This trait maps domain errors to appropriate HTTP status codes.
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,

            // 409 Conflict - Drain pass in the wrong state for the request
            Error::Drain(_) => 409,

            // 502 Bad Gateway - The external downloader or upload API misbehaved
            Error::Fetch(FetchError::Spawn { .. }) => 502,
            Error::Fetch(FetchError::Failed { .. }) => 502,
            Error::Fetch(FetchError::OutputMissing { .. }) => 502,
            Error::Upload(UploadError::Rejected { .. }) => 502,
            Error::Upload(UploadError::Transport { .. }) => 502,

            // 503 Service Unavailable - Collaborator not usable at all
            Error::Fetch(FetchError::ToolUnavailable) => 503,
            Error::Upload(UploadError::NoCredentials) => 503,
            Error::ShuttingDown => 503,

            // 500 Internal Server Error - Server-side issues
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Drain(e) => match e {
                DrainError::AlreadyRunning => "drain_already_running",
                DrainError::NoTarget => "no_target",
                DrainError::EmptyQueue => "queue_empty",
                DrainError::NotRunning => "drain_not_running",
            },
            Error::Fetch(e) => match e {
                FetchError::ToolUnavailable => "downloader_unavailable",
                FetchError::Spawn { .. } => "downloader_spawn_failed",
                FetchError::Failed { .. } => "download_failed",
                FetchError::OutputMissing { .. } => "output_missing",
            },
            Error::Upload(e) => match e {
                UploadError::NoCredentials => "uploader_unavailable",
                UploadError::Rejected { .. } => "upload_rejected",
                UploadError::Transport { .. } => "upload_transport_error",
            },
            Error::Io(_) => "io_error",
            Error::ShuttingDown => "shutting_down",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        // Add contextual details for specific error types
        let details = match &error {
            Error::Fetch(FetchError::Spawn { tool, .. }) => Some(serde_json::json!({
                "tool": tool,
            })),
            Error::Fetch(FetchError::Failed { url, .. }) => Some(serde_json::json!({
                "url": url,
            })),
            Error::Fetch(FetchError::OutputMissing { url }) => Some(serde_json::json!({
                "url": url,
            })),
            Error::Upload(UploadError::Rejected { url, reason }) => Some(serde_json::json!({
                "url": url,
                "reason": reason,
            })),
            Error::Upload(UploadError::Transport { url, .. }) => Some(serde_json::json!({
                "url": url,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
