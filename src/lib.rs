//! # link-relay
//!
//! Backend library for forwarding video links to a chat channel: queue links,
//! drain them one at a time through an external downloader, upload the result,
//! clean up.
//!
//! ## Design Philosophy
//!
//! link-relay is designed to be:
//! - **Sequential by design** - One link in flight at a time, paced by a fixed delay
//! - **Sensible defaults** - Works out of the box with a bot token and a chat id
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use link_relay::{ChatId, Config, LinkRelay};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.upload.bot_token = Some("123456:bot-token".to_string());
//!     config.upload.target_chat = Some(ChatId::new(-1001234567890));
//!
//!     let relay = LinkRelay::new(config).await?;
//!
//!     // Subscribe to events
//!     let mut events = relay.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     // Queue a few links, then deliver them in order
//!     relay
//!         .enqueue(vec!["https://example.com/watch?v=abc".to_string()])
//!         .await?;
//!     let report = relay.start_drain().await?;
//!     println!("Delivered {} of {}", report.processed, report.total);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Download side of the pipeline (external downloader integration)
pub mod fetch;
/// Core relay implementation (decomposed into focused submodules)
pub mod relay;
/// Core types and events
pub mod types;
/// Upload side of the pipeline (bot API integration)
pub mod upload;

// Re-export commonly used types
pub use config::{Config, DrainConfig, QueueConfig, ToolsConfig, UploadConfig};
pub use error::{
    ApiError, DrainError, Error, ErrorDetail, FetchError, Result, ToHttpStatus, UploadError,
};
pub use fetch::{CliFetcher, FetchedMedia, Fetcher, UnavailableFetcher};
pub use relay::{Command, LinkRelay, extract_urls, parse_command};
pub use types::{
    Capabilities, ChatId, DrainReport, EnqueueOutcome, Event, FailedLink, FailureStage,
    QueueEntry, QueueSnapshot, QueueStats, ToolStatus,
};
pub use upload::{HttpUploader, UnavailableUploader, Uploader};

/// Helper function to run the relay with graceful signal handling.
///
/// Waits for a termination signal and then calls the relay's `shutdown()` method.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use link_relay::{Config, LinkRelay, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::default();
///     let relay = LinkRelay::new(config).await?;
///
///     // Run with automatic signal handling
///     run_with_shutdown(relay).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(relay: LinkRelay) -> Result<()> {
    wait_for_signal().await;
    relay.shutdown().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
