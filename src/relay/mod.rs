//! Core relay implementation split into focused submodules.
//!
//! The `LinkRelay` struct and its methods are organized by domain:
//! - [`queue`] - Link queue management
//! - [`drain`] - Drain pass execution and cancellation
//! - [`commands`] - Text command parsing and execution
//! - [`lifecycle`] - Shutdown coordination

mod commands;
mod drain;
mod lifecycle;
mod queue;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

pub use commands::{Command, extract_urls, parse_command};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::{CliFetcher, Fetcher, UnavailableFetcher};
use crate::types::ChatId;
use crate::upload::{HttpUploader, UnavailableUploader, Uploader};

/// Queue and intake state
#[derive(Clone)]
pub(crate) struct QueueState {
    /// FIFO queue of links waiting for a drain pass (protected by Mutex)
    pub(crate) queue:
        std::sync::Arc<tokio::sync::Mutex<std::collections::VecDeque<QueuedLink>>>,
    /// Flag to indicate whether new links are accepted (set to false during shutdown)
    pub(crate) accepting_new: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

/// Drain pass state
#[derive(Clone)]
pub(crate) struct DrainState {
    /// The drain slot: `Some` while a pass is active. Claiming it is a
    /// test-and-set under the mutex, so two passes can never start at once.
    pub(crate) active:
        std::sync::Arc<tokio::sync::Mutex<Option<tokio_util::sync::CancellationToken>>>,
    /// Monotonic counter feeding unique output file prefixes
    pub(crate) output_counter: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

/// Download and upload collaborators (trait objects for pluggable implementations)
#[derive(Clone)]
pub(crate) struct RelayPipeline {
    /// Fetch collaborator turning a link into a local file
    pub(crate) fetcher: std::sync::Arc<dyn Fetcher>,
    /// Upload collaborator delivering a local file to the destination chat
    pub(crate) uploader: std::sync::Arc<dyn Uploader>,
}

/// Main relay instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct LinkRelay {
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<crate::types::Event>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: std::sync::Arc<Config>,
    /// Destination chat for uploads (runtime-settable)
    pub(crate) target: std::sync::Arc<tokio::sync::RwLock<Option<ChatId>>>,
    /// Queue and intake state
    pub(crate) queue_state: QueueState,
    /// Drain pass state
    pub(crate) drain_state: DrainState,
    /// Download and upload collaborators
    pub(crate) pipeline: RelayPipeline,
}

/// Internal struct representing a link waiting in the queue
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct QueuedLink {
    pub(crate) url: String,
    /// Completed failed passes for this link (0 for a fresh submission)
    pub(crate) attempts: u32,
}

impl LinkRelay {
    /// Create a new LinkRelay instance
    ///
    /// This initializes all core components:
    /// - Creates the download directory
    /// - Selects the fetch collaborator (configured binary path, PATH search,
    ///   or the unavailable stub)
    /// - Selects the upload collaborator (Bot API client when a token is
    ///   configured, otherwise the unavailable stub)
    /// - Sets up the event broadcast channel
    pub async fn new(config: Config) -> Result<Self> {
        // Initialize fetcher based on config
        let fetcher: std::sync::Arc<dyn Fetcher> =
            if let Some(ref downloader_path) = config.tools.downloader_path {
                // Use explicitly configured binary path
                std::sync::Arc::new(
                    CliFetcher::new(downloader_path.clone())
                        .with_extra_args(config.tools.extra_args.clone()),
                )
            } else if config.tools.search_path {
                // Search PATH for the downloader binary
                CliFetcher::from_path()
                    .map(|f| {
                        std::sync::Arc::new(f.with_extra_args(config.tools.extra_args.clone()))
                            as std::sync::Arc<dyn Fetcher>
                    })
                    .unwrap_or_else(|| std::sync::Arc::new(UnavailableFetcher))
            } else {
                // No binary configured and PATH search disabled
                std::sync::Arc::new(UnavailableFetcher)
            };

        tracing::info!(
            fetcher = fetcher.name(),
            available = fetcher.is_available(),
            "Fetcher initialized"
        );
        if !fetcher.is_available() {
            tracing::warn!(
                "No downloader binary found - drain passes will fail until yt-dlp is installed or downloader_path is set"
            );
        }

        // Initialize uploader based on config
        let uploader: std::sync::Arc<dyn Uploader> =
            match HttpUploader::from_config(&config.upload)? {
                Some(uploader) => std::sync::Arc::new(uploader),
                None => std::sync::Arc::new(UnavailableUploader),
            };

        tracing::info!(
            uploader = uploader.name(),
            available = uploader.is_available(),
            "Uploader initialized"
        );
        if !uploader.is_available() {
            tracing::warn!(
                "No bot token configured - drain passes will fail until bot_token is set"
            );
        }

        Self::with_collaborators(config, fetcher, uploader).await
    }

    /// Create a LinkRelay with explicit collaborators
    ///
    /// Embedders can supply their own [`Fetcher`] / [`Uploader`]
    /// implementations; tests use this to inject scripted ones. The same
    /// initialization as [`LinkRelay::new`] runs, minus collaborator
    /// selection.
    pub async fn with_collaborators(
        config: Config,
        fetcher: std::sync::Arc<dyn Fetcher>,
        uploader: std::sync::Arc<dyn Uploader>,
    ) -> Result<Self> {
        // Ensure the download directory exists
        tokio::fs::create_dir_all(config.download_dir())
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create download directory '{}': {}",
                        config.download_dir().display(),
                        e
                    ),
                ))
            })?;

        // Create broadcast channel with buffer size of 1000 events
        // This allows multiple subscribers to receive all events independently
        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);

        // Destination comes from config initially; runtime-settable afterwards
        let target = std::sync::Arc::new(tokio::sync::RwLock::new(config.upload.target_chat));

        // Group queue and intake state
        let queue_state = QueueState {
            queue: std::sync::Arc::new(tokio::sync::Mutex::new(
                std::collections::VecDeque::new(),
            )),
            accepting_new: std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true)),
        };

        // Group drain pass state (slot empty, counter starts at 1)
        let drain_state = DrainState {
            active: std::sync::Arc::new(tokio::sync::Mutex::new(None)),
            output_counter: std::sync::Arc::new(std::sync::atomic::AtomicU64::new(1)),
        };

        // Group the pipeline collaborators
        let pipeline = RelayPipeline { fetcher, uploader };

        Ok(Self {
            event_tx,
            config: std::sync::Arc::new(config),
            target,
            queue_state,
            drain_state,
            pipeline,
        })
    }

    /// Subscribe to relay events
    ///
    /// Multiple subscribers are supported. Each subscriber receives all events independently.
    /// Events are buffered, but if a subscriber falls behind by more than 1000 events,
    /// it will receive a `RecvError::Lagged` error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use link_relay::{Config, LinkRelay};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let relay = LinkRelay::new(Config::default()).await?;
    ///
    ///     let mut events = relay.subscribe();
    ///     tokio::spawn(async move {
    ///         while let Ok(event) = events.recv().await {
    ///             tracing::info!(?event, "relay event");
    ///         }
    ///     });
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<crate::types::Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    ///
    /// The configuration is wrapped in an Arc, so this is a cheap clone
    /// operation.
    pub fn get_config(&self) -> std::sync::Arc<Config> {
        std::sync::Arc::clone(&self.config)
    }

    /// Query the current pipeline capabilities
    ///
    /// Reports which collaborators are wired in and whether they can actually
    /// do their job, based on the configuration and available external tools.
    pub fn capabilities(&self) -> crate::types::Capabilities {
        crate::types::Capabilities {
            fetcher: crate::types::ToolStatus {
                name: self.pipeline.fetcher.name().to_string(),
                available: self.pipeline.fetcher.is_available(),
            },
            uploader: crate::types::ToolStatus {
                name: self.pipeline.uploader.name().to_string(),
                available: self.pipeline.uploader.is_available(),
            },
        }
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers, the event is silently dropped
    /// (ok() converts Err to None). The relay keeps working whether or not
    /// anyone is listening.
    pub(crate) fn emit_event(&self, event: crate::types::Event) {
        // send() returns Err if there are no receivers, which is fine - we just drop the event
        self.event_tx.send(event).ok();
    }

    /// Spawn the REST API server in a background task
    ///
    /// The server runs concurrently with drain processing and listens on the
    /// configured bind address (default: 127.0.0.1:8090).
    pub fn spawn_api_server(self: &std::sync::Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let relay = self.clone();
        let config = self.config.clone();

        tokio::spawn(async move { crate::api::start_api_server(relay, config).await })
    }
}
