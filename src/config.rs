//! Configuration types for link-relay

use crate::types::ChatId;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Queue behavior configuration (link filtering, retry budget)
///
/// Groups settings related to which links are accepted and how long failed
/// links are kept around. Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct QueueConfig {
    /// URL prefixes accepted by the enqueue filter (default: "http://", "https://")
    ///
    /// Anything that does not start with one of these is rejected and reported
    /// back to the caller instead of being queued.
    #[serde(default = "default_accepted_prefixes")]
    pub accepted_prefixes: Vec<String>,

    /// Maximum failed attempts per link before it is dropped (default: None = retry forever)
    ///
    /// Failed links are re-appended at the end of each drain pass. With the
    /// default, a permanently broken link keeps coming back until the queue is
    /// cleared; set a bound to have such links dropped with an event instead.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            accepted_prefixes: default_accepted_prefixes(),
            max_attempts: None,
        }
    }
}

/// Drain pass configuration (working directory, pacing)
///
/// Groups settings for the fetch-upload-delete loop.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DrainConfig {
    /// Directory where fetched files are written before upload (default: "downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Pause between queue items during a drain pass (default: 5 seconds)
    ///
    /// The pause is skipped after the last item and cut short by a cancel
    /// request.
    #[serde(default = "default_inter_item_delay", with = "duration_serde")]
    pub inter_item_delay: Duration,
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            inter_item_delay: default_inter_item_delay(),
        }
    }
}

/// External downloader configuration
///
/// Groups settings for locating and invoking the downloader binary.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to the downloader executable (auto-detected if None)
    #[serde(default)]
    pub downloader_path: Option<PathBuf>,

    /// Whether to search PATH for the downloader if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Extra arguments appended to every downloader invocation
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            downloader_path: None,
            search_path: true,
            extra_args: vec![],
        }
    }
}

/// Upload API configuration (credentials, destination, timeouts)
///
/// Groups settings for the bot API that fetched files are forwarded to.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadConfig {
    /// Base URL of the bot API (default: "https://api.telegram.org")
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Bot token used to authenticate uploads (None = uploads unavailable)
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Initial destination chat or channel (None = must be set before draining)
    #[serde(default)]
    pub target_chat: Option<ChatId>,

    /// Caption used when the downloader does not report a title (default: "Video")
    #[serde(default = "default_caption")]
    pub default_caption: String,

    /// Timeout for a single upload request (default: 10 minutes)
    ///
    /// Large files over slow links need generous values here. This bounds only
    /// the upload; the download step is bounded by the external tool alone.
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            bot_token: None,
            target_chat: None,
            default_caption: default_caption(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Main configuration for LinkRelay
///
/// Fields are organized into logical sub-configs for maintainability:
/// - [`queue`](QueueConfig) — link filtering and retry budget
/// - [`drain`](DrainConfig) — working directory and pacing
/// - [`tools`](ToolsConfig) — downloader binary location and arguments
/// - [`upload`](UploadConfig) — bot API credentials and destination
///
/// All sub-config fields are flattened for backward-compatible serialization,
/// meaning the JSON/TOML format remains unchanged (no nesting).
/// Individual fields are also accessible directly on `Config` via accessor
/// methods for convenience.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Link filtering and retry budget
    #[serde(flatten)]
    pub queue: QueueConfig,

    /// Drain pass working directory and pacing
    #[serde(flatten)]
    pub drain: DrainConfig,

    /// Downloader binary location and arguments
    #[serde(flatten)]
    pub tools: ToolsConfig,

    /// Bot API credentials and destination
    #[serde(flatten)]
    pub upload: UploadConfig,

    /// API and external server integration
    #[serde(flatten)]
    pub server: ServerIntegrationConfig,
}

// Convenience accessors — allow call sites to use `config.download_dir()` etc.
// without spelling out the sub-config path.
impl Config {
    /// Download directory
    pub fn download_dir(&self) -> &PathBuf {
        &self.drain.download_dir
    }

    /// Pause between queue items during a drain pass
    pub fn inter_item_delay(&self) -> Duration {
        self.drain.inter_item_delay
    }
}

/// API and external server integration configuration
///
/// Groups settings for external access and control interfaces.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:8090)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Optional API key for authentication
    #[serde(default)]
    pub api_key: Option<String>,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            api_key: None,
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

// Default value functions
fn default_accepted_prefixes() -> Vec<String> {
    vec!["http://".into(), "https://".into()]
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_inter_item_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_true() -> bool {
    true
}

fn default_api_base() -> String {
    "https://api.telegram.org".into()
}

fn default_caption() -> String {
    "Video".into()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(600) // 10 minutes
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8090))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
