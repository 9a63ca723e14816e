//! Test configuration helpers for loading .env credentials and creating test relays

use link_relay::{ChatId, Config, LinkRelay};
use std::sync::Arc;
use tempfile::TempDir;

/// Error type for test configuration
#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Config error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Load the upload destination from environment variables
///
/// Required environment variables:
/// - `RELAY_BOT_TOKEN` - Bot API token used for uploads
/// - `RELAY_TARGET_CHAT` - Destination chat id (e.g. -1001234567890)
///
/// Optional environment variables:
/// - `RELAY_API_BASE` - Bot API base URL (default: https://api.telegram.org)
/// - `RELAY_DOWNLOADER` - Path to the downloader binary (default: search PATH)
/// - `RELAY_TEST_URL` - Link used by the live pipeline test
pub fn load_live_settings() -> Result<(String, ChatId), ConfigError> {
    dotenvy::dotenv().ok();

    let bot_token = std::env::var("RELAY_BOT_TOKEN")
        .map_err(|_| ConfigError("RELAY_BOT_TOKEN not set in environment".to_string()))?;

    let target_chat: i64 = std::env::var("RELAY_TARGET_CHAT")
        .map_err(|_| ConfigError("RELAY_TARGET_CHAT not set in environment".to_string()))?
        .parse()
        .map_err(|_| ConfigError("RELAY_TARGET_CHAT is not a valid chat id".to_string()))?;

    Ok((bot_token, ChatId::new(target_chat)))
}

/// The link the live pipeline test downloads, overridable via `RELAY_TEST_URL`
///
/// The default is a short, stable test clip so a live run stays cheap.
pub fn live_test_url() -> String {
    std::env::var("RELAY_TEST_URL")
        .unwrap_or_else(|_| "https://www.youtube.com/watch?v=jNQXAC9IVRw".to_string())
}

/// Create a LinkRelay configured for live testing against the real bot API
///
/// Returns the relay and temp directory (keep temp_dir alive for test duration)
pub async fn create_live_relay() -> Result<(Arc<LinkRelay>, TempDir), ConfigError> {
    let (bot_token, target_chat) = load_live_settings()?;
    let temp_dir = tempfile::tempdir()
        .map_err(|e| ConfigError(format!("Failed to create temp dir: {}", e)))?;

    let mut config = Config::default();
    config.drain.download_dir = temp_dir.path().join("downloads");
    config.upload.bot_token = Some(bot_token);
    config.upload.target_chat = Some(target_chat);
    if let Ok(api_base) = std::env::var("RELAY_API_BASE") {
        config.upload.api_base = api_base;
    }
    if let Ok(downloader) = std::env::var("RELAY_DOWNLOADER") {
        config.tools.downloader_path = Some(downloader.into());
    }

    let relay = LinkRelay::new(config)
        .await
        .map_err(|e| ConfigError(format!("Failed to create relay: {}", e)))?;

    Ok((Arc::new(relay), temp_dir))
}

/// Check if live test credentials are available
pub fn has_live_credentials() -> bool {
    dotenvy::dotenv().ok();
    std::env::var("RELAY_BOT_TOKEN").is_ok() && std::env::var("RELAY_TARGET_CHAT").is_ok()
}

/// Skip test if credentials are not available
#[macro_export]
macro_rules! skip_if_no_credentials {
    () => {
        if !$crate::common::has_live_credentials() {
            eprintln!("Skipping test: relay credentials not found in .env");
            return;
        }
    };
}
