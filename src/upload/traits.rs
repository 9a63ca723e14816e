//! Traits for forwarding fetched files to a destination chat

use crate::types::ChatId;
use async_trait::async_trait;
use std::path::Path;

/// Trait for uploading a local file to a chat
///
/// This is the forwarding half of the relay pipeline. The only production
/// implementation talks to the Telegram Bot API; a stub stands in when no
/// bot token is configured.
///
/// # Examples
///
/// ```no_run
/// use link_relay::config::UploadConfig;
/// use link_relay::types::ChatId;
/// use link_relay::upload::{HttpUploader, Uploader};
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = UploadConfig {
///     bot_token: Some("123456:ABC".to_string()),
///     ..UploadConfig::default()
/// };
/// let uploader = HttpUploader::from_config(&config)?
///     .expect("bot token is set");
///
/// uploader
///     .upload(
///         ChatId::new(-1001234567890),
///         Path::new("downloads/relay-000001.mp4"),
///         "Video",
///         "https://example.com/watch?v=abc",
///     )
///     .await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload a file to a chat
    ///
    /// # Arguments
    ///
    /// * `chat` - The destination chat
    /// * `path` - The local file to send
    /// * `caption` - Caption to attach to the upload
    /// * `source_url` - The link the file came from, used to attribute errors
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No credentials are configured (for stub implementations)
    /// - The file cannot be read or the request cannot be sent
    /// - The destination API rejects the upload
    async fn upload(
        &self,
        chat: ChatId,
        path: &Path,
        caption: &str,
        source_url: &str,
    ) -> crate::Result<()>;

    /// Whether this implementation can actually deliver anything
    fn is_available(&self) -> bool;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
