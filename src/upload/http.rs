//! HTTP uploader for the Telegram Bot API

use super::traits::Uploader;
use crate::config::UploadConfig;
use crate::error::{Error, UploadError};
use crate::types::ChatId;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

/// Response envelope the Bot API wraps every reply in
#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Uploader implementation backed by the Telegram Bot API
///
/// Sends files with `sendVideo` as one multipart request per upload. The
/// request is bounded by `request_timeout` from the configuration so a dead
/// connection cannot wedge a drain pass forever.
#[derive(Debug)]
pub struct HttpUploader {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl HttpUploader {
    /// Create a new uploader against an explicit API base URL
    ///
    /// # Errors
    ///
    /// Returns an error if `api_base` is not a valid http(s) URL or the HTTP
    /// client cannot be constructed.
    pub fn new(
        api_base: String,
        bot_token: String,
        request_timeout: Duration,
    ) -> crate::Result<Self> {
        // Reject a broken base URL here instead of on the first upload
        let parsed = url::Url::parse(&api_base).map_err(|e| Error::Config {
            message: format!("invalid api_base '{api_base}': {e}"),
            key: Some("api_base".to_string()),
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(Error::Config {
                    message: format!("api_base must be http or https, got '{scheme}'"),
                    key: Some("api_base".to_string()),
                });
            }
        }

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| Error::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token,
        })
    }

    /// Create an uploader from the upload configuration
    ///
    /// Returns `Ok(None)` when no bot token is configured.
    pub fn from_config(config: &UploadConfig) -> crate::Result<Option<Self>> {
        match config.bot_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(Some(Self::new(
                config.api_base.clone(),
                token.to_string(),
                config.request_timeout,
            )?)),
            _ => Ok(None),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload(
        &self,
        chat: ChatId,
        path: &Path,
        caption: &str,
        source_url: &str,
    ) -> crate::Result<()> {
        let bytes = fs::read(path).await.map_err(|e| UploadError::Transport {
            url: source_url.to_string(),
            message: format!("failed to read {}: {}", path.display(), e),
        })?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video.mp4")
            .to_string();

        debug!(
            "uploading {} ({} bytes) to chat {}",
            path.display(),
            bytes.len(),
            chat
        );

        let form = Form::new()
            .text("chat_id", chat.get().to_string())
            .text("caption", caption.to_string())
            .part("video", Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(self.endpoint("sendVideo"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport {
                url: source_url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            // pull the API description out of the body when there is one
            let reason = match response.json::<BotApiResponse>().await {
                Ok(body) => body
                    .description
                    .unwrap_or_else(|| format!("HTTP {status}")),
                Err(_) => format!("HTTP {status}"),
            };
            return Err(UploadError::Rejected {
                url: source_url.to_string(),
                reason,
            }
            .into());
        }

        let body: BotApiResponse =
            response
                .json()
                .await
                .map_err(|e| UploadError::Transport {
                    url: source_url.to_string(),
                    message: format!("invalid API response: {e}"),
                })?;

        if !body.ok {
            return Err(UploadError::Rejected {
                url: source_url.to_string(),
                reason: body
                    .description
                    .unwrap_or_else(|| "the bot API reported a failure".to_string()),
            }
            .into());
        }

        debug!("upload of {} to chat {} accepted", path.display(), chat);
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "telegram-bot-api"
    }
}
