//! Stub uploader used when no bot token is configured

use super::traits::Uploader;
use crate::error::UploadError;
use crate::types::ChatId;
use async_trait::async_trait;
use std::path::Path;

/// Uploader implementation used when no bot token is configured
///
/// Lets the relay start and accept links without credentials; any drain
/// attempt fails on its first item with a clear error. Set `bot_token` in
/// the configuration to restore forwarding.
#[derive(Debug, Default)]
pub struct UnavailableUploader;

impl UnavailableUploader {
    /// Create a new unavailable uploader
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Uploader for UnavailableUploader {
    async fn upload(
        &self,
        _chat: ChatId,
        _path: &Path,
        _caption: &str,
        _source_url: &str,
    ) -> crate::Result<()> {
        Err(UploadError::NoCredentials.into())
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}
