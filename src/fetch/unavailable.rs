//! Stub fetcher used when no downloader binary is available

use super::traits::{FetchedMedia, Fetcher};
use crate::error::FetchError;
use async_trait::async_trait;
use std::path::Path;

/// Fetcher implementation used when yt-dlp cannot be found
///
/// Keeps the relay usable without a downloader installed: the queue and the
/// API still work, and a drain attempt fails on its first item with a clear
/// error instead of the process refusing to start. Install yt-dlp or set
/// `downloader_path` in the configuration to restore downloads.
#[derive(Debug, Default)]
pub struct UnavailableFetcher;

impl UnavailableFetcher {
    /// Create a new unavailable fetcher
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Fetcher for UnavailableFetcher {
    async fn fetch(&self, _url: &str, _output_prefix: &Path) -> crate::Result<FetchedMedia> {
        Err(FetchError::ToolUnavailable.into())
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}
