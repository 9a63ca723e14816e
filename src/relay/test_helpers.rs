//! Shared test helpers for creating LinkRelay instances in tests.

use crate::config::Config;
use crate::error::{FetchError, UploadError};
use crate::fetch::{FetchedMedia, Fetcher};
use crate::relay::LinkRelay;
use crate::types::ChatId;
use crate::upload::Uploader;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

/// Chat id used by the default test configuration
pub(crate) const TEST_CHAT: i64 = -1001234567890;

/// Scripted fetcher that writes a small file instead of shelling out
pub(crate) struct ScriptedFetcher {
    /// URLs that should fail with a download error
    pub(crate) fail_urls: HashSet<String>,
    /// Title reported for successful fetches
    pub(crate) title: Option<String>,
    /// Artificial per-fetch delay (for cancellation tests)
    pub(crate) delay: Duration,
    /// Every fetched URL in call order
    calls: Mutex<Vec<String>>,
    /// Output prefix handed in for every call, in call order
    prefixes: Mutex<Vec<PathBuf>>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self {
            fail_urls: HashSet::new(),
            title: None,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            prefixes: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_on(urls: &[&str]) -> Self {
        let mut fetcher = Self::new();
        fetcher.fail_urls = urls.iter().map(|u| (*u).to_string()).collect();
        fetcher
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn prefixes(&self) -> Vec<PathBuf> {
        self.prefixes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, output_prefix: &Path) -> crate::Result<FetchedMedia> {
        self.calls.lock().unwrap().push(url.to_string());
        self.prefixes
            .lock()
            .unwrap()
            .push(output_prefix.to_path_buf());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.fail_urls.contains(url) {
            return Err(FetchError::Failed {
                url: url.to_string(),
                message: "scripted download failure".to_string(),
            }
            .into());
        }

        let path = output_prefix.with_extension("mp4");
        tokio::fs::write(&path, b"scripted media").await?;

        Ok(FetchedMedia {
            path,
            title: self.title.clone(),
        })
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// One recorded upload call
#[derive(Debug, Clone)]
pub(crate) struct UploadCall {
    pub(crate) chat: ChatId,
    pub(crate) path: PathBuf,
    pub(crate) caption: String,
    pub(crate) source_url: String,
    /// Whether the file existed when the upload ran
    pub(crate) file_present: bool,
}

/// Scripted uploader that records calls instead of talking to an API
pub(crate) struct ScriptedUploader {
    /// Source URLs that should fail with an upload rejection
    pub(crate) fail_urls: HashSet<String>,
    calls: Mutex<Vec<UploadCall>>,
}

impl ScriptedUploader {
    pub(crate) fn new() -> Self {
        Self {
            fail_urls: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_on(urls: &[&str]) -> Self {
        let mut uploader = Self::new();
        uploader.fail_urls = urls.iter().map(|u| (*u).to_string()).collect();
        uploader
    }

    pub(crate) fn calls(&self) -> Vec<UploadCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Uploader for ScriptedUploader {
    async fn upload(
        &self,
        chat: ChatId,
        path: &Path,
        caption: &str,
        source_url: &str,
    ) -> crate::Result<()> {
        let file_present = tokio::fs::try_exists(path).await.unwrap_or(false);

        self.calls.lock().unwrap().push(UploadCall {
            chat,
            path: path.to_path_buf(),
            caption: caption.to_string(),
            source_url: source_url.to_string(),
            file_present,
        });

        if self.fail_urls.contains(source_url) {
            return Err(UploadError::Rejected {
                url: source_url.to_string(),
                reason: "scripted upload rejection".to_string(),
            }
            .into());
        }

        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Test configuration: tempdir-backed download dir, near-zero pacing delay,
/// destination pre-set to [`TEST_CHAT`]
pub(crate) fn test_config(temp_dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.drain.download_dir = temp_dir.path().join("downloads");
    config.drain.inter_item_delay = Duration::from_millis(1);
    config.upload.target_chat = Some(ChatId::new(TEST_CHAT));
    // Port 0 so concurrently running server tests never collide
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();
    config
}

/// Helper to create a test LinkRelay with scripted collaborators.
/// Returns the relay, the collaborators for inspection, and the tempdir
/// (which must be kept alive).
pub(crate) async fn create_test_relay(
    fetcher: ScriptedFetcher,
    uploader: ScriptedUploader,
) -> (
    LinkRelay,
    Arc<ScriptedFetcher>,
    Arc<ScriptedUploader>,
    tempfile::TempDir,
) {
    let temp_dir = tempdir().unwrap();
    let config = test_config(&temp_dir);

    let fetcher = Arc::new(fetcher);
    let uploader = Arc::new(uploader);

    let relay = LinkRelay::with_collaborators(config, fetcher.clone(), uploader.clone())
        .await
        .unwrap();

    (relay, fetcher, uploader, temp_dir)
}
