//! Traits and types for fetching links with an external downloader

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A file produced by the downloader for a single link
#[must_use]
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    /// Where the file landed on disk
    pub path: PathBuf,
    /// Title reported by the downloader, used as the upload caption when present
    pub title: Option<String>,
}

/// Trait for fetching a link to a local file
///
/// This trait defines the interface for the download step of the relay
/// pipeline. Implementations can shell out to an external binary or provide
/// stub functionality for graceful degradation.
///
/// # Examples
///
/// ```no_run
/// use link_relay::fetch::{CliFetcher, Fetcher};
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = CliFetcher::from_path()
///     .expect("yt-dlp binary not found");
///
/// let media = fetcher
///     .fetch("https://example.com/watch?v=abc", Path::new("downloads/relay-000001"))
///     .await?;
/// println!("saved to {}", media.path.display());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a link to a local file
    ///
    /// # Arguments
    ///
    /// * `url` - The link to download
    /// * `output_prefix` - Path prefix for the output file; the implementation
    ///   appends the extension the tool picks (e.g. `downloads/relay-000042`
    ///   becomes `downloads/relay-000042.mp4`)
    ///
    /// # Returns
    ///
    /// A `FetchedMedia` with the final file location and, when the tool
    /// reports one, the media title.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The downloader binary cannot be launched
    /// - The downloader runs but fails for this link
    /// - The downloader exits cleanly but no output file can be located
    /// - The operation is not supported (for stub implementations)
    ///
    /// No timeout is imposed here; a slow transfer is bounded only by the
    /// external tool's own behavior.
    async fn fetch(&self, url: &str, output_prefix: &Path) -> crate::Result<FetchedMedia>;

    /// Whether this implementation can actually fetch anything
    ///
    /// Useful for UI/API to report degraded operation before a drain is
    /// attempted.
    fn is_available(&self) -> bool;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
