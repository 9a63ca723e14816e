//! CLI-based fetcher using the yt-dlp command-line tool

use super::parser;
use super::traits::{FetchedMedia, Fetcher};
use crate::error::FetchError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};

/// Fetcher implementation that shells out to yt-dlp
///
/// yt-dlp handles site extraction, format selection and stream merging on its
/// own; this wrapper hands it an output prefix, waits for it to finish and
/// works out where the file landed. No timeout is applied to the child
/// process, so a long transfer simply takes as long as it takes.
///
/// # Examples
///
/// ```no_run
/// use link_relay::fetch::CliFetcher;
/// use std::path::PathBuf;
///
/// // Explicit binary location
/// let fetcher = CliFetcher::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Or find it in PATH
/// if let Some(fetcher) = CliFetcher::from_path() {
///     println!("found a downloader");
/// }
/// ```
pub struct CliFetcher {
    /// Path to the yt-dlp binary
    binary_path: PathBuf,
    /// Extra command-line arguments appended to every invocation
    extra_args: Vec<String>,
}

impl CliFetcher {
    /// Create a new CLI fetcher with the specified binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            extra_args: Vec::new(),
        }
    }

    /// Create a CLI fetcher by finding yt-dlp in the system PATH
    ///
    /// Returns `None` if the binary is not found.
    pub fn from_path() -> Option<Self> {
        which::which("yt-dlp").ok().map(Self::new)
    }

    /// Append extra arguments to every yt-dlp invocation
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// Build the argument list for one invocation
    ///
    /// `--no-simulate` keeps the download running despite `--print`, and
    /// `--no-quiet` keeps the destination lines on stdout so the output file
    /// can be located afterwards.
    fn build_args(&self, url: &str, output_prefix: &Path) -> Vec<String> {
        let mut args = vec![
            "--newline".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--no-simulate".to_string(),
            "--no-quiet".to_string(),
            "--print".to_string(),
            format!("before_dl:{}%(title)s", parser::TITLE_MARKER),
            "--output".to_string(),
            format!("{}.%(ext)s", output_prefix.display()),
        ];
        args.extend(self.extra_args.iter().cloned());
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl Fetcher for CliFetcher {
    async fn fetch(&self, url: &str, output_prefix: &Path) -> crate::Result<FetchedMedia> {
        let args = self.build_args(url, output_prefix);
        debug!("fetching {} with {}", url, self.binary_path.display());

        let output = Command::new(&self.binary_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| FetchError::Spawn {
                tool: self.binary_path.display().to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            cleanup_partials(output_prefix).await;
            return Err(FetchError::Failed {
                url: url.to_string(),
                message: parser::translate_tool_error(&stderr),
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut destination: Option<String> = None;
        let mut title: Option<String> = None;
        for line in stdout.lines() {
            if let Some(path) = parser::parse_destination_line(line) {
                // later lines win so a merged file replaces its input streams
                destination = Some(path);
            } else if title.is_none() {
                title = parser::parse_title_line(line);
            }
        }

        if let Some(path) = destination {
            let path = PathBuf::from(path);
            if fs::try_exists(&path).await.unwrap_or(false) {
                debug!("fetched {} to {}", url, path.display());
                return Ok(FetchedMedia { path, title });
            }
        }

        // Clean exit but the reported path is gone or was never printed.
        // Fall back to scanning for the prefix the tool was handed.
        match find_output_for_prefix(output_prefix).await {
            Some(path) => {
                debug!("located output for {} by prefix scan: {}", url, path.display());
                Ok(FetchedMedia { path, title })
            }
            None => {
                cleanup_partials(output_prefix).await;
                Err(FetchError::OutputMissing {
                    url: url.to_string(),
                }
                .into())
            }
        }
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }
}

/// Locate the output file for a prefix when the tool did not say where it
/// wrote
///
/// Prefixes are unique per queue item, so any non-empty regular file whose
/// name starts with the prefix stem is a candidate; the most recently
/// modified one wins. Partial-download leftovers are skipped.
async fn find_output_for_prefix(output_prefix: &Path) -> Option<PathBuf> {
    let dir = output_prefix.parent()?;
    let stem = output_prefix.file_name()?.to_str()?;

    let mut entries = fs::read_dir(dir).await.ok()?;
    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;

    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with(stem) {
            continue;
        }
        if name.ends_with(".part") || name.ends_with(".ytdl") {
            continue;
        }
        let Ok(meta) = entry.metadata().await else {
            continue;
        };
        if !meta.is_file() || meta.len() == 0 {
            continue;
        }
        let Ok(modified) = meta.modified() else {
            continue;
        };
        match &newest {
            Some((best, _)) if *best >= modified => {}
            _ => newest = Some((modified, entry.path())),
        }
    }

    newest.map(|(_, path)| path)
}

/// Remove partial-download files (`.part`, `.ytdl`) left behind for a prefix
///
/// Best effort; the drain loop must keep moving even when a leftover cannot
/// be removed.
async fn cleanup_partials(output_prefix: &Path) {
    let Some(dir) = output_prefix.parent() else {
        return;
    };
    let Some(stem) = output_prefix.file_name().and_then(|n| n.to_str()) else {
        return;
    };

    let Ok(mut entries) = fs::read_dir(dir).await else {
        return;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(stem) && (name.ends_with(".part") || name.ends_with(".ytdl")) {
            if let Err(e) = fs::remove_file(entry.path()).await {
                warn!("failed to remove partial file {}: {}", name, e);
            } else {
                debug!("removed partial file {}", name);
            }
        }
    }
}
