//! Fetching links to local media files
//!
//! This module covers the download half of the relay pipeline: turning a
//! queued link into a file on disk, via an external downloader binary.
//!
//! # Architecture
//!
//! - [`Fetcher`] - trait the drain loop works against
//! - [`CliFetcher`] - shells out to yt-dlp
//! - [`UnavailableFetcher`] - stub used when no binary can be found
//! - `parser` - interprets yt-dlp stdout/stderr
//!
//! # Usage
//!
//! ```no_run
//! use link_relay::fetch::{CliFetcher, Fetcher};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = CliFetcher::from_path().expect("yt-dlp not installed");
//! let media = fetcher
//!     .fetch("https://example.com/watch?v=abc", Path::new("downloads/relay-000001"))
//!     .await?;
//! println!("{} -> {}", media.title.as_deref().unwrap_or("untitled"), media.path.display());
//! # Ok(())
//! # }
//! ```

mod cli;
mod parser;
mod traits;
mod unavailable;

pub use cli::CliFetcher;
pub use traits::{FetchedMedia, Fetcher};
pub use unavailable::UnavailableFetcher;
