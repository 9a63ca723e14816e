//! Forwarding fetched files to the destination chat
//!
//! This module covers the delivery half of the relay pipeline: pushing a
//! local file to the configured chat through the Telegram Bot API.
//!
//! # Architecture
//!
//! - [`Uploader`] - trait the drain loop works against
//! - [`HttpUploader`] - multipart `sendVideo` calls against the Bot API
//! - [`UnavailableUploader`] - stub used when no bot token is configured
//!
//! # Usage
//!
//! ```no_run
//! use link_relay::config::UploadConfig;
//! use link_relay::types::ChatId;
//! use link_relay::upload::{HttpUploader, Uploader};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = UploadConfig {
//!     bot_token: Some("123456:ABC".to_string()),
//!     ..UploadConfig::default()
//! };
//! let uploader = HttpUploader::from_config(&config)?.expect("token is set");
//! uploader
//!     .upload(
//!         ChatId::new(-1001234567890),
//!         Path::new("downloads/relay-000001.mp4"),
//!         "Video",
//!         "https://example.com/watch?v=abc",
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod traits;
mod unavailable;

pub use http::HttpUploader;
pub use traits::Uploader;
pub use unavailable::UnavailableUploader;
