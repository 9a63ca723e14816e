//! Basic relay example
//!
//! This example demonstrates the core functionality of link-relay:
//! - Configuring the downloader and the upload destination
//! - Creating a relay instance
//! - Subscribing to events
//! - Queueing links
//! - Draining the queue and reading the report

use link_relay::{ChatId, Config, Event, LinkRelay};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    // Build configuration
    let mut config = Config::default();
    config.drain.download_dir = "downloads".into();
    config.upload.bot_token = Some("123456:your-bot-token".to_string());
    config.upload.target_chat = Some(ChatId::new(-1001234567890));

    // Create relay instance (finds yt-dlp in PATH)
    let relay = LinkRelay::new(config).await?;

    // Subscribe to events
    let mut events = relay.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::LinksEnqueued {
                    accepted,
                    rejected,
                    queue_length,
                } => {
                    println!(
                        "✓ Queued {} links ({} rejected), {} waiting",
                        accepted, rejected, queue_length
                    );
                }
                Event::LinkStarted { url } => {
                    println!("⬇ Fetching {}", url);
                }
                Event::LinkForwarded { url } => {
                    println!("✓ Delivered {}", url);
                }
                Event::LinkFailed { url, stage, reason } => {
                    println!("✗ Failed {} at {}: {}", url, stage, reason);
                }
                Event::LinkRequeued { url, attempts } => {
                    println!("↻ Re-queued {} (attempt {})", url, attempts);
                }
                Event::DrainCompleted {
                    processed,
                    total,
                    failed,
                } => {
                    println!("✓ Pass done: {}/{} delivered, {} failed", processed, total, failed);
                }
                _ => {}
            }
        }
    });

    // Queue a couple of links
    let outcome = relay
        .enqueue(vec![
            "https://example.com/watch?v=abc".to_string(),
            "https://example.com/watch?v=def".to_string(),
        ])
        .await?;
    println!("Accepted {} links", outcome.accepted);

    // Drain the queue: fetch, upload, delete, pause, repeat.
    // start_drain() returns once every queued link has been attempted.
    let report = relay.start_drain().await?;

    println!(
        "Delivered {} of {} links in {}s",
        report.processed,
        report.total,
        report.elapsed().num_seconds()
    );
    for failure in &report.failed {
        println!("  still queued: {} ({})", failure.url, failure.reason);
    }

    Ok(())
}
