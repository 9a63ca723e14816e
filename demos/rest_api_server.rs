//! REST API server example
//!
//! This example shows how to run link-relay with the REST API enabled,
//! allowing control via HTTP endpoints.
//!
//! After starting, you can:
//! - View Swagger UI at http://localhost:8090/swagger-ui
//! - Queue links via POST http://localhost:8090/links
//! - Start a drain pass via POST http://localhost:8090/drain
//! - Stream events via GET http://localhost:8090/events

use link_relay::api::start_api_server;
use link_relay::config::{ApiConfig, Config, ServerIntegrationConfig, UploadConfig};
use link_relay::{ChatId, LinkRelay};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    // Configure API
    let api_config = ApiConfig {
        bind_address: "127.0.0.1:8090".parse::<SocketAddr>().unwrap(),
        api_key: None, // No authentication for local use
        cors_enabled: true,
        cors_origins: vec!["*".to_string()],
        swagger_ui: true,
    };

    // Build configuration
    let config = Config {
        upload: UploadConfig {
            bot_token: Some("123456:your-bot-token".to_string()),
            target_chat: Some(ChatId::new(-1001234567890)),
            ..Default::default()
        },
        server: ServerIntegrationConfig { api: api_config },
        ..Default::default()
    };

    // Create relay instance
    let relay = Arc::new(LinkRelay::new(config.clone()).await?);
    let config_arc = Arc::new(config);

    println!("🚀 Starting link-relay REST API server");
    println!("📖 Swagger UI: http://localhost:8090/swagger-ui");
    println!("🔄 Events stream: http://localhost:8090/events");
    println!();
    println!("Example commands:");
    println!("  # Queue links");
    println!("  curl -X POST http://localhost:8090/links \\");
    println!("    -H 'Content-Type: application/json' \\");
    println!("    -d '{{\"urls\": [\"https://example.com/watch?v=abc\"]}}'");
    println!();
    println!("  # Start a drain pass");
    println!("  curl -X POST http://localhost:8090/drain");
    println!();
    println!("  # Peek at the queue");
    println!("  curl http://localhost:8090/queue");
    println!();
    println!("  # Stream events (Server-Sent Events)");
    println!("  curl -N http://localhost:8090/events");

    // Start the API server (runs indefinitely)
    start_api_server(relay, config_arc).await?;

    Ok(())
}
