//! Mock Backend
//!
//! REST API serving farms and claims from memory for local portal development

use anyhow::{Context, Result};
use mock_backend::{create_router, AppState, Storage};
use std::env;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Configuration
    let host = env::var("MOCK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("MOCK_PORT").unwrap_or_else(|_| "3000".to_string());
    let seed: bool = env::var("MOCK_SEED")
        .unwrap_or_else(|_| "true".to_string())
        .parse()
        .context("Invalid MOCK_SEED (expected true/false)")?;

    info!("Starting Mock Backend");
    info!("Listening on {}:{}", host, port);

    let storage = if seed {
        Storage::with_demo_data()
    } else {
        Storage::new()
    };

    let app = create_router(AppState::new(storage));

    // Bind and serve
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("Mock Backend running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
