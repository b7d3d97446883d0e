//! Axum API server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vchat_api::{create_router, ApiConfig, AppState, GeminiClient};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("vchat=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting vchat-api");

    // Load configuration
    let config = ApiConfig::from_env();
    info!("API config: host={}, port={}", config.host, config.port);

    // Required directories must exist before the first upload
    for dir in [&config.frames_root, &config.temp_dir] {
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            error!("Failed to create {}: {}", dir.display(), e);
            std::process::exit(1);
        }
    }

    let gateway = match GeminiClient::new(config.gateway_timeout) {
        Ok(g) => Arc::new(g),
        Err(e) => {
            error!("Failed to create AI gateway: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::new(config.clone(), gateway);

    // Idle sessions are swept in the background
    let store = Arc::clone(&state.sessions);
    let sweep_interval = config.eviction_interval;
    tokio::spawn(async move {
        store.run_eviction(sweep_interval).await;
    });

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid bind address");

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Received shutdown signal");
}
