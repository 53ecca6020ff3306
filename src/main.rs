//! # Tweetline
//!
//! A Rust web service that provides CRUD HTTP endpoints for tweets.
//!
//! ## Environment Variables
//!
//! - `PORT`: Server port (defaults to 3000)
//! - `DATABASE_URL`: PostgreSQL connection string; the in-memory store is used when unset
//! - `ACTOR_HEADER`, `CORS_ORIGIN`, `BODY_LIMIT_BYTES`: see [`tweetline::AppConfig`]
//! - `RUST_LOG`: log filter for `env_logger`

use std::{net::SocketAddr, process, sync::Arc};

use log::{error, info};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use tweetline::{
    build_router,
    db::{create_schema, get_db_pool, PgTweetStore},
    AppConfig, AppState, MemoryStore, TweetStore,
};

/// Main entry point for the tweetline web service.
///
/// Initializes logging, loads configuration, selects the store, and serves
/// HTTP until Ctrl-C or SIGTERM is received.
///
/// # Example Usage
///
/// ```bash
/// # Run against PostgreSQL on port 8080 with debug logging
/// DATABASE_URL=postgres://localhost/tweets PORT=8080 RUST_LOG=debug cargo run
/// ```
#[tokio::main]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    if let Err(e) = run().await {
        error!("tweetline exited with error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::from_env()?;

    let store: Arc<dyn TweetStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = get_db_pool(url).await?;
            create_schema(&pool).await?;
            Arc::new(PgTweetStore::new(pool))
        }
        None => {
            info!("Using in-memory tweet store");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, config.actor_header.clone());
    let app = build_router(state, &config)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Starting tweetline server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or on SIGTERM where available.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
