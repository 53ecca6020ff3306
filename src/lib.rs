//! # Tweetline Library
//!
//! A Rust web service library that serves CRUD endpoints for tweets. Tweets are
//! created, listed per user, updated and deleted; only the owner of a tweet may
//! change or remove it. A user's listing joins each tweet to the owner's
//! profile and a like count.
//!
//! ## Features
//!
//! - HTTP server built on axum with a uniform JSON response envelope
//! - PostgreSQL persistence via sqlx, or an in-memory store for development
//! - Header-based actor identity supplied by an upstream auth gateway
//! - Structured logging
//! - Health check endpoint
//!
//! ## Configuration
//!
//! - `PORT`: Server port (defaults to 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (in-memory store if unset)
//! - `ACTOR_HEADER`: Header carrying the authenticated user id (defaults to `x-user-id`)
//! - `CORS_ORIGIN`: Allowed CORS origin, `*` for any
//! - `BODY_LIMIT_BYTES`: Maximum JSON body size (defaults to 16384)
//!
//! ## API Endpoints
//!
//! - `POST /api/v1/tweets`: Create a tweet
//! - `GET /api/v1/tweets/user/:user_id`: List a user's tweets with owner and like count
//! - `PATCH /api/v1/tweets/:tweet_id`: Update a tweet's content
//! - `DELETE /api/v1/tweets/:tweet_id`: Delete a tweet
//! - `GET /health`: Returns service health status

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, patch, post},
    Router,
};
use log::warn;
use tower_http::cors::{Any, CorsLayer};

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod response;
pub mod store;

// Re-export commonly used types and functions
pub use config::AppConfig;
pub use error::ApiError;
pub use handlers::{create_tweet, delete_tweet, get_user_tweets, handle_health, update_tweet};
pub use response::ApiResponse;
pub use store::{MemoryStore, StoreError, TweetStore};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TweetStore>,
    pub actor_header: String,
}

impl AppState {
    pub fn new(store: Arc<dyn TweetStore>, actor_header: impl Into<String>) -> Self {
        Self {
            store,
            actor_header: actor_header.into(),
        }
    }
}

/// Builds the application router with all routes and request-level layers.
///
/// Tweet routes require an authenticated actor; `/health` does not. Tracing is
/// added by the caller so tests can use the bare router.
pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let tweets = Router::new()
        .route("/api/v1/tweets", post(create_tweet))
        .route("/api/v1/tweets/user/:user_id", get(get_user_tweets))
        .route(
            "/api/v1/tweets/:tweet_id",
            patch(update_tweet).delete(delete_tweet),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ));

    let mut app = Router::new()
        .route("/health", get(handle_health))
        .merge(tweets)
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .with_state(state);

    if let Some(origin) = config.cors_origin.as_deref() {
        if origin == "*" {
            app = app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));
        } else {
            match HeaderValue::from_str(origin) {
                Ok(origin) => {
                    app = app.layer(
                        CorsLayer::new()
                            .allow_origin(origin)
                            .allow_methods(Any)
                            .allow_headers(Any),
                    );
                }
                Err(e) => warn!("Ignoring invalid CORS_ORIGIN '{}': {}", origin, e),
            }
        }
    }

    app
}
