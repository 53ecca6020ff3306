//! HTTP route handlers for the tweetline service.
//!
//! Each tweet handler reads its inputs, performs at most one read and one
//! write through the [`TweetStore`](crate::store::TweetStore), and returns an
//! [`ApiResponse`] envelope or an [`ApiError`].

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use log::info;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::auth::Actor;
use crate::error::ApiError;
use crate::models::{ContentBody, NewTweet, Tweet, TweetWithOwner};
use crate::response::ApiResponse;
use crate::AppState;

/// Handles GET requests to the `/health` endpoint.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "tweetline"
/// }
/// ```
pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "tweetline"}))
}

/// Parses a path identifier. Malformed ids never reach the store.
fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::validation(format!("Invalid {} ID", what)))
}

/// Maps a body rejection. Oversized bodies (413) and non-JSON content types
/// (415) keep their status; everything else is a 400.
fn body_rejection(rejection: JsonRejection) -> ApiError {
    let status = rejection.status();
    match status {
        StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNSUPPORTED_MEDIA_TYPE => {
            ApiError::rejected(status, rejection.body_text())
        }
        _ => ApiError::validation(rejection.body_text()),
    }
}

/// Extracts non-empty content from a JSON body, or fails with `message`.
/// Content is stored exactly as sent.
fn require_content(
    body: Result<Json<ContentBody>, JsonRejection>,
    message: &str,
) -> Result<String, ApiError> {
    let Json(body) = body.map_err(body_rejection)?;
    match body.content {
        Some(content) if !content.is_empty() => Ok(content),
        _ => Err(ApiError::validation(message)),
    }
}

/// Ownership check. An absent actor never owns anything.
fn ensure_owner(tweet: &Tweet, actor: Option<Actor>, action: &str) -> Result<Uuid, ApiError> {
    match actor {
        Some(Actor(id)) if id == tweet.owner => Ok(id),
        _ => Err(ApiError::forbidden(format!(
            "Unauthorized to {} this tweet",
            action
        ))),
    }
}

/// Handles `POST /api/v1/tweets`.
///
/// Creates a tweet owned by the current actor.
///
/// # Errors
///
/// - 400 if `content` is missing or empty
/// - 413 or 415 if the body is too large or not JSON
/// - 401 if no actor is attached to the request
/// - 500 if the store reports no created record
pub async fn create_tweet(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    body: Result<Json<ContentBody>, JsonRejection>,
) -> Result<ApiResponse<Tweet>, ApiError> {
    let content = require_content(body, "Tweet content is required")?;
    let Some(Extension(Actor(owner))) = actor else {
        return Err(ApiError::unauthorized("Unauthorized request"));
    };

    let tweet = state
        .store
        .create_tweet(NewTweet { content, owner })
        .await?
        .ok_or_else(|| ApiError::internal("Error while creating Tweet"))?;

    info!("Tweet {} created by {}", tweet.id, owner);
    Ok(ApiResponse::ok(tweet, "Tweet created successfully"))
}

/// Handles `GET /api/v1/tweets/user/:user_id`.
///
/// Returns the user's tweets, newest first, each joined to the owner's
/// display fields and its like count.
///
/// # Errors
///
/// - 400 if `user_id` is malformed
/// - 404 if the user does not exist
/// - 500 if the user has no tweets
pub async fn get_user_tweets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<TweetWithOwner>>, ApiError> {
    let user_id = parse_id(&user_id, "User")?;

    // 404 rather than 400 for an unknown user; see DESIGN.md, "Unknown user on list".
    state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let tweets = state.store.user_tweets_with_likes(user_id).await?;
    if tweets.is_empty() {
        return Err(ApiError::internal("No tweets found"));
    }

    info!("Fetched {} tweets for user {}", tweets.len(), user_id);
    Ok(ApiResponse::ok(tweets, "Tweets fetched successfully"))
}

/// Handles `PATCH /api/v1/tweets/:tweet_id`.
///
/// Replaces the content of a tweet owned by the current actor. Nothing but
/// `content` (and `updatedAt`) changes.
///
/// # Errors
///
/// - 400 if `tweet_id` is malformed or `content` is missing or empty
/// - 413 or 415 if the body is too large or not JSON
/// - 404 if the tweet does not exist
/// - 403 if the actor is not the owner
pub async fn update_tweet(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Path(tweet_id): Path<String>,
    body: Result<Json<ContentBody>, JsonRejection>,
) -> Result<ApiResponse<Tweet>, ApiError> {
    let tweet_id = parse_id(&tweet_id, "Tweet")?;
    let content = require_content(body, "Updated content is required")?;

    let tweet = state
        .store
        .find_tweet_by_id(tweet_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tweet not found"))?;
    let owner = ensure_owner(&tweet, actor.map(|Extension(a)| a), "update")?;

    // Deleted between the read and the write.
    let updated = state
        .store
        .update_tweet_content(tweet_id, owner, &content)
        .await?
        .ok_or_else(|| ApiError::not_found("Tweet not found"))?;

    info!("Tweet {} updated by {}", tweet_id, owner);
    Ok(ApiResponse::ok(updated, "Tweet updated successfully"))
}

/// Handles `DELETE /api/v1/tweets/:tweet_id`.
///
/// # Errors
///
/// - 404 if the tweet does not exist (a malformed id cannot exist)
/// - 403 if the actor is not the owner
pub async fn delete_tweet(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Path(tweet_id): Path<String>,
) -> Result<ApiResponse<Map<String, Value>>, ApiError> {
    let tweet_id =
        Uuid::parse_str(&tweet_id).map_err(|_| ApiError::not_found("Tweet not found"))?;

    let tweet = state
        .store
        .find_tweet_by_id(tweet_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tweet not found"))?;
    let owner = ensure_owner(&tweet, actor.map(|Extension(a)| a), "delete")?;

    if !state.store.delete_tweet_by_id(tweet_id, owner).await? {
        return Err(ApiError::not_found("Tweet not found"));
    }

    info!("Tweet {} deleted by {}", tweet_id, owner);
    Ok(ApiResponse::ok(Map::new(), "Tweet deleted successfully"))
}
