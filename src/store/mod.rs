//! Storage seam for tweets, users and likes.
//!
//! Handlers only see [`TweetStore`]. The PostgreSQL implementation lives in
//! [`crate::db`]; [`memory::MemoryStore`] backs development runs without a
//! database and the test suite.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewTweet, Tweet, TweetWithOwner, User};

pub mod memory;

pub use memory::MemoryStore;

/// Errors raised by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Operations the tweet handlers perform against persistence.
#[async_trait]
pub trait TweetStore: Send + Sync {
    /// Looks up a user by id.
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Looks up a tweet by id.
    async fn find_tweet_by_id(&self, id: Uuid) -> Result<Option<Tweet>, StoreError>;

    /// Inserts a tweet. `Ok(None)` means the store accepted the call but
    /// reported no created record.
    async fn create_tweet(&self, tweet: NewTweet) -> Result<Option<Tweet>, StoreError>;

    /// Returns `owner`'s tweets joined to the owner's display projection and
    /// their like counts, newest first.
    async fn user_tweets_with_likes(&self, owner: Uuid) -> Result<Vec<TweetWithOwner>, StoreError>;

    /// Replaces the content of tweet `id` if it is still owned by `owner`.
    /// Only `content` and `updated_at` change. `Ok(None)` if no such tweet.
    async fn update_tweet_content(
        &self,
        id: Uuid,
        owner: Uuid,
        content: &str,
    ) -> Result<Option<Tweet>, StoreError>;

    /// Deletes tweet `id` if it is still owned by `owner`. Returns whether a
    /// record was removed.
    async fn delete_tweet_by_id(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError>;
}
