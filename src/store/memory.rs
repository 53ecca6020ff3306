//! In-process store used when no database is configured, and by the tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TweetStore};
use crate::models::{Like, NewTweet, Tweet, TweetWithOwner, User};
use crate::pipeline;

#[derive(Debug, Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    tweets: HashMap<Uuid, Tweet>,
    likes: Vec<Like>,
}

/// Tweets, users and likes held in memory behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user.
    pub async fn insert_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id, user);
    }

    /// Adds a tweet with caller-chosen id and timestamps.
    pub async fn insert_tweet(&self, tweet: Tweet) {
        self.inner.write().await.tweets.insert(tweet.id, tweet);
    }

    pub async fn insert_like(&self, like: Like) {
        self.inner.write().await.likes.push(like);
    }

    pub async fn tweet_count(&self) -> usize {
        self.inner.read().await.tweets.len()
    }
}

#[async_trait]
impl TweetStore for MemoryStore {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_tweet_by_id(&self, id: Uuid) -> Result<Option<Tweet>, StoreError> {
        Ok(self.inner.read().await.tweets.get(&id).cloned())
    }

    async fn create_tweet(&self, tweet: NewTweet) -> Result<Option<Tweet>, StoreError> {
        let now = Utc::now();
        let record = Tweet {
            id: Uuid::new_v4(),
            content: tweet.content,
            owner: tweet.owner,
            created_at: now,
            updated_at: now,
        };
        debug!("Inserting tweet {} into memory store", record.id);
        self.inner
            .write()
            .await
            .tweets
            .insert(record.id, record.clone());
        Ok(Some(record))
    }

    async fn user_tweets_with_likes(&self, owner: Uuid) -> Result<Vec<TweetWithOwner>, StoreError> {
        let guard = self.inner.read().await;
        Ok(pipeline::user_timeline(
            owner,
            guard.tweets.values(),
            &guard.users,
            &guard.likes,
        ))
    }

    async fn update_tweet_content(
        &self,
        id: Uuid,
        owner: Uuid,
        content: &str,
    ) -> Result<Option<Tweet>, StoreError> {
        let mut guard = self.inner.write().await;
        match guard.tweets.get_mut(&id) {
            Some(tweet) if tweet.owner == owner => {
                tweet.content = content.to_string();
                tweet.updated_at = Utc::now();
                Ok(Some(tweet.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_tweet_by_id(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let mut guard = self.inner.write().await;
        let owned = guard.tweets.get(&id).is_some_and(|t| t.owner == owner);
        if owned {
            guard.tweets.remove(&id);
        }
        Ok(owned)
    }
}
