//! Records exchanged between the handlers, the store and the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: Uuid,
    pub content: String,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a tweet. The store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewTweet {
    pub content: String,
    pub owner: Uuid,
}

/// A user account. Owned by the user service; only read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    pub username: String,
    pub avatar: String,
}

/// A like on a tweet. Only counted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: Uuid,
    pub tweet: Uuid,
    pub liked_by: Uuid,
}

/// The display projection of a tweet's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub fullname: String,
    pub username: String,
    pub avatar: String,
}

impl From<&User> for OwnerSummary {
    fn from(user: &User) -> Self {
        OwnerSummary {
            id: user.id,
            fullname: user.fullname.clone(),
            username: user.username.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// One row of a user's timeline: the tweet, its owner and its like count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetWithOwner {
    pub id: Uuid,
    pub content: String,
    pub owner: OwnerSummary,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for create and update.
#[derive(Debug, Default, Deserialize)]
pub struct ContentBody {
    #[serde(default)]
    pub content: Option<String>,
}
