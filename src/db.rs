//! PostgreSQL-backed tweet store.
//!
//! This module provides the [`TweetStore`] implementation used in production.
//! It reads the `users` and `likes` tables and owns reads and writes to the
//! `tweets` table. The timeline aggregation runs as a single query that joins
//! tweets to their owner and to a like count.

use async_trait::async_trait;
use log::{debug, info};
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::models::{NewTweet, OwnerSummary, Tweet, TweetWithOwner, User};
use crate::store::{StoreError, TweetStore};

/// Establishes a connection pool to the PostgreSQL database at `database_url`.
///
/// # Returns
///
/// - `Ok(PgPool)`: A connection pool to the database
/// - `Err(StoreError)`: If the connection fails
pub async fn get_db_pool(database_url: &str) -> Result<PgPool, StoreError> {
    info!("Connecting to PostgreSQL database");

    let pool = PgPool::connect(database_url).await?;
    info!("Successfully connected to PostgreSQL database");

    Ok(pool)
}

/// Creates the `users`, `tweets` and `likes` tables if they do not exist.
///
/// The user and like tables belong to other services; they are created here
/// only so a fresh database can serve timelines.
pub async fn create_schema(pool: &PgPool) -> Result<(), StoreError> {
    info!("Ensuring database schema exists");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            fullname TEXT NOT NULL,
            username TEXT NOT NULL UNIQUE,
            avatar TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tweets (
            id UUID PRIMARY KEY,
            content TEXT NOT NULL CHECK (content <> ''),
            owner UUID NOT NULL REFERENCES users (id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS tweets_owner_created_at ON tweets (owner, created_at DESC)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS likes (
            id UUID PRIMARY KEY,
            tweet UUID REFERENCES tweets (id) ON DELETE CASCADE,
            liked_by UUID NOT NULL REFERENCES users (id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS likes_tweet ON likes (tweet)")
        .execute(pool)
        .await?;

    info!("Database schema is ready");
    Ok(())
}

/// [`TweetStore`] over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgTweetStore {
    pool: PgPool,
}

impl PgTweetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn tweet_from_row(row: &PgRow) -> Result<Tweet, sqlx::Error> {
    Ok(Tweet {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        owner: row.try_get("owner")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl TweetStore for PgTweetStore {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        debug!("Querying database for user {}", id);

        let row = sqlx::query(
            r#"
            SELECT id, fullname, username, avatar
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(User {
                id: row.try_get("id")?,
                fullname: row.try_get("fullname")?,
                username: row.try_get("username")?,
                avatar: row.try_get("avatar")?,
            })),
            None => Ok(None),
        }
    }

    async fn find_tweet_by_id(&self, id: Uuid) -> Result<Option<Tweet>, StoreError> {
        debug!("Querying database for tweet {}", id);

        let row = sqlx::query(
            r#"
            SELECT id, content, owner, created_at, updated_at
            FROM tweets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(tweet_from_row).transpose()?)
    }

    async fn create_tweet(&self, tweet: NewTweet) -> Result<Option<Tweet>, StoreError> {
        info!("Storing new tweet for owner {}", tweet.owner);
        debug!("Tweet content length: {}", tweet.content.len());

        let row = sqlx::query(
            r#"
            INSERT INTO tweets (id, content, owner, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, content, owner, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&tweet.content)
        .bind(tweet.owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(tweet_from_row).transpose()?)
    }

    async fn user_tweets_with_likes(&self, owner: Uuid) -> Result<Vec<TweetWithOwner>, StoreError> {
        info!("Aggregating timeline for user {}", owner);

        let rows = sqlx::query(
            r#"
            SELECT t.id, t.content, t.created_at, t.updated_at,
                   u.id AS owner_id, u.fullname, u.username, u.avatar,
                   COUNT(l.id) AS likes_count
            FROM tweets t
            JOIN users u ON u.id = t.owner
            LEFT JOIN likes l ON l.tweet = t.id
            WHERE t.owner = $1
            GROUP BY t.id, u.id
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        let mut timeline = Vec::with_capacity(rows.len());
        for row in rows {
            timeline.push(TweetWithOwner {
                id: row.try_get("id")?,
                content: row.try_get("content")?,
                owner: OwnerSummary {
                    id: row.try_get("owner_id")?,
                    fullname: row.try_get("fullname")?,
                    username: row.try_get("username")?,
                    avatar: row.try_get("avatar")?,
                },
                likes_count: row.try_get("likes_count")?,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
            });
        }

        info!("Found {} tweets for user {}", timeline.len(), owner);
        Ok(timeline)
    }

    async fn update_tweet_content(
        &self,
        id: Uuid,
        owner: Uuid,
        content: &str,
    ) -> Result<Option<Tweet>, StoreError> {
        info!("Updating content of tweet {}", id);

        let row = sqlx::query(
            r#"
            UPDATE tweets
            SET content = $3, updated_at = NOW()
            WHERE id = $1 AND owner = $2
            RETURNING id, content, owner, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(tweet_from_row).transpose()?)
    }

    async fn delete_tweet_by_id(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        info!("Deleting tweet {}", id);

        let result = sqlx::query("DELETE FROM tweets WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
