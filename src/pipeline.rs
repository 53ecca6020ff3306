//! Timeline aggregation as explicit stages.
//!
//! A user's timeline is built in six steps: keep the tweets the user owns,
//! join each to its owner (projected to the display fields), join the likes
//! and count them, sort newest first, then flatten the owner join from a list
//! to a single object. Tweets whose owner does not resolve are dropped at the
//! flatten step, so every emitted row carries exactly one owner.
//!
//! The in-memory store runs these stages directly. The PostgreSQL store
//! expresses the same thing as one query.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{Like, OwnerSummary, Tweet, TweetWithOwner, User};

/// Intermediate row carried between stages.
#[derive(Debug, Clone)]
pub struct Staged {
    pub tweet: Tweet,
    pub owner: Vec<OwnerSummary>,
    pub likes_count: i64,
}

/// Keeps tweets owned by `owner`.
pub fn match_owner<'a, I>(tweets: I, owner: Uuid) -> Vec<Staged>
where
    I: IntoIterator<Item = &'a Tweet>,
{
    tweets
        .into_iter()
        .filter(|tweet| tweet.owner == owner)
        .map(|tweet| Staged {
            tweet: tweet.clone(),
            owner: Vec::new(),
            likes_count: 0,
        })
        .collect()
}

/// Joins each row to the users whose id equals its owner, keeping only the
/// display projection.
pub fn lookup_owner(rows: Vec<Staged>, users: &HashMap<Uuid, User>) -> Vec<Staged> {
    rows.into_iter()
        .map(|mut row| {
            row.owner = users
                .get(&row.tweet.owner)
                .map(OwnerSummary::from)
                .into_iter()
                .collect();
            row
        })
        .collect()
}

/// Sets `likes_count` to the number of likes referencing each tweet.
pub fn count_likes(rows: Vec<Staged>, likes: &[Like]) -> Vec<Staged> {
    let mut per_tweet: HashMap<Uuid, i64> = HashMap::new();
    for like in likes {
        *per_tweet.entry(like.tweet).or_insert(0) += 1;
    }

    rows.into_iter()
        .map(|mut row| {
            row.likes_count = per_tweet.get(&row.tweet.id).copied().unwrap_or(0);
            row
        })
        .collect()
}

/// Orders rows by creation time, newest first.
pub fn sort_newest_first(mut rows: Vec<Staged>) -> Vec<Staged> {
    rows.sort_by(|a, b| b.tweet.created_at.cmp(&a.tweet.created_at));
    rows
}

/// Emits one output row per joined owner; rows without an owner vanish.
pub fn unwind_owner(rows: Vec<Staged>) -> Vec<TweetWithOwner> {
    rows.into_iter()
        .flat_map(|row| {
            let Staged {
                tweet,
                owner,
                likes_count,
            } = row;
            owner.into_iter().map(move |owner| TweetWithOwner {
                id: tweet.id,
                content: tweet.content.clone(),
                owner,
                likes_count,
                created_at: tweet.created_at,
                updated_at: tweet.updated_at,
            })
        })
        .collect()
}

/// Runs the full timeline aggregation for `owner`.
pub fn user_timeline<'a, I>(
    owner: Uuid,
    tweets: I,
    users: &HashMap<Uuid, User>,
    likes: &[Like],
) -> Vec<TweetWithOwner>
where
    I: IntoIterator<Item = &'a Tweet>,
{
    let rows = match_owner(tweets, owner);
    let rows = lookup_owner(rows, users);
    let rows = count_likes(rows, likes);
    let rows = sort_newest_first(rows);
    unwind_owner(rows)
}
