//! Database models for community posts and replies.

use crate::types::{PostId, ReplyId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for creating a post
#[derive(Debug, Clone)]
pub struct PostCreateDBRequest {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub category: String,
    /// Comma-joined tag list
    pub tags: String,
}

/// Database response for a post, joined with its author
#[derive(Debug, Clone, FromRow)]
pub struct PostDBResponse {
    pub id: PostId,
    /// Provider-issued id of the author
    pub author_id: String,
    pub author_display_name: Option<String>,
    pub author_avatar: Option<String>,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: String,
    pub likes: i32,
    pub replies: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database request for creating a reply
#[derive(Debug, Clone)]
pub struct ReplyCreateDBRequest {
    pub post_id: PostId,
    pub user_id: UserId,
    pub content: String,
}

/// Database response for a reply, joined with its author
#[derive(Debug, Clone, FromRow)]
pub struct ReplyDBResponse {
    pub id: ReplyId,
    pub post_id: PostId,
    pub author_id: String,
    pub author_display_name: Option<String>,
    pub author_avatar: Option<String>,
    pub content: String,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
}
