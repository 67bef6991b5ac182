//! API request/response models for the community forum and profiles.

use super::pagination::Pagination;
use crate::db::models::community::{PostDBResponse, ReplyDBResponse};
use crate::db::models::profiles::{ProfileDBResponse, ProfileUpsertDBRequest};
use crate::errors::{Error, Result};
use crate::types::{PostId, ReplyId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;
use utoipa::{IntoParams, ToSchema};

/// Forum categories a post can be filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    General,
    Help,
    Showcase,
    Resources,
    Jobs,
}

impl PostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostCategory::General => "general",
            PostCategory::Help => "help",
            PostCategory::Showcase => "showcase",
            PostCategory::Resources => "resources",
            PostCategory::Jobs => "jobs",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "general" => Some(PostCategory::General),
            "help" => Some(PostCategory::Help),
            "showcase" => Some(PostCategory::Showcase),
            "resources" => Some(PostCategory::Resources),
            "jobs" => Some(PostCategory::Jobs),
            _ => None,
        }
    }
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters for listing posts
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListPostsQuery {
    /// Category to filter by; empty or `all` lists every category
    pub category: Option<String>,

    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,
}

impl ListPostsQuery {
    /// The category to filter on, if any.
    pub fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
    }
}

fn required(value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::bad_request("Missing required fields")),
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A validated post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: PostCategory,
    /// Tags joined with `,` exactly as sent; empty when there are none
    pub tags: String,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<NewPost> {
        let title = required(self.title.as_deref())?;
        let content = required(self.content.as_deref())?;
        let category = required(self.category.as_deref())?;
        let category =
            PostCategory::parse(&category).ok_or_else(|| Error::bad_request(format!("Invalid category: {category}")))?;

        let tags = self.tags.join(",");

        Ok(NewPost {
            title,
            content,
            category,
            tags,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReplyRequest {
    pub post_id: Option<PostId>,
    pub content: Option<String>,
}

impl CreateReplyRequest {
    pub fn validate(&self) -> Result<(PostId, String)> {
        let post_id = match self.post_id {
            Some(id) if id > 0 => id,
            Some(_) => return Err(Error::bad_request("postId must be a positive integer")),
            None => return Err(Error::bad_request("Missing required fields")),
        };
        Ok((post_id, required(self.content.as_deref())?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub category: String,
    /// Comma-joined tag list
    pub tags: String,
    pub likes: i32,
    pub replies: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Author's identity-provider user id
    pub user_id: String,
    pub user_display_name: Option<String>,
    pub user_avatar: Option<String>,
}

impl From<PostDBResponse> for PostResponse {
    fn from(db: PostDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            content: db.content,
            category: db.category,
            tags: db.tags,
            likes: db.likes,
            replies: db.replies,
            created_at: db.created_at,
            updated_at: db.updated_at,
            user_id: db.author_id,
            user_display_name: db.author_display_name,
            user_avatar: db.author_avatar,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: ReplyId,
    pub post_id: PostId,
    pub content: String,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    pub user_display_name: Option<String>,
    pub user_avatar: Option<String>,
}

impl From<ReplyDBResponse> for ReplyResponse {
    fn from(db: ReplyDBResponse) -> Self {
        Self {
            id: db.id,
            post_id: db.post_id,
            content: db.content,
            likes: db.likes,
            created_at: db.created_at,
            user_id: db.author_id,
            user_display_name: db.author_display_name,
            user_avatar: db.author_avatar,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    /// Newest first
    pub replies: Vec<ReplyResponse>,
}

/// Full replacement of the caller's community profile
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub website_url: Option<String>,
}

fn optional_text(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn optional_url(value: &Option<String>, field: &str) -> Result<Option<String>> {
    optional_text(value)
        .map(|raw| match Url::parse(&raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(raw),
            _ => Err(Error::bad_request(format!("{field} must be an http(s) URL"))),
        })
        .transpose()
}

impl ProfileRequest {
    /// Blank fields are cleared. Link fields must be absolute http(s) URLs.
    pub fn validate(&self) -> Result<ProfileUpsertDBRequest> {
        Ok(ProfileUpsertDBRequest {
            display_name: optional_text(&self.display_name),
            avatar: optional_url(&self.avatar, "avatar")?,
            bio: optional_text(&self.bio),
            location: optional_text(&self.location),
            github_url: optional_url(&self.github_url, "githubUrl")?,
            linkedin_url: optional_url(&self.linkedin_url, "linkedinUrl")?,
            website_url: optional_url(&self.website_url, "websiteUrl")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub website_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileDBResponse> for ProfileResponse {
    fn from(db: ProfileDBResponse) -> Self {
        Self {
            user_id: db.external_user_id,
            display_name: db.display_name,
            avatar: db.avatar,
            bio: db.bio,
            location: db.location,
            github_url: db.github_url,
            linkedin_url: db.linkedin_url,
            website_url: db.website_url,
            updated_at: db.updated_at,
        }
    }
}
