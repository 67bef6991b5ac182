//! Database models for community profiles.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for creating or replacing a profile
#[derive(Debug, Clone, Default)]
pub struct ProfileUpsertDBRequest {
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub website_url: Option<String>,
}

/// Database response for a profile
#[derive(Debug, Clone, FromRow)]
pub struct ProfileDBResponse {
    pub external_user_id: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub website_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
