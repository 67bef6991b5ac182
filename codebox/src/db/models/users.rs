//! Database models for users.

use crate::types::UserId;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for creating a user from a verified identity
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub external_user_id: String,
    pub email: String,
    pub name: Option<String>,
}

/// Database response for a user
#[derive(Debug, Clone, FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub external_user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub points: i32,
    pub subscription: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
