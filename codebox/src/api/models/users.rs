//! API request/response models for the current user.

use crate::db::models::{progress::UserProgressDBResponse, users::UserDBResponse};
use crate::progress::{Achievements, day_streak};
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    /// Identity-provider user id
    pub external_user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub points: i32,
    pub subscription: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            external_user_id: db.external_user_id,
            email: db.email,
            name: db.name,
            points: db.points,
            subscription: db.subscription,
            created_at: db.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgress {
    pub courses_enrolled: i64,
    pub exercises_completed: i64,
    /// Enrolled courses with at least one completed exercise
    pub courses_completed: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    #[serde(rename = "totalXP")]
    pub total_xp: i32,
    pub badges: u32,
    pub day_streak: u32,
    pub learning_progress: LearningProgress,
    pub achievements: Achievements,
}

impl From<UserProgressDBResponse> for UserStatsResponse {
    fn from(db: UserProgressDBResponse) -> Self {
        let achievements = Achievements::evaluate(db.total_xp, db.courses_enrolled, db.exercises_completed);
        Self {
            total_xp: db.total_xp,
            badges: achievements.badges(),
            day_streak: day_streak(db.recent_completions),
            learning_progress: LearningProgress {
                courses_enrolled: db.courses_enrolled,
                exercises_completed: db.exercises_completed,
                courses_completed: db.courses_completed,
            },
            achievements,
        }
    }
}
