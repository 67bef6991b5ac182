//! Database models for per-user progress aggregates.

use sqlx::FromRow;

/// Raw counters behind the user statistics endpoint
#[derive(Debug, Clone, Default, FromRow)]
pub struct UserProgressDBResponse {
    pub total_xp: i32,
    pub courses_enrolled: i64,
    pub exercises_completed: i64,
    /// Enrolled courses with at least one completion
    pub courses_completed: i64,
    /// Completion rows among the user's seven most recent
    pub recent_completions: i64,
}
