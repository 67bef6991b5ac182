//! Database models for enrollments and exercise completions.

use crate::types::{ChapterId, CourseId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database response for an enrollment
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentDBResponse {
    pub id: i32,
    pub course_id: CourseId,
    pub user_id: UserId,
    pub enrolled_at: DateTime<Utc>,
    pub xp_earned: i32,
}

/// A course the user is enrolled in, with progress aggregates
#[derive(Debug, Clone, FromRow)]
pub struct EnrolledCourseDBResponse {
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub banner_image: String,
    pub level: String,
    pub tags: Option<String>,
    pub editor_type: Option<String>,
    pub enrolled_at: DateTime<Utc>,
    pub xp_earned: i32,
    /// Sum of exercise summaries across all chapters of the course
    pub total_exercises: i64,
    /// Completion rows the user has for the course
    pub completed_exercises: i64,
}

/// Database request for recording a completion
#[derive(Debug, Clone)]
pub struct CompletionCreateDBRequest {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub chapter_id: ChapterId,
    pub exercise_id: String,
}

/// Database response for a completed exercise
#[derive(Debug, Clone, FromRow)]
pub struct CompletedExerciseDBResponse {
    pub id: i32,
    pub course_id: CourseId,
    pub chapter_id: ChapterId,
    pub exercise_id: String,
    pub user_id: UserId,
    pub completed_at: DateTime<Utc>,
}
