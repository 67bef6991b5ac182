//! API request/response models for the course catalog.

use super::enrollments::EnrollmentResponse;
use crate::db::models::courses::{ChapterDBResponse, CourseDBResponse};
use crate::db::models::enrollments::{CompletedExerciseDBResponse, EnrolledCourseDBResponse};
use crate::types::{ChapterId, CourseId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    /// Internal row id
    pub id: i32,
    /// Public course identifier used in URLs
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub banner_image: String,
    pub level: String,
    pub tags: Option<String>,
    pub editor_type: Option<String>,
}

impl From<CourseDBResponse> for CourseResponse {
    fn from(db: CourseDBResponse) -> Self {
        Self {
            id: db.id,
            course_id: db.course_id,
            title: db.title,
            description: db.description,
            banner_image: db.banner_image,
            level: db.level,
            tags: db.tags,
            editor_type: db.editor_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChapterResponse {
    pub id: i32,
    pub course_id: CourseId,
    pub chapter_id: ChapterId,
    pub name: String,
    pub description: Option<String>,
    /// Exercise summaries (name, slug, xp, difficulty) in display order
    #[schema(value_type = Vec<Object>)]
    pub exercises: Value,
}

impl From<ChapterDBResponse> for ChapterResponse {
    fn from(db: ChapterDBResponse) -> Self {
        Self {
            id: db.id,
            course_id: db.course_id,
            chapter_id: db.chapter_id,
            name: db.name,
            description: db.description,
            exercises: db.exercises.unwrap_or_else(|| Value::Array(Vec::new())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletedExerciseResponse {
    pub id: i32,
    pub course_id: CourseId,
    pub chapter_id: ChapterId,
    pub exercise_id: String,
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
    pub completed_at: DateTime<Utc>,
}

impl From<CompletedExerciseDBResponse> for CompletedExerciseResponse {
    fn from(db: CompletedExerciseDBResponse) -> Self {
        Self {
            id: db.id,
            course_id: db.course_id,
            chapter_id: db.chapter_id,
            exercise_id: db.exercise_id,
            user_id: db.user_id,
            completed_at: db.completed_at,
        }
    }
}

/// Course page payload.
///
/// Anonymous callers get `userEnroll: false`, no enrollment and an empty completion list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailResponse {
    pub course: CourseResponse,
    pub chapters: Vec<ChapterResponse>,
    pub user_enroll: bool,
    pub course_enroll_info: Option<EnrollmentResponse>,
    /// Ordered by exercise id descending
    pub completed_exercises: Vec<CompletedExerciseResponse>,
}

/// A course the caller is enrolled in, with progress counters
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourseResponse {
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub banner_image: String,
    pub level: String,
    pub tags: Option<String>,
    pub editor_type: Option<String>,
    pub enrolled_at: DateTime<Utc>,
    pub total_exercises: i64,
    pub completed_exercises: i64,
    pub xp_earned: i32,
}

impl From<EnrolledCourseDBResponse> for EnrolledCourseResponse {
    fn from(db: EnrolledCourseDBResponse) -> Self {
        Self {
            course_id: db.course_id,
            title: db.title,
            description: db.description,
            banner_image: db.banner_image,
            level: db.level,
            tags: db.tags,
            editor_type: db.editor_type,
            enrolled_at: db.enrolled_at,
            total_exercises: db.total_exercises,
            completed_exercises: db.completed_exercises,
            xp_earned: db.xp_earned,
        }
    }
}
