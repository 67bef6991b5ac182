//! Database models for the course catalog: courses, chapters and exercises.

use crate::api::models::exercises::ExerciseContent;
use crate::types::{ChapterId, CourseId};
use serde_json::Value;
use sqlx::{FromRow, types::Json};

/// Database request for creating a course
#[derive(Debug, Clone)]
pub struct CourseCreateDBRequest {
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub banner_image: String,
    pub level: String,
    pub tags: Option<String>,
    pub editor_type: Option<String>,
}

/// Database response for a course
#[derive(Debug, Clone, FromRow)]
pub struct CourseDBResponse {
    pub id: i32,
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub banner_image: String,
    pub level: String,
    pub tags: Option<String>,
    pub editor_type: Option<String>,
}

/// Database request for creating a chapter
#[derive(Debug, Clone)]
pub struct ChapterCreateDBRequest {
    pub course_id: CourseId,
    pub chapter_id: ChapterId,
    pub name: String,
    pub description: Option<String>,
    /// Ordered exercise summaries, stored as-is
    pub exercises: Option<Value>,
}

/// Database response for a chapter
#[derive(Debug, Clone, FromRow)]
pub struct ChapterDBResponse {
    pub id: i32,
    pub course_id: CourseId,
    pub chapter_id: ChapterId,
    pub name: String,
    pub description: Option<String>,
    pub exercises: Option<Value>,
}

/// Database request for creating an exercise
#[derive(Debug, Clone)]
pub struct ExerciseCreateDBRequest {
    pub course_id: CourseId,
    pub chapter_id: ChapterId,
    pub exercise_id: String,
    pub exercise_name: String,
    pub exercise_content: Option<ExerciseContent>,
}

/// Database response for an exercise
#[derive(Debug, Clone, FromRow)]
pub struct ExerciseDBResponse {
    pub id: i32,
    pub course_id: CourseId,
    pub chapter_id: ChapterId,
    pub exercise_id: String,
    pub exercise_name: String,
    pub exercise_content: Option<Json<ExerciseContent>>,
}
