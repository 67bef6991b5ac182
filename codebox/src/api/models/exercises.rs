//! API request/response models for exercise delivery and completion.

use super::courses::ChapterResponse;
use crate::db::models::courses::ExerciseDBResponse;
use crate::errors::{Error, Result};
use crate::types::{ChapterId, CourseId, ExerciseKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Rich exercise content stored as JSONB.
///
/// Every field is optional so partially authored exercises still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseContent {
    /// Instructional text (markdown or HTML)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// XP cost of revealing the hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_xp: Option<i32>,
    /// Sandbox files keyed by path, e.g. `/index.html`
    #[serde(default)]
    pub starter_code: BTreeMap<String, StarterFile>,
    /// Expected output shown after completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// XP granted on completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<i32>,
}

/// One sandbox file: either bare source or a file object with editor flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StarterFile {
    Source(String),
    #[serde(rename_all = "camelCase")]
    File {
        code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hidden: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        active: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        read_only: Option<bool>,
    },
}

impl StarterFile {
    pub fn code(&self) -> &str {
        match self {
            StarterFile::Source(code) => code,
            StarterFile::File { code, .. } => code,
        }
    }
}

/// Require a positive identifier; zero or absent counts as missing.
pub(crate) fn positive(value: Option<i32>, field: &str) -> Result<i32> {
    match value {
        None | Some(0) => Err(Error::bad_request("Missing required fields")),
        Some(v) if v < 0 => Err(Error::bad_request(format!("{field} must be a positive integer"))),
        Some(v) => Ok(v),
    }
}

fn exercise_key(value: Option<&ExerciseKey>) -> Result<String> {
    value
        .and_then(ExerciseKey::normalized)
        .ok_or_else(|| Error::bad_request("Missing required fields"))
}

/// Request body for fetching an exercise
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRequest {
    pub course_id: Option<CourseId>,
    pub chapter_id: Option<ChapterId>,
    pub exercise_id: Option<ExerciseKey>,
}

/// A validated exercise lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseLookup {
    pub course_id: CourseId,
    pub chapter_id: ChapterId,
    pub exercise_id: String,
}

impl ExerciseRequest {
    pub fn validate(&self) -> Result<ExerciseLookup> {
        Ok(ExerciseLookup {
            course_id: positive(self.course_id, "courseId")?,
            chapter_id: positive(self.chapter_id, "chapterId")?,
            exercise_id: exercise_key(self.exercise_id.as_ref())?,
        })
    }
}

/// An exercise with its content
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDetailResponse {
    pub id: i32,
    pub course_id: CourseId,
    pub chapter_id: ChapterId,
    pub exercise_id: String,
    pub exercise_name: String,
    pub exercise_content: Option<ExerciseContent>,
}

impl From<ExerciseDBResponse> for ExerciseDetailResponse {
    fn from(db: ExerciseDBResponse) -> Self {
        Self {
            id: db.id,
            course_id: db.course_id,
            chapter_id: db.chapter_id,
            exercise_id: db.exercise_id,
            exercise_name: db.exercise_name,
            exercise_content: db.exercise_content.map(|json| json.0),
        }
    }
}

/// Everything the playground needs to render an exercise
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResponse {
    pub chapter: ChapterResponse,
    pub exercise: ExerciseDetailResponse,
    /// Sandbox template, `static` unless the course says otherwise
    pub editor_type: String,
}

/// Request body for completing an exercise
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteExerciseRequest {
    pub course_id: Option<CourseId>,
    pub chapter_id: Option<ChapterId>,
    pub exercise_id: Option<ExerciseKey>,
    pub xp_earn: Option<i32>,
}

/// A validated completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseCompletion {
    pub course_id: CourseId,
    pub chapter_id: ChapterId,
    pub exercise_id: String,
    pub xp_earn: i32,
}

impl CompleteExerciseRequest {
    pub fn validate(&self) -> Result<ExerciseCompletion> {
        Ok(ExerciseCompletion {
            course_id: positive(self.course_id, "courseId")?,
            chapter_id: positive(self.chapter_id, "chapterId")?,
            exercise_id: exercise_key(self.exercise_id.as_ref())?,
            xp_earn: positive(self.xp_earn, "xpEarn")?,
        })
    }
}

/// Result of a completion attempt
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    /// True only when this call recorded the completion and granted XP
    pub success: bool,
    pub already_completed: bool,
    pub message: String,
}

impl CompletionResponse {
    pub fn completed() -> Self {
        Self {
            success: true,
            already_completed: false,
            message: "Exercise completed!".to_string(),
        }
    }

    pub fn already_completed() -> Self {
        Self {
            success: false,
            already_completed: true,
            message: "Already completed".to_string(),
        }
    }
}
