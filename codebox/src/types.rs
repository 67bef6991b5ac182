//! Common type definitions.
//!
//! This module defines:
//! - Type aliases for entity IDs (UserId, CourseId, etc.)
//! - The [`Resource`] enum used to name what a not-found error refers to
//! - The [`ExerciseKey`] wire type for exercise identifiers
//!
//! # ID Types
//!
//! Users are keyed by UUID. Catalog entities use the integer identifiers that appear in
//! course URLs, and community entities use database sequences:
//!
//! - [`UserId`]: internal user account identifier
//! - [`CourseId`]: public course identifier (`courses.course_id`, not the row id)
//! - [`ChapterId`]: chapter number within a course
//! - [`PostId`] / [`ReplyId`]: community forum entities
//!
//! # Utility Functions
//!
//! - [`abbrev_uuid`]: Abbreviate UUIDs to first 8 chars for logging

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

// Type aliases for IDs
pub type UserId = Uuid;
pub type CourseId = i32;
pub type ChapterId = i32;
pub type PostId = i64;
pub type ReplyId = i64;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

/// Entities that can be reported as missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Course,
    Chapter,
    Exercise,
    Post,
    User,
    Profile,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Course => "Course",
            Resource::Chapter => "Chapter",
            Resource::Exercise => "Exercise",
            Resource::Post => "Post",
            Resource::User => "User",
            Resource::Profile => "Profile",
        };
        f.write_str(name)
    }
}

/// An exercise identifier as sent by clients.
///
/// Older clients send numeric exercise ids, newer ones send the slug. Both are stored as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ExerciseKey {
    Number(i64),
    Slug(String),
}

impl ExerciseKey {
    /// Canonical text form stored in `completed_exercises.exercise_id`.
    ///
    /// Returns `None` for a blank slug.
    pub fn normalized(&self) -> Option<String> {
        match self {
            ExerciseKey::Number(n) => Some(n.to_string()),
            ExerciseKey::Slug(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
            }
        }
    }
}
