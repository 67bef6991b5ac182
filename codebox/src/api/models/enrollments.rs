//! API request/response models for enrollments.

use crate::db::models::enrollments::EnrollmentDBResponse;
use crate::errors::{Error, Result};
use crate::types::{CourseId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub course_id: Option<CourseId>,
}

impl EnrollRequest {
    pub fn course_id(&self) -> Result<CourseId> {
        match self.course_id {
            Some(id) if id > 0 => Ok(id),
            Some(_) => Err(Error::bad_request("courseId must be a positive integer")),
            None => Err(Error::bad_request("Course ID required")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: i32,
    pub course_id: CourseId,
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
    pub enrolled_at: DateTime<Utc>,
    /// XP earned inside this course
    pub xp_earned: i32,
}

impl From<EnrollmentDBResponse> for EnrollmentResponse {
    fn from(db: EnrollmentDBResponse) -> Self {
        Self {
            id: db.id,
            course_id: db.course_id,
            user_id: db.user_id,
            enrolled_at: db.enrolled_at,
            xp_earned: db.xp_earned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_id_required() {
        assert_eq!(EnrollRequest::default().course_id().unwrap_err().user_message(), "Course ID required");
        assert_eq!(EnrollRequest { course_id: Some(7) }.course_id().unwrap(), 7);
        assert!(EnrollRequest { course_id: Some(-1) }.course_id().is_err());
    }
}
