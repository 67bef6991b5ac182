//! Database repository for enrollments.

use crate::db::{
    errors::Result,
    models::enrollments::{EnrolledCourseDBResponse, EnrollmentDBResponse},
};
use crate::types::{CourseId, UserId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Enrollments<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Enrollments<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Enroll the user in the course, returning the existing enrollment if there already is one.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn enroll(&mut self, user_id: UserId, course_id: CourseId) -> Result<EnrollmentDBResponse> {
        sqlx::query(
            r#"
            INSERT INTO enrollments (course_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT ON CONSTRAINT enrollments_user_course_unique DO NOTHING
            "#,
        )
        .bind(course_id)
        .bind(user_id)
        .execute(&mut *self.db)
        .await?;

        let enrollment = sqlx::query_as::<_, EnrollmentDBResponse>(
            "SELECT * FROM enrollments WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(enrollment)
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn get(&mut self, user_id: UserId, course_id: CourseId) -> Result<Option<EnrollmentDBResponse>> {
        let enrollment = sqlx::query_as::<_, EnrollmentDBResponse>(
            "SELECT * FROM enrollments WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(enrollment)
    }

    /// Atomically add XP to the user's enrollment in a course.
    ///
    /// Returns false when the user is not enrolled; nothing is written in that case.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn add_xp(&mut self, user_id: UserId, course_id: CourseId, amount: i32) -> Result<bool> {
        let result = sqlx::query("UPDATE enrollments SET xp_earned = xp_earned + $3 WHERE user_id = $1 AND course_id = $2")
            .bind(user_id)
            .bind(course_id)
            .bind(amount)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Courses the user is enrolled in with exercise totals and completion counts, newest first.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn list_enrolled_courses(&mut self, user_id: UserId) -> Result<Vec<EnrolledCourseDBResponse>> {
        let courses = sqlx::query_as::<_, EnrolledCourseDBResponse>(
            r#"
            SELECT
                c.course_id,
                c.title,
                c.description,
                c.banner_image,
                c.level,
                c.tags,
                c.editor_type,
                e.enrolled_at,
                e.xp_earned,
                COALESCE(ch.total_exercises, 0)::BIGINT AS total_exercises,
                COALESCE(done.completed_exercises, 0)::BIGINT AS completed_exercises
            FROM enrollments e
            JOIN courses c ON c.course_id = e.course_id
            LEFT JOIN (
                SELECT
                    course_id,
                    SUM(CASE WHEN jsonb_typeof(exercises) = 'array' THEN jsonb_array_length(exercises) ELSE 0 END)
                        AS total_exercises
                FROM course_chapters
                GROUP BY course_id
            ) ch ON ch.course_id = e.course_id
            LEFT JOIN (
                SELECT course_id, COUNT(*) AS completed_exercises
                FROM completed_exercises
                WHERE user_id = $1
                GROUP BY course_id
            ) done ON done.course_id = e.course_id
            WHERE e.user_id = $1
            ORDER BY e.enrolled_at DESC, c.course_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(courses)
    }
}
