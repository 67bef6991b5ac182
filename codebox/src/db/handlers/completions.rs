//! Database repository for completed exercises.
//!
//! A row exists at most once per (user, course, chapter, exercise) and is what makes XP grants
//! idempotent.

use crate::db::{
    errors::Result,
    models::enrollments::{CompletedExerciseDBResponse, CompletionCreateDBRequest},
};
use crate::types::{CourseId, UserId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Completions<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Completions<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Record a completion.
    ///
    /// Returns `None` if the key was already completed. Concurrent callers racing on the same
    /// key are serialized by the unique constraint, so exactly one of them gets `Some`.
    #[instrument(
        skip(self, request),
        fields(user_id = %abbrev_uuid(&request.user_id), course_id = request.course_id, exercise_id = %request.exercise_id),
        err
    )]
    pub async fn record(&mut self, request: &CompletionCreateDBRequest) -> Result<Option<CompletedExerciseDBResponse>> {
        let completion = sqlx::query_as::<_, CompletedExerciseDBResponse>(
            r#"
            INSERT INTO completed_exercises (course_id, chapter_id, exercise_id, user_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT ON CONSTRAINT completed_exercises_key_unique DO NOTHING
            RETURNING *
            "#,
        )
        .bind(request.course_id)
        .bind(request.chapter_id)
        .bind(&request.exercise_id)
        .bind(request.user_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(completion)
    }

    /// The user's completions in a course, ordered by exercise id descending.
    ///
    /// Longer ids sort first, so numeric ids order by value ("10" before "9").
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn list_for_course(&mut self, user_id: UserId, course_id: CourseId) -> Result<Vec<CompletedExerciseDBResponse>> {
        let completions = sqlx::query_as::<_, CompletedExerciseDBResponse>(
            r#"
            SELECT * FROM completed_exercises
            WHERE user_id = $1 AND course_id = $2
            ORDER BY length(exercise_id) DESC, exercise_id DESC, chapter_id DESC
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(completions)
    }
}
