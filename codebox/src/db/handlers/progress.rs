//! Aggregate queries behind the user statistics endpoint.

use crate::db::{errors::Result, models::progress::UserProgressDBResponse};
use crate::types::{UserId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

/// Number of most recent completions considered for the day streak
pub const RECENT_COMPLETION_WINDOW: i64 = 7;

pub struct Progress<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Progress<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Gather every counter for one user in a single round trip. `None` if the user is unknown.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&user_id)), err)]
    pub async fn for_user(&mut self, user_id: UserId) -> Result<Option<UserProgressDBResponse>> {
        let progress = sqlx::query_as::<_, UserProgressDBResponse>(
            r#"
            SELECT
                u.points AS total_xp,
                (SELECT COUNT(*) FROM enrollments e WHERE e.user_id = u.id) AS courses_enrolled,
                (SELECT COUNT(*) FROM completed_exercises ce WHERE ce.user_id = u.id) AS exercises_completed,
                (
                    SELECT COUNT(*) FROM (
                        SELECT e.course_id
                        FROM enrollments e
                        LEFT JOIN completed_exercises ce
                            ON ce.course_id = e.course_id AND ce.user_id = e.user_id
                        WHERE e.user_id = u.id
                        GROUP BY e.course_id
                        HAVING COUNT(ce.id) > 0
                    ) started
                ) AS courses_completed,
                (
                    SELECT COUNT(*) FROM (
                        SELECT ce.id
                        FROM completed_exercises ce
                        WHERE ce.user_id = u.id
                        ORDER BY ce.completed_at DESC
                        LIMIT $2
                    ) recent
                ) AS recent_completions
            FROM users u
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .bind(RECENT_COMPLETION_WINDOW)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::{Completions, Enrollments, Users};
    use crate::db::models::enrollments::CompletionCreateDBRequest;
    use crate::test_utils::{create_test_course, create_test_user};
    use sqlx::PgPool;
    use uuid::Uuid;

    #[sqlx::test]
    #[test_log::test]
    async fn test_unknown_user_has_no_progress(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        assert!(Progress::new(&mut conn).for_user(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_new_user_has_zero_progress(pool: PgPool) {
        let user = create_test_user(&pool, "user_1").await;

        let mut conn = pool.acquire().await.unwrap();
        let progress = Progress::new(&mut conn).for_user(user.id).await.unwrap().unwrap();

        assert_eq!(progress.total_xp, 0);
        assert_eq!(progress.courses_enrolled, 0);
        assert_eq!(progress.exercises_completed, 0);
        assert_eq!(progress.courses_completed, 0);
        assert_eq!(progress.recent_completions, 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_progress_counters(pool: PgPool) {
        let user = create_test_user(&pool, "user_1").await;
        for course_id in [101, 102, 103] {
            create_test_course(&pool, course_id).await;
        }

        let mut conn = pool.acquire().await.unwrap();
        for course_id in [101, 102] {
            Enrollments::new(&mut conn).enroll(user.id, course_id).await.unwrap();
        }

        // Nine completions in course 101, one in the never-enrolled course 103
        let keys = (1..=9).map(|n| (101, n.to_string())).chain([(103, "1".to_string())]);
        for (course_id, exercise_id) in keys {
            Completions::new(&mut conn)
                .record(&CompletionCreateDBRequest {
                    user_id: user.id,
                    course_id,
                    chapter_id: 1,
                    exercise_id,
                })
                .await
                .unwrap();
        }
        Users::new(&mut conn).add_points(user.id, 100).await.unwrap();

        let progress = Progress::new(&mut conn).for_user(user.id).await.unwrap().unwrap();

        assert_eq!(progress.total_xp, 100);
        assert_eq!(progress.courses_enrolled, 2);
        assert_eq!(progress.exercises_completed, 10);
        // Only enrolled courses with at least one completion count
        assert_eq!(progress.courses_completed, 1);
        assert_eq!(progress.recent_completions, RECENT_COMPLETION_WINDOW);
    }
}
