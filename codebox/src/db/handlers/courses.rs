//! Database repository for the course catalog.
//!
//! Courses are addressed by their public `course_id`, never by the internal row id.

use crate::db::{
    errors::Result,
    models::courses::{
        ChapterCreateDBRequest, ChapterDBResponse, CourseCreateDBRequest, CourseDBResponse, ExerciseCreateDBRequest,
        ExerciseDBResponse,
    },
};
use crate::types::{ChapterId, CourseId};
use sqlx::{PgConnection, types::Json};
use tracing::instrument;

pub struct Courses<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Courses<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(course_id = request.course_id), err)]
    pub async fn create(&mut self, request: &CourseCreateDBRequest) -> Result<CourseDBResponse> {
        let course = sqlx::query_as::<_, CourseDBResponse>(
            r#"
            INSERT INTO courses (course_id, title, description, banner_image, level, tags, editor_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(request.course_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.banner_image)
        .bind(&request.level)
        .bind(&request.tags)
        .bind(&request.editor_type)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(course)
    }

    /// All courses in catalog order.
    #[instrument(skip(self), err)]
    pub async fn list(&mut self) -> Result<Vec<CourseDBResponse>> {
        let courses = sqlx::query_as::<_, CourseDBResponse>("SELECT * FROM courses ORDER BY id")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(courses)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, course_id: CourseId) -> Result<Option<CourseDBResponse>> {
        let course = sqlx::query_as::<_, CourseDBResponse>("SELECT * FROM courses WHERE course_id = $1")
            .bind(course_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(course)
    }

    #[instrument(skip(self, request), fields(course_id = request.course_id, chapter_id = request.chapter_id), err)]
    pub async fn create_chapter(&mut self, request: &ChapterCreateDBRequest) -> Result<ChapterDBResponse> {
        let chapter = sqlx::query_as::<_, ChapterDBResponse>(
            r#"
            INSERT INTO course_chapters (course_id, chapter_id, name, description, exercises)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.course_id)
        .bind(request.chapter_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.exercises)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(chapter)
    }

    /// Chapters of a course ordered by chapter number.
    #[instrument(skip(self), err)]
    pub async fn list_chapters(&mut self, course_id: CourseId) -> Result<Vec<ChapterDBResponse>> {
        let chapters = sqlx::query_as::<_, ChapterDBResponse>(
            "SELECT * FROM course_chapters WHERE course_id = $1 ORDER BY chapter_id",
        )
        .bind(course_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(chapters)
    }

    #[instrument(skip(self), err)]
    pub async fn get_chapter(&mut self, course_id: CourseId, chapter_id: ChapterId) -> Result<Option<ChapterDBResponse>> {
        let chapter = sqlx::query_as::<_, ChapterDBResponse>(
            "SELECT * FROM course_chapters WHERE course_id = $1 AND chapter_id = $2",
        )
        .bind(course_id)
        .bind(chapter_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(chapter)
    }

    #[instrument(skip(self, request), fields(exercise_id = %request.exercise_id), err)]
    pub async fn create_exercise(&mut self, request: &ExerciseCreateDBRequest) -> Result<ExerciseDBResponse> {
        let exercise = sqlx::query_as::<_, ExerciseDBResponse>(
            r#"
            INSERT INTO exercises (course_id, chapter_id, exercise_id, exercise_name, exercise_content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.course_id)
        .bind(request.chapter_id)
        .bind(&request.exercise_id)
        .bind(&request.exercise_name)
        .bind(request.exercise_content.as_ref().map(Json))
        .fetch_one(&mut *self.db)
        .await?;

        Ok(exercise)
    }

    #[instrument(skip(self), err)]
    pub async fn get_exercise(
        &mut self,
        course_id: CourseId,
        chapter_id: ChapterId,
        exercise_id: &str,
    ) -> Result<Option<ExerciseDBResponse>> {
        let exercise = sqlx::query_as::<_, ExerciseDBResponse>(
            "SELECT * FROM exercises WHERE course_id = $1 AND chapter_id = $2 AND exercise_id = $3",
        )
        .bind(course_id)
        .bind(chapter_id)
        .bind(exercise_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(exercise)
    }
}
