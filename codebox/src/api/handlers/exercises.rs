use crate::{
    AppState,
    api::models::exercises::{CompleteExerciseRequest, CompletionResponse, ExerciseRequest, ExerciseResponse},
    auth::Identity,
    db::{
        handlers::{Completions, Courses, Enrollments, Users},
        models::enrollments::CompletionCreateDBRequest,
    },
    errors::{Error, Result},
    types::{Resource, abbrev_uuid},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{debug, info};

/// Sandbox template used when a course does not name one
const DEFAULT_EDITOR_TYPE: &str = "static";

#[utoipa::path(
    post,
    path = "/exercise",
    tag = "exercises",
    summary = "Get an exercise",
    description = "Returns the chapter with its exercise list, the exercise content and the sandbox template for the course. No enrollment is required.",
    request_body = ExerciseRequest,
    responses(
        (status = 200, description = "Exercise for the playground", body = ExerciseResponse),
        (status = 400, description = "Missing required fields", body = crate::errors::ErrorBody),
        (status = 404, description = "Chapter or exercise not found", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_exercise(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ExerciseRequest>, JsonRejection>,
) -> Result<Json<ExerciseResponse>> {
    let Json(request) = payload?;
    let lookup = request.validate()?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Courses::new(&mut tx);

    let chapter = repo
        .get_chapter(lookup.course_id, lookup.chapter_id)
        .await?
        .ok_or_else(|| Error::not_found(Resource::Chapter))?;
    let exercise = repo
        .get_exercise(lookup.course_id, lookup.chapter_id, &lookup.exercise_id)
        .await?
        .ok_or_else(|| Error::not_found(Resource::Exercise))?;
    let editor_type = repo
        .get_by_id(lookup.course_id)
        .await?
        .and_then(|course| course.editor_type)
        .unwrap_or_else(|| DEFAULT_EDITOR_TYPE.to_string());

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(ExerciseResponse {
        chapter: chapter.into(),
        exercise: exercise.into(),
        editor_type,
    }))
}

#[utoipa::path(
    post,
    path = "/exercise/complete",
    tag = "exercises",
    summary = "Complete an exercise",
    description = "Grants `xpEarn` to the caller and to their enrollment in the course, once per (course, chapter, exercise). Repeating the call is a no-op that reports `alreadyCompleted`.",
    request_body = CompleteExerciseRequest,
    responses(
        (status = 200, description = "Completion recorded, or already recorded", body = CompletionResponse),
        (status = 400, description = "Missing required fields", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "Course not found", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody),
    ),
    security(("X-Codebox-User" = []))
)]
#[tracing::instrument(skip_all, fields(user = %identity.external_id))]
pub async fn complete_exercise(
    State(state): State<AppState>,
    identity: Identity,
    payload: std::result::Result<Json<CompleteExerciseRequest>, JsonRejection>,
) -> Result<Json<CompletionResponse>> {
    let Json(request) = payload?;
    let completion = request.validate()?;

    // Record, enrollment XP and user points commit together or not at all
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    if Courses::new(&mut tx).get_by_id(completion.course_id).await?.is_none() {
        return Err(Error::not_found(Resource::Course));
    }

    let user = Users::new(&mut tx).ensure(&identity.user_request()).await?;

    let recorded = Completions::new(&mut tx)
        .record(&CompletionCreateDBRequest {
            user_id: user.id,
            course_id: completion.course_id,
            chapter_id: completion.chapter_id,
            exercise_id: completion.exercise_id.clone(),
        })
        .await?;

    if recorded.is_none() {
        tx.commit().await.map_err(|e| Error::Database(e.into()))?;
        debug!(exercise_id = %completion.exercise_id, "Exercise already completed");
        return Ok(Json(CompletionResponse::already_completed()));
    }

    let enrolled = Enrollments::new(&mut tx)
        .add_xp(user.id, completion.course_id, completion.xp_earn)
        .await?;
    let points = Users::new(&mut tx).add_points(user.id, completion.xp_earn).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    info!(
        user_id = %abbrev_uuid(&user.id),
        course_id = completion.course_id,
        exercise_id = %completion.exercise_id,
        xp = completion.xp_earn,
        points,
        enrolled,
        "Exercise completed"
    );
    Ok(Json(CompletionResponse::completed()))
}
