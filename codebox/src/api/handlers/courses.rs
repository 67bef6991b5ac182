use crate::{
    AppState,
    api::models::{
        courses::{CompletedExerciseResponse, CourseDetailResponse, CourseResponse, EnrolledCourseResponse},
        enrollments::EnrollmentResponse,
    },
    auth::Identity,
    db::handlers::{Completions, Courses, Enrollments, Users},
    errors::{Error, Result},
    types::{CourseId, Resource},
};
use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

#[utoipa::path(
    get,
    path = "/courses",
    tag = "courses",
    summary = "List courses",
    responses(
        (status = 200, description = "Every course in the catalog", body = Vec<CourseResponse>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<CourseResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let courses = Courses::new(&mut conn).list().await?;

    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/courses/enrolled",
    tag = "courses",
    summary = "List the caller's enrolled courses",
    description = "Most recently enrolled first, with exercise totals and completion counts per course.",
    responses(
        (status = 200, description = "Enrolled courses with progress", body = Vec<EnrolledCourseResponse>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody),
    ),
    security(("X-Codebox-User" = []))
)]
#[tracing::instrument(skip_all, fields(user = %identity.external_id))]
pub async fn list_enrolled_courses(State(state): State<AppState>, identity: Identity) -> Result<Json<Vec<EnrolledCourseResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let Some(user) = Users::new(&mut conn).get_by_email(&identity.email).await? else {
        return Ok(Json(Vec::new()));
    };

    let courses = Enrollments::new(&mut conn).list_enrolled_courses(user.id).await?;
    Ok(Json(courses.into_iter().map(EnrolledCourseResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/courses/{course_id}",
    tag = "courses",
    summary = "Get course detail",
    description = "Chapters are ordered by chapter number. Enrollment and completions are only filled in for an identified caller.",
    params(("course_id" = i32, Path, description = "Public course identifier")),
    responses(
        (status = 200, description = "Course with chapters and the caller's progress", body = CourseDetailResponse),
        (status = 400, description = "Invalid course id", body = crate::errors::ErrorBody),
        (status = 404, description = "Course not found", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_course_detail(
    State(state): State<AppState>,
    path: std::result::Result<Path<CourseId>, PathRejection>,
    identity: Option<Identity>,
) -> Result<Json<CourseDetailResponse>> {
    let Path(course_id) = path?;
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let course = Courses::new(&mut tx)
        .get_by_id(course_id)
        .await?
        .ok_or_else(|| Error::not_found(Resource::Course))?;
    let chapters = Courses::new(&mut tx).list_chapters(course_id).await?;

    let user = match &identity {
        Some(identity) => Users::new(&mut tx).get_by_email(&identity.email).await?,
        None => None,
    };

    let (enrollment, completed) = match user {
        Some(user) => match Enrollments::new(&mut tx).get(user.id, course_id).await? {
            Some(enrollment) => {
                let completed = Completions::new(&mut tx).list_for_course(user.id, course_id).await?;
                (Some(enrollment), completed)
            }
            None => (None, Vec::new()),
        },
        None => (None, Vec::new()),
    };

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(CourseDetailResponse {
        course: course.into(),
        chapters: chapters.into_iter().map(Into::into).collect(),
        user_enroll: enrollment.is_some(),
        course_enroll_info: enrollment.map(EnrollmentResponse::from),
        completed_exercises: completed.into_iter().map(CompletedExerciseResponse::from).collect(),
    }))
}
