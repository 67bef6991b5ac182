use crate::{
    AppState,
    api::models::enrollments::{EnrollRequest, EnrollmentResponse},
    auth::Identity,
    db::handlers::{Courses, Enrollments, Users},
    errors::{Error, Result},
    types::{Resource, abbrev_uuid},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

#[utoipa::path(
    post,
    path = "/enrollments",
    tag = "enrollments",
    summary = "Enroll in a course",
    description = "Enrolling again returns the existing enrollment unchanged.",
    request_body = EnrollRequest,
    responses(
        (status = 200, description = "The caller's enrollment", body = EnrollmentResponse),
        (status = 400, description = "Course ID required", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "Course not found", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody),
    ),
    security(("X-Codebox-User" = []))
)]
#[tracing::instrument(skip_all, fields(user = %identity.external_id))]
pub async fn enroll(
    State(state): State<AppState>,
    identity: Identity,
    payload: std::result::Result<Json<EnrollRequest>, JsonRejection>,
) -> Result<Json<EnrollmentResponse>> {
    let Json(request) = payload?;
    let course_id = request.course_id()?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    if Courses::new(&mut tx).get_by_id(course_id).await?.is_none() {
        return Err(Error::not_found(Resource::Course));
    }

    let user = Users::new(&mut tx).ensure(&identity.user_request()).await?;
    let enrollment = Enrollments::new(&mut tx).enroll(user.id, course_id).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    info!(user_id = %abbrev_uuid(&user.id), course_id, "Enrolled in course");
    Ok(Json(enrollment.into()))
}

#[cfg(test)]
mod tests {
    use crate::api::models::enrollments::EnrollmentResponse;
    use crate::db::handlers::Users;
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_enroll_creates_user_and_enrollment(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        create_test_course(&pool, 101).await;

        let response = app
            .post("/api/enrollments")
            .add_header("x-codebox-user", "user_9")
            .add_header("x-codebox-email", "grace@example.com")
            .add_header("x-codebox-first-name", "Grace")
            .json(&json!({ "courseId": 101 }))
            .await;
        response.assert_status_ok();

        let enrollment: EnrollmentResponse = response.json();
        assert_eq!(enrollment.course_id, 101);
        assert_eq!(enrollment.xp_earned, 0);

        let mut conn = pool.acquire().await.unwrap();
        let user = Users::new(&mut conn).get_by_email("grace@example.com").await.unwrap().unwrap();
        assert_eq!(user.id, enrollment.user_id);
        assert_eq!(user.name.as_deref(), Some("Grace"));
        assert_eq!(user.points, 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_enroll_is_idempotent(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, "user_1").await;
        create_test_course(&pool, 101).await;
        let headers = auth_headers(&user);

        let mut ids = Vec::new();
        for _ in 0..2 {
            let response = app
                .post("/api/enrollments")
                .add_header(&headers[0].0, &headers[0].1)
                .add_header(&headers[1].0, &headers[1].1)
                .json(&json!({ "courseId": 101 }))
                .await;
            response.assert_status_ok();
            ids.push(response.json::<EnrollmentResponse>().id);
        }

        assert_eq!(ids[0], ids[1]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_enroll_validation(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, "user_1").await;
        let headers = auth_headers(&user);

        let response = app.post("/api/enrollments").json(&json!({ "courseId": 101 })).await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = app
            .post("/api/enrollments")
            .add_header(&headers[0].0, &headers[0].1)
            .add_header(&headers[1].0, &headers[1].1)
            .json(&json!({}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Course ID required");

        let response = app
            .post("/api/enrollments")
            .add_header(&headers[0].0, &headers[0].1)
            .add_header(&headers[1].0, &headers[1].1)
            .json(&json!({ "courseId": 404 }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"], "Course not found");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_enroll_with_user_header_but_no_email(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        create_test_course(&pool, 101).await;

        let response = app
            .post("/api/enrollments")
            .add_header("x-codebox-user", "user_1")
            .json(&json!({ "courseId": 101 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Email not found");
    }
}
