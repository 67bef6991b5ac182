//! OpenAPI documentation for the `/api/*` surface.
//!
//! The document is served at `/api-docs/openapi.json` and rendered with Scalar at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::api;
use crate::errors::ErrorBody;
use crate::progress::Achievements;
use crate::types::ExerciseKey;

/// Security scheme for identities forwarded by the authenticating proxy.
struct ProxyHeaderAddon;

impl Modify for ProxyHeaderAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "X-Codebox-User".to_string(),
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "x-codebox-user",
                    "Provider-issued user id, set by the identity proxy together with `x-codebox-email`. \
                     Optional `x-codebox-name` and `x-codebox-first-name` headers name new accounts.",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Codebox API",
        description = "Course catalog, exercise progress and community forum."
    ),
    servers((url = "/api")),
    paths(
        api::handlers::courses::list_courses,
        api::handlers::courses::list_enrolled_courses,
        api::handlers::courses::get_course_detail,
        api::handlers::enrollments::enroll,
        api::handlers::exercises::get_exercise,
        api::handlers::exercises::complete_exercise,
        api::handlers::users::ensure_user,
        api::handlers::users::get_user_stats,
        api::handlers::users::get_profile,
        api::handlers::users::update_profile,
        api::handlers::community::list_posts,
        api::handlers::community::get_post,
        api::handlers::community::create_post,
        api::handlers::community::create_reply,
    ),
    components(schemas(
        ErrorBody,
        ExerciseKey,
        Achievements,
        api::models::courses::CourseResponse,
        api::models::courses::ChapterResponse,
        api::models::courses::CompletedExerciseResponse,
        api::models::courses::CourseDetailResponse,
        api::models::courses::EnrolledCourseResponse,
        api::models::enrollments::EnrollRequest,
        api::models::enrollments::EnrollmentResponse,
        api::models::exercises::ExerciseContent,
        api::models::exercises::StarterFile,
        api::models::exercises::ExerciseRequest,
        api::models::exercises::ExerciseDetailResponse,
        api::models::exercises::ExerciseResponse,
        api::models::exercises::CompleteExerciseRequest,
        api::models::exercises::CompletionResponse,
        api::models::users::UserResponse,
        api::models::users::LearningProgress,
        api::models::users::UserStatsResponse,
        api::models::community::PostCategory,
        api::models::community::CreatePostRequest,
        api::models::community::CreateReplyRequest,
        api::models::community::PostResponse,
        api::models::community::ReplyResponse,
        api::models::community::PostDetailResponse,
        api::models::community::ProfileRequest,
        api::models::community::ProfileResponse,
    )),
    modifiers(&ProxyHeaderAddon),
    tags(
        (name = "courses", description = "Course catalog and course detail"),
        (name = "enrollments", description = "Course enrollment"),
        (name = "exercises", description = "Exercise delivery and completion"),
        (name = "users", description = "Current user, statistics and profile"),
        (name = "community", description = "Forum posts and replies"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/courses",
            "/courses/enrolled",
            "/courses/{course_id}",
            "/enrollments",
            "/exercise",
            "/exercise/complete",
            "/user",
            "/user/stats",
            "/user/profile",
            "/community/posts",
            "/community/posts/{id}",
            "/community/replies",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_proxy_header_security_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("X-Codebox-User"));
    }
}
