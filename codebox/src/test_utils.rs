//! Test utilities shared by the repository and handler tests.

use crate::api::models::exercises::ExerciseContent;
use crate::config::{Config, DatabaseConfig, PoolSettings};
use crate::db::{
    handlers::{Courses, Users},
    models::{
        courses::{ChapterCreateDBRequest, ChapterDBResponse, CourseCreateDBRequest, CourseDBResponse, ExerciseCreateDBRequest, ExerciseDBResponse},
        users::{UserCreateDBRequest, UserDBResponse},
    },
};
use crate::types::{ChapterId, CourseId};
use axum_test::TestServer;
use serde_json::json;
use sqlx::PgPool;

pub async fn create_test_app(pool: PgPool) -> TestServer {
    let config = create_test_config();

    let app = crate::Application::new_with_pool(config, Some(pool))
        .await
        .expect("Failed to create application");

    app.into_test_server()
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig {
            // Replaced by the pool handed in by sqlx::test
            url: "postgres://localhost/codebox_test".to_string(),
            pool: PoolSettings {
                max_connections: 2,
                min_connections: 0,
                ..Default::default()
            },
        },
        ..Default::default()
    }
}

pub async fn create_test_user(pool: &PgPool, external_id: &str) -> UserDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Users::new(&mut conn)
        .ensure(&UserCreateDBRequest {
            external_user_id: external_id.to_string(),
            email: format!("{external_id}@example.com"),
            name: Some(format!("Test {external_id}")),
        })
        .await
        .expect("Failed to create test user")
}

/// Identity headers the proxy would forward for `user`.
pub fn auth_headers(user: &UserDBResponse) -> Vec<(String, String)> {
    let config = create_test_config().auth.proxy_header;
    vec![
        (config.header_name, user.external_user_id.clone()),
        (config.email_header_name, user.email.clone()),
    ]
}

pub fn course_request(course_id: CourseId) -> CourseCreateDBRequest {
    CourseCreateDBRequest {
        course_id,
        title: format!("Course {course_id}"),
        description: format!("Description for course {course_id}"),
        banner_image: format!("/banners/{course_id}.png"),
        level: "Beginner".to_string(),
        tags: Some("html,css".to_string()),
        editor_type: None,
    }
}

pub async fn create_test_course(pool: &PgPool, course_id: CourseId) -> CourseDBResponse {
    create_test_course_from(pool, &course_request(course_id)).await
}

pub async fn create_test_course_from(pool: &PgPool, request: &CourseCreateDBRequest) -> CourseDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Courses::new(&mut conn).create(request).await.expect("Failed to create test course")
}

/// Create chapter `chapter_id` of `course_id` listing `exercise_count` exercise summaries.
pub async fn create_test_chapter(pool: &PgPool, course_id: CourseId, chapter_id: ChapterId, exercise_count: usize) -> ChapterDBResponse {
    let exercises: Vec<_> = (1..=exercise_count)
        .map(|n| json!({ "exerciseId": n, "name": format!("Exercise {n}") }))
        .collect();

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Courses::new(&mut conn)
        .create_chapter(&ChapterCreateDBRequest {
            course_id,
            chapter_id,
            name: format!("Chapter {chapter_id}"),
            description: Some(format!("Chapter {chapter_id} of course {course_id}")),
            exercises: Some(json!(exercises)),
        })
        .await
        .expect("Failed to create test chapter")
}

pub async fn create_test_exercise(pool: &PgPool, course_id: CourseId, chapter_id: ChapterId, slug: &str, xp: i32) -> ExerciseDBResponse {
    let content = ExerciseContent {
        content: Some(format!("<h1>{slug}</h1>")),
        task: Some(format!("Complete {slug}")),
        xp: Some(xp),
        ..Default::default()
    };

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Courses::new(&mut conn)
        .create_exercise(&ExerciseCreateDBRequest {
            course_id,
            chapter_id,
            exercise_id: slug.to_string(),
            exercise_name: format!("Exercise {slug}"),
            exercise_content: Some(content),
        })
        .await
        .expect("Failed to create test exercise")
}
