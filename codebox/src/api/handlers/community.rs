use crate::{
    AppState,
    api::models::community::{
        CreatePostRequest, CreateReplyRequest, ListPostsQuery, PostDetailResponse, PostResponse, ReplyResponse,
    },
    auth::Identity,
    db::{
        errors::DbError,
        handlers::{
            Posts, Replies, Repository, Users,
            community::{PostFilter, ReplyFilter},
        },
        models::community::{PostCreateDBRequest, ReplyCreateDBRequest},
    },
    errors::{Error, Result},
    types::{PostId, Resource},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/community/posts",
    tag = "community",
    summary = "List posts",
    description = "Newest first. Pass `category` to filter; `all` or an empty value lists every category.",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Page of posts", body = Vec<PostResponse>),
        (status = 400, description = "Invalid query parameters", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_posts(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListPostsQuery>, QueryRejection>,
) -> Result<Json<Vec<PostResponse>>> {
    let Query(query) = query?;

    let mut filter = PostFilter::new(query.pagination.offset(), query.pagination.limit_for(&state.config.community));
    if let Some(category) = query.category_filter() {
        filter = filter.with_category(category);
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let posts = Posts::new(&mut conn).list(&filter).await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/community/posts/{id}",
    tag = "community",
    summary = "Get a post with its replies",
    params(("id" = i64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post and replies, newest reply first", body = PostDetailResponse),
        (status = 400, description = "Invalid post id", body = crate::errors::ErrorBody),
        (status = 404, description = "Post not found", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_post(
    State(state): State<AppState>,
    path: std::result::Result<Path<PostId>, PathRejection>,
) -> Result<Json<PostDetailResponse>> {
    let Path(id) = path?;
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let post = Posts::new(&mut tx)
        .get_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found(Resource::Post))?;
    let replies = Replies::new(&mut tx).list(&ReplyFilter { post_id: id }).await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(PostDetailResponse {
        post: post.into(),
        replies: replies.into_iter().map(ReplyResponse::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/community/posts",
    tag = "community",
    summary = "Create a post",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Missing required fields or unknown category", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody),
    ),
    security(("X-Codebox-User" = []))
)]
#[tracing::instrument(skip_all, fields(user = %identity.external_id))]
pub async fn create_post(
    State(state): State<AppState>,
    identity: Identity,
    payload: std::result::Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostResponse>)> {
    let Json(request) = payload?;
    let new_post = request.validate()?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let user = Users::new(&mut tx).ensure(&identity.user_request()).await?;
    let post = Posts::new(&mut tx)
        .create(&PostCreateDBRequest {
            user_id: user.id,
            title: new_post.title,
            content: new_post.content,
            category: new_post.category.to_string(),
            tags: new_post.tags,
        })
        .await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(post.into())))
}

#[utoipa::path(
    post,
    path = "/community/replies",
    tag = "community",
    summary = "Reply to a post",
    description = "Creates the reply and increments the post's reply counter in the same transaction.",
    request_body = CreateReplyRequest,
    responses(
        (status = 201, description = "Reply created", body = ReplyResponse),
        (status = 400, description = "Missing required fields", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "Post not found", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody),
    ),
    security(("X-Codebox-User" = []))
)]
#[tracing::instrument(skip_all, fields(user = %identity.external_id))]
pub async fn create_reply(
    State(state): State<AppState>,
    identity: Identity,
    payload: std::result::Result<Json<CreateReplyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReplyResponse>)> {
    let Json(request) = payload?;
    let (post_id, content) = request.validate()?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let user = Users::new(&mut tx).ensure(&identity.user_request()).await?;

    // Bumping the counter first locks the post row and proves it exists
    match Posts::new(&mut tx).increment_replies(post_id).await {
        Ok(_) => {}
        Err(DbError::NotFound) => return Err(Error::not_found(Resource::Post)),
        Err(e) => return Err(e.into()),
    }

    let reply = Replies::new(&mut tx)
        .create(&ReplyCreateDBRequest {
            post_id,
            user_id: user.id,
            content,
        })
        .await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(reply.into())))
}

#[cfg(test)]
mod tests {
    use crate::api::models::community::{PostDetailResponse, PostResponse, ReplyResponse};
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::PgPool;

    async fn create_post(app: &axum_test::TestServer, headers: &[(String, String)], category: &str, title: &str) -> PostResponse {
        let response = app
            .post("/api/community/posts")
            .add_header(&headers[0].0, &headers[0].1)
            .add_header(&headers[1].0, &headers[1].1)
            .json(&json!({ "title": title, "content": "Body text", "category": category, "tags": ["rust", "web"] }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_post(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, "user_1").await;
        let headers = auth_headers(&user);

        let post = create_post(&app, &headers, "help", "Borrow checker").await;

        assert_eq!(post.title, "Borrow checker");
        assert_eq!(post.category, "help");
        assert_eq!(post.tags, "rust,web");
        assert_eq!(post.replies, 0);
        assert_eq!(post.likes, 0);
        assert_eq!(post.user_id, "user_1");
        assert!(post.user_display_name.is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_post_validation(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, "user_1").await;
        let headers = auth_headers(&user);

        let response = app
            .post("/api/community/posts")
            .json(&json!({ "title": "Hi", "content": "Hello", "category": "general" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = app
            .post("/api/community/posts")
            .add_header(&headers[0].0, &headers[0].1)
            .add_header(&headers[1].0, &headers[1].1)
            .json(&json!({ "title": "Hi", "category": "general" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Missing required fields");

        let response = app
            .post("/api/community/posts")
            .add_header(&headers[0].0, &headers[0].1)
            .add_header(&headers[1].0, &headers[1].1)
            .json(&json!({ "title": "Hi", "content": "Hello", "category": "memes" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_reply_counter_matches_replies(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let author = create_test_user(&pool, "user_1").await;
        let replier = create_test_user(&pool, "user_2").await;
        let post = create_post(&app, &auth_headers(&author), "general", "Introductions").await;

        let headers = auth_headers(&replier);
        for n in 1..=3 {
            let response = app
                .post("/api/community/replies")
                .add_header(&headers[0].0, &headers[0].1)
                .add_header(&headers[1].0, &headers[1].1)
                .json(&json!({ "postId": post.id, "content": format!("Reply {n}") }))
                .await;
            response.assert_status(StatusCode::CREATED);
            let reply: ReplyResponse = response.json();
            assert_eq!(reply.post_id, post.id);
            assert_eq!(reply.user_id, "user_2");
        }

        let response = app.get(&format!("/api/community/posts/{}", post.id)).await;
        response.assert_status_ok();

        let detail: PostDetailResponse = response.json();
        assert_eq!(detail.post.replies, 3);
        assert_eq!(detail.replies.len(), 3);
        assert_eq!(detail.replies[0].content, "Reply 3");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_reply_to_missing_post(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, "user_1").await;
        let headers = auth_headers(&user);

        let response = app
            .post("/api/community/replies")
            .add_header(&headers[0].0, &headers[0].1)
            .add_header(&headers[1].0, &headers[1].1)
            .json(&json!({ "postId": 9999, "content": "Hello?" }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Post not found");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM community_replies")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_missing_post(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app.get("/api/community/posts/9999").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Post not found");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_category_filter(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, "user_1").await;
        let headers = auth_headers(&user);

        create_post(&app, &headers, "jobs", "Hiring").await;
        create_post(&app, &headers, "help", "Stuck").await;
        create_post(&app, &headers, "jobs", "Freelance gig").await;

        let jobs: Vec<PostResponse> = app.get("/api/community/posts?category=jobs").await.json();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|p| p.category == "jobs"));
        assert_eq!(jobs[0].title, "Freelance gig");

        let all: Vec<PostResponse> = app.get("/api/community/posts?category=all").await.json();
        assert_eq!(all.len(), 3);

        let unfiltered: Vec<PostResponse> = app.get("/api/community/posts").await.json();
        assert_eq!(unfiltered.len(), 3);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_posts_pagination(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, "user_1").await;
        let headers = auth_headers(&user);

        for n in 0..5 {
            create_post(&app, &headers, "general", &format!("Post {n}")).await;
        }

        let page: Vec<PostResponse> = app.get("/api/community/posts?limit=2&offset=1").await.json();
        let titles: Vec<_> = page.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Post 3", "Post 2"]);

        let response = app.get("/api/community/posts?limit=abc").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_posts_show_author_profile(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, "user_1").await;
        let headers = auth_headers(&user);

        app.put("/api/user/profile")
            .add_header(&headers[0].0, &headers[0].1)
            .add_header(&headers[1].0, &headers[1].1)
            .json(&json!({ "displayName": "Ada", "avatar": "https://cdn.example.com/ada.png" }))
            .await
            .assert_status_ok();

        let post = create_post(&app, &headers, "showcase", "My portfolio").await;
        assert_eq!(post.user_display_name.as_deref(), Some("Ada"));
        assert_eq!(post.user_avatar.as_deref(), Some("https://cdn.example.com/ada.png"));
    }
}
