//! Database repositories for community posts and replies.
//!
//! Both return rows joined with the author's provider id and community profile, which is what
//! every listing needs.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::community::{PostCreateDBRequest, PostDBResponse, ReplyCreateDBRequest, ReplyDBResponse},
};
use crate::types::{PostId, ReplyId};
use sqlx::PgConnection;
use tracing::instrument;

const POST_COLUMNS: &str = r#"
    SELECT
        p.id,
        u.external_user_id AS author_id,
        pr.display_name AS author_display_name,
        pr.avatar AS author_avatar,
        p.title,
        p.content,
        p.category,
        p.tags,
        p.likes,
        p.replies,
        p.created_at,
        p.updated_at
"#;

const REPLY_COLUMNS: &str = r#"
    SELECT
        r.id,
        r.post_id,
        u.external_user_id AS author_id,
        pr.display_name AS author_display_name,
        pr.avatar AS author_avatar,
        r.content,
        r.likes,
        r.created_at
"#;

/// Filter for listing posts
#[derive(Debug, Clone)]
pub struct PostFilter {
    /// Exact category match; `None` lists every category
    pub category: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

impl PostFilter {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            category: None,
            offset,
            limit,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

pub struct Posts<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Posts<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Atomically bump the denormalized reply counter.
    ///
    /// Fails with [`DbError::NotFound`] if the post does not exist.
    #[instrument(skip(self), err)]
    pub async fn increment_replies(&mut self, id: PostId) -> Result<i32> {
        let replies: Option<i32> = sqlx::query_scalar(
            "UPDATE community_posts SET replies = replies + 1, updated_at = NOW() WHERE id = $1 RETURNING replies",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        replies.ok_or(DbError::NotFound)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Posts<'c> {
    type CreateRequest = PostCreateDBRequest;
    type Response = PostDBResponse;
    type Id = PostId;
    type Filter = PostFilter;

    #[instrument(skip(self, request), fields(category = %request.category), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let query = format!(
            r#"
            WITH inserted AS (
                INSERT INTO community_posts (user_id, title, content, category, tags)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            {POST_COLUMNS}
            FROM inserted p
            JOIN users u ON u.id = p.user_id
            LEFT JOIN user_profiles pr ON pr.external_user_id = u.external_user_id
            "#
        );

        let post = sqlx::query_as::<_, PostDBResponse>(&query)
            .bind(request.user_id)
            .bind(&request.title)
            .bind(&request.content)
            .bind(&request.category)
            .bind(&request.tags)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(post)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let query = format!(
            r#"
            {POST_COLUMNS}
            FROM community_posts p
            JOIN users u ON u.id = p.user_id
            LEFT JOIN user_profiles pr ON pr.external_user_id = u.external_user_id
            WHERE p.id = $1
            "#
        );

        let post = sqlx::query_as::<_, PostDBResponse>(&query)
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(post)
    }

    /// Newest first
    #[instrument(skip(self, filter), fields(category = ?filter.category, limit = filter.limit, offset = filter.offset), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let query = format!(
            r#"
            {POST_COLUMNS}
            FROM community_posts p
            JOIN users u ON u.id = p.user_id
            LEFT JOIN user_profiles pr ON pr.external_user_id = u.external_user_id
            WHERE ($1::TEXT IS NULL OR p.category = $1)
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2 OFFSET $3
            "#
        );

        let posts = sqlx::query_as::<_, PostDBResponse>(&query)
            .bind(&filter.category)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(posts)
    }
}

/// Filter for listing replies
#[derive(Debug, Clone)]
pub struct ReplyFilter {
    pub post_id: PostId,
}

pub struct Replies<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Replies<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Replies<'c> {
    type CreateRequest = ReplyCreateDBRequest;
    type Response = ReplyDBResponse;
    type Id = ReplyId;
    type Filter = ReplyFilter;

    #[instrument(skip(self, request), fields(post_id = request.post_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let query = format!(
            r#"
            WITH inserted AS (
                INSERT INTO community_replies (post_id, user_id, content)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            {REPLY_COLUMNS}
            FROM inserted r
            JOIN users u ON u.id = r.user_id
            LEFT JOIN user_profiles pr ON pr.external_user_id = u.external_user_id
            "#
        );

        let reply = sqlx::query_as::<_, ReplyDBResponse>(&query)
            .bind(request.post_id)
            .bind(request.user_id)
            .bind(&request.content)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(reply)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let query = format!(
            r#"
            {REPLY_COLUMNS}
            FROM community_replies r
            JOIN users u ON u.id = r.user_id
            LEFT JOIN user_profiles pr ON pr.external_user_id = u.external_user_id
            WHERE r.id = $1
            "#
        );

        let reply = sqlx::query_as::<_, ReplyDBResponse>(&query)
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(reply)
    }

    /// Replies to one post, newest first
    #[instrument(skip(self), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let query = format!(
            r#"
            {REPLY_COLUMNS}
            FROM community_replies r
            JOIN users u ON u.id = r.user_id
            LEFT JOIN user_profiles pr ON pr.external_user_id = u.external_user_id
            WHERE r.post_id = $1
            ORDER BY r.created_at DESC, r.id DESC
            "#
        );

        let replies = sqlx::query_as::<_, ReplyDBResponse>(&query)
            .bind(filter.post_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(replies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::Profiles;
    use crate::db::models::profiles::ProfileUpsertDBRequest;
    use crate::test_utils::create_test_user;
    use crate::types::UserId;
    use sqlx::PgPool;

    fn post(user_id: UserId, title: &str, category: &str) -> PostCreateDBRequest {
        PostCreateDBRequest {
            user_id,
            title: title.to_string(),
            content: format!("{title} body"),
            category: category.to_string(),
            tags: String::new(),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_post_includes_author(pool: PgPool) {
        let user = create_test_user(&pool, "user_1").await;

        let mut conn = pool.acquire().await.unwrap();
        Profiles::new(&mut conn)
            .upsert(
                "user_1",
                &ProfileUpsertDBRequest {
                    display_name: Some("Ada".to_string()),
                    avatar: Some("ada.png".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let created = Posts::new(&mut conn).create(&post(user.id, "Hello", "general")).await.unwrap();

        assert_eq!(created.author_id, "user_1");
        assert_eq!(created.author_display_name.as_deref(), Some("Ada"));
        assert_eq!(created.author_avatar.as_deref(), Some("ada.png"));
        assert_eq!(created.replies, 0);
        assert_eq!(created.likes, 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_author_without_profile_has_null_display_fields(pool: PgPool) {
        let user = create_test_user(&pool, "user_1").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Posts::new(&mut conn);
        let created = repo.create(&post(user.id, "Hello", "help")).await.unwrap();
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.title, "Hello");
        assert!(fetched.author_display_name.is_none());
        assert!(fetched.author_avatar.is_none());
        assert!(repo.get_by_id(created.id + 1000).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_filters_and_paginates(pool: PgPool) {
        let user = create_test_user(&pool, "user_1").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Posts::new(&mut conn);
        for (title, category) in [("a", "jobs"), ("b", "general"), ("c", "jobs"), ("d", "help")] {
            repo.create(&post(user.id, title, category)).await.unwrap();
        }

        let all = repo.list(&PostFilter::new(0, 10)).await.unwrap();
        let titles: Vec<_> = all.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["d", "c", "b", "a"]);

        let jobs = repo.list(&PostFilter::new(0, 10).with_category("jobs")).await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|p| p.category == "jobs"));

        let page = repo.list(&PostFilter::new(1, 2)).await.unwrap();
        let titles: Vec<_> = page.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "b"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_replies_and_counter(pool: PgPool) {
        let author = create_test_user(&pool, "user_1").await;
        let replier = create_test_user(&pool, "user_2").await;

        let mut conn = pool.acquire().await.unwrap();
        let created = Posts::new(&mut conn).create(&post(author.id, "Q", "help")).await.unwrap();

        for content in ["first", "second"] {
            Posts::new(&mut conn).increment_replies(created.id).await.unwrap();
            Replies::new(&mut conn)
                .create(&ReplyCreateDBRequest {
                    post_id: created.id,
                    user_id: replier.id,
                    content: content.to_string(),
                })
                .await
                .unwrap();
        }

        let replies = Replies::new(&mut conn)
            .list(&ReplyFilter { post_id: created.id })
            .await
            .unwrap();
        let contents: Vec<_> = replies.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["second", "first"]);
        assert!(replies.iter().all(|r| r.author_id == "user_2"));

        let fetched = Replies::new(&mut conn).get_by_id(replies[0].id).await.unwrap().unwrap();
        assert_eq!(fetched.post_id, created.id);

        let post = Posts::new(&mut conn).get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(post.replies, 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_increment_replies_missing_post(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let err = Posts::new(&mut conn).increment_replies(12345).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }
}
