//! Database repository for users.

use crate::db::{
    errors::Result,
    models::users::{UserCreateDBRequest, UserDBResponse},
};
use crate::types::{UserId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Return the user with the request's email, creating it first if absent.
    ///
    /// An existing row is returned unchanged, so points and name survive later sign-ins. The
    /// provider id is not a key: a new email under the same id gets its own row.
    #[instrument(skip(self, request), fields(email = %request.email), err)]
    pub async fn ensure(&mut self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let created = sqlx::query_as::<_, UserDBResponse>(
            r#"
            INSERT INTO users (id, external_user_id, email, name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.external_user_id)
        .bind(&request.email)
        .bind(&request.name)
        .fetch_optional(&mut *self.db)
        .await?;

        if let Some(user) = created {
            tracing::info!(user_id = %abbrev_uuid(&user.id), "Created user on first sign-in");
            return Ok(user);
        }

        let user = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM users WHERE email = $1")
            .bind(&request.email)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(user)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    pub async fn get_by_id(&mut self, id: UserId) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }

    /// Atomically add `amount` to the user's point total.
    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    pub async fn add_points(&mut self, id: UserId, amount: i32) -> Result<i32> {
        let points: i32 = sqlx::query_scalar(
            r#"
            UPDATE users
            SET points = points + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING points
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(points)
    }
}
