//! Database repository for community profiles, keyed by the provider-issued user id.

use crate::db::{
    errors::Result,
    models::profiles::{ProfileDBResponse, ProfileUpsertDBRequest},
};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Profiles<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Profiles<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn get(&mut self, external_user_id: &str) -> Result<Option<ProfileDBResponse>> {
        let profile = sqlx::query_as::<_, ProfileDBResponse>("SELECT * FROM user_profiles WHERE external_user_id = $1")
            .bind(external_user_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(profile)
    }

    /// Create the profile or replace every field of the existing one.
    #[instrument(skip(self, request), err)]
    pub async fn upsert(&mut self, external_user_id: &str, request: &ProfileUpsertDBRequest) -> Result<ProfileDBResponse> {
        let profile = sqlx::query_as::<_, ProfileDBResponse>(
            r#"
            INSERT INTO user_profiles
                (external_user_id, display_name, avatar, bio, location, github_url, linkedin_url, website_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (external_user_id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                avatar = EXCLUDED.avatar,
                bio = EXCLUDED.bio,
                location = EXCLUDED.location,
                github_url = EXCLUDED.github_url,
                linkedin_url = EXCLUDED.linkedin_url,
                website_url = EXCLUDED.website_url,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(external_user_id)
        .bind(&request.display_name)
        .bind(&request.avatar)
        .bind(&request.bio)
        .bind(&request.location)
        .bind(&request.github_url)
        .bind(&request.linkedin_url)
        .bind(&request.website_url)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_upsert_creates_then_replaces(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Profiles::new(&mut conn);

        assert!(repo.get("user_1").await.unwrap().is_none());

        let created = repo
            .upsert(
                "user_1",
                &ProfileUpsertDBRequest {
                    display_name: Some("Ada".to_string()),
                    bio: Some("Writes notes".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(created.display_name.as_deref(), Some("Ada"));

        let replaced = repo
            .upsert(
                "user_1",
                &ProfileUpsertDBRequest {
                    display_name: Some("Ada L.".to_string()),
                    avatar: Some("https://cdn.example.com/ada.png".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(replaced.display_name.as_deref(), Some("Ada L."));
        assert_eq!(replaced.avatar.as_deref(), Some("https://cdn.example.com/ada.png"));
        assert!(replaced.bio.is_none());
        assert_eq!(replaced.created_at, created.created_at);

        let fetched = repo.get("user_1").await.unwrap().unwrap();
        assert_eq!(fetched.display_name.as_deref(), Some("Ada L."));
    }
}
