use crate::{
    AppState,
    api::models::{
        community::{ProfileRequest, ProfileResponse},
        users::{UserResponse, UserStatsResponse},
    },
    auth::Identity,
    db::handlers::{Profiles, Progress, Users},
    errors::{Error, Result},
    types::Resource,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

#[utoipa::path(
    post,
    path = "/user",
    tag = "users",
    summary = "Get or create the current user",
    description = "Looks the caller up by email and creates the account with zero points on first use.",
    responses(
        (status = 200, description = "The caller's account", body = UserResponse),
        (status = 400, description = "Email not found", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody),
    ),
    security(("X-Codebox-User" = []))
)]
#[tracing::instrument(skip_all, fields(user = %identity.external_id))]
pub async fn ensure_user(State(state): State<AppState>, identity: Identity) -> Result<Json<UserResponse>> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let user = Users::new(&mut tx).ensure(&identity.user_request()).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/user/stats",
    tag = "users",
    summary = "Get the current user's statistics",
    description = "XP, achievement flags and their badge count, a coarse day streak, and learning progress counters.",
    responses(
        (status = 200, description = "Statistics for the caller", body = UserStatsResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "User not found", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody),
    ),
    security(("X-Codebox-User" = []))
)]
#[tracing::instrument(skip_all, fields(user = %identity.external_id))]
pub async fn get_user_stats(State(state): State<AppState>, identity: Identity) -> Result<Json<UserStatsResponse>> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let user = Users::new(&mut tx)
        .get_by_email(&identity.email)
        .await?
        .ok_or_else(|| Error::not_found(Resource::User))?;
    let progress = Progress::new(&mut tx)
        .for_user(user.id)
        .await?
        .ok_or_else(|| Error::not_found(Resource::User))?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(progress.into()))
}

#[utoipa::path(
    get,
    path = "/user/profile",
    tag = "users",
    summary = "Get the current user's community profile",
    responses(
        (status = 200, description = "The caller's profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "Profile not found", body = crate::errors::ErrorBody),
    ),
    security(("X-Codebox-User" = []))
)]
#[tracing::instrument(skip_all, fields(user = %identity.external_id))]
pub async fn get_profile(State(state): State<AppState>, identity: Identity) -> Result<Json<ProfileResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let profile = Profiles::new(&mut conn)
        .get(&identity.external_id)
        .await?
        .ok_or_else(|| Error::not_found(Resource::Profile))?;

    Ok(Json(profile.into()))
}

#[utoipa::path(
    put,
    path = "/user/profile",
    tag = "users",
    summary = "Replace the current user's community profile",
    description = "Every field is replaced; omitted or blank fields are cleared. The display name and avatar appear next to the caller's posts and replies.",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "The stored profile", body = ProfileResponse),
        (status = 400, description = "Invalid profile field", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody),
    ),
    security(("X-Codebox-User" = []))
)]
#[tracing::instrument(skip_all, fields(user = %identity.external_id))]
pub async fn update_profile(
    State(state): State<AppState>,
    identity: Identity,
    payload: std::result::Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>> {
    let Json(request) = payload?;
    let update = request.validate()?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    Users::new(&mut tx).ensure(&identity.user_request()).await?;
    let profile = Profiles::new(&mut tx).upsert(&identity.external_id, &update).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(profile.into()))
}
