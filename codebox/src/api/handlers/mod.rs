//! HTTP request handlers for all API endpoints.
//!
//! Handlers extract the caller's [`Identity`](crate::auth::Identity) where needed, open one
//! transaction per request, delegate to the repositories in [`crate::db::handlers`] and convert
//! the results into API models. Errors are returned as [`crate::errors::Error`], which renders
//! the `{ "error": ... }` body.

pub mod community;
pub mod courses;
pub mod enrollments;
pub mod exercises;
pub mod users;
