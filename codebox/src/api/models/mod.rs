//! API request and response data models.
//!
//! These types define the public JSON contract. They are distinct from the database models in
//! [`crate::db::models`] and convert from them with `From` impls. Every model serializes with
//! camelCase field names and is annotated with `utoipa` for the OpenAPI document.
//!
//! - [`courses`]: catalog, course detail and enrolled-course progress
//! - [`enrollments`]: enrollment requests and responses
//! - [`exercises`]: exercise delivery and completion
//! - [`users`]: the current user and their statistics
//! - [`community`]: posts, replies and profiles
//! - [`pagination`]: offset/limit query parameters

pub mod community;
pub mod courses;
pub mod enrollments;
pub mod exercises;
pub mod pagination;
pub mod users;
