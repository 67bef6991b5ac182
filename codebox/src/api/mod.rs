//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! Every route lives under `/api`:
//!
//! - **Courses** (`/courses/*`): catalog, course detail and the caller's enrolled courses
//! - **Enrollments** (`/enrollments`): enroll the caller in a course
//! - **Exercises** (`/exercise/*`): exercise delivery and idempotent completion
//! - **User** (`/user/*`): the caller's account, statistics and community profile
//! - **Community** (`/community/*`): forum posts and replies
//!
//! # OpenAPI Documentation
//!
//! Endpoints are annotated with `utoipa`. The document is served at `/api-docs/openapi.json`
//! and rendered at `/docs`.

pub mod handlers;
pub mod models;
