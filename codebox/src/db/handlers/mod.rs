//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection or transaction and returns models from
//! [`crate::db::models`]. Callers open the transaction, hand it to as many repositories as the
//! operation needs, and commit once:
//!
//! ```ignore
//! use codebox::db::handlers::{Enrollments, Users};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!
//!     let user = Users::new(&mut tx).ensure(&request).await?;
//!     let enrollment = Enrollments::new(&mut tx).enroll(user.id, 101).await?;
//!
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Available Repositories
//!
//! - [`Users`]: learner accounts and point totals
//! - [`Courses`]: catalog, chapters and exercise content
//! - [`Enrollments`]: enrollments and enrolled-course progress
//! - [`Completions`]: completed exercises, the idempotency record for XP grants
//! - [`Progress`]: aggregate counters for user statistics
//! - [`Posts`] / [`Replies`]: community forum, implementing [`Repository`]
//! - [`Profiles`]: community display profiles

pub mod community;
pub mod completions;
pub mod courses;
pub mod enrollments;
pub mod profiles;
pub mod progress;
pub mod repository;
pub mod users;

pub use community::{Posts, Replies};
pub use completions::Completions;
pub use courses::Courses;
pub use enrollments::Enrollments;
pub use profiles::Profiles;
pub use progress::Progress;
pub use repository::Repository;
pub use users::Users;
