//! Database request and response models.
//!
//! `*DBRequest` types carry the data a repository needs to write a row, `*DBResponse` types are
//! what repositories hand back. API models convert from these with `From` impls.

pub mod community;
pub mod courses;
pub mod enrollments;
pub mod profiles;
pub mod progress;
pub mod users;
