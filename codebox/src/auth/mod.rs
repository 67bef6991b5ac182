//! Authentication.
//!
//! Codebox does not authenticate users itself. An identity provider in front of the service
//! verifies the user and forwards the result as trusted HTTP headers (see
//! [`crate::config::ProxyHeaderAuthConfig`]). The [`Identity`] extractor reads those headers:
//!
//! - Routes that require a user take `Identity` and reject anonymous requests with `401`.
//! - Routes that personalise their response take `Option<Identity>`. A user header without an
//!   email is treated as anonymous there.
//!
//! The extractor never touches the database. Handlers that write per-user state call
//! [`crate::db::handlers::Users::ensure`] inside their own transaction first.

pub mod identity;

pub use identity::Identity;
