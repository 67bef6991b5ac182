//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL, following the
//! repository pattern:
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Consistency
//!
//! Uniqueness (one enrollment per user and course, one completion per exercise key) is enforced
//! by constraints in the schema, and counters (`points`, `xp_earned`, `replies`) are only changed
//! with `SET x = x + $n` statements. Multi-step writes run inside a single transaction opened by
//! the API handler.

pub mod errors;
pub mod handlers;
pub mod models;
