use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;

/// Repository error type.
///
/// Constraint violations keep the constraint and table names so the API layer can pick a
/// message; anything else is opaque.
#[derive(Error, Debug)]
pub enum DbError {
    /// Lookup that must return a row returned none
    #[error("Entity not found")]
    NotFound,

    #[error("Unique constraint violation")]
    UniqueViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    #[error("Foreign key constraint violation")]
    ForeignKeyViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// CHECK or NOT NULL constraint violation
    #[error("Check constraint violation")]
    CheckViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Pool timeouts, I/O failures, decode errors and unclassified database errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn names(db_err: &dyn DatabaseError) -> (Option<String>, Option<String>, String) {
    (
        db_err.constraint().map(str::to_string),
        db_err.table().map(str::to_string),
        db_err.message().to_string(),
    )
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                let (constraint, table, message) = names(&**db_err);
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation {
                        constraint,
                        table,
                        message,
                    },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                        constraint,
                        table,
                        message,
                    },
                    ErrorKind::CheckViolation | ErrorKind::NotNullViolation => DbError::CheckViolation {
                        constraint,
                        table,
                        message,
                    },
                    _ => DbError::Other(err.into()),
                }
            }
            _ => DbError::Other(err.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
