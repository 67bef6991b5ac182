use crate::db::errors::DbError;
use crate::types::Resource;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

/// Errors returned by request handlers.
///
/// Each variant maps to one status code, and the response body only ever carries
/// [`Error::user_message`]. The `Display` output may include internal detail and is for logs.
#[derive(ThisError, Debug)]
pub enum Error {
    /// No learner identity on a request that needs one
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("{resource} not found")]
    NotFound { resource: Resource },

    /// `operation` reads as "Failed to ..." in logs
    #[error("Failed to {operation}")]
    Internal { operation: String },

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

const INTERNAL: &str = "Internal server error";

fn database_status(err: &DbError) -> StatusCode {
    match err {
        DbError::NotFound => StatusCode::NOT_FOUND,
        DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
        DbError::ForeignKeyViolation { .. } | DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
        DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn database_message(err: &DbError) -> String {
    let message = match err {
        DbError::NotFound => "Resource not found",
        DbError::UniqueViolation { constraint, .. } => match constraint.as_deref() {
            Some("users_email_key") => "An account with this email address already exists",
            _ => "Resource already exists",
        },
        DbError::ForeignKeyViolation { .. } => "Referenced record does not exist",
        DbError::CheckViolation { .. } => "Request contains invalid values",
        DbError::Other(_) => INTERNAL,
    };
    message.to_string()
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest { message: message.into() }
    }

    pub fn not_found(resource: Resource) -> Self {
        Error::NotFound { resource }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Database(err) => database_status(err),
            Error::Internal { .. } | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a learner. Server-side failures collapse to a generic string.
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.as_deref().unwrap_or("Unauthorized").to_string(),
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource } => format!("{resource} not found"),
            Error::Database(err) => database_message(err),
            Error::Internal { .. } | Error::Other(_) => INTERNAL.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "Request failed: {:#}", self);
        } else if matches!(self, Error::Database(_)) {
            tracing::warn!(status = status.as_u16(), "Rejected by database constraint: {}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "Request rejected: {}", self);
        }

        let body = ErrorBody { error: self.user_message() };
        (status, Json(body)).into_response()
    }
}

macro_rules! rejection_as_bad_request {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for Error {
                fn from(rejection: $rejection) -> Self {
                    Error::bad_request(rejection.body_text())
                }
            }
        )+
    };
}

rejection_as_bad_request!(JsonRejection, QueryRejection, PathRejection);

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages_name_the_resource() {
        assert_eq!(Error::not_found(Resource::Course).user_message(), "Course not found");
        assert_eq!(Error::not_found(Resource::Exercise).user_message(), "Exercise not found");
        assert_eq!(Error::not_found(Resource::Post).status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let err = Error::Other(anyhow::anyhow!("connection refused to 10.0.0.3:5432"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "Internal server error");

        let err = Error::Internal {
            operation: "grant exercise XP".to_string(),
        };
        assert_eq!(err.user_message(), "Internal server error");
    }

    #[test]
    fn test_unauthenticated_defaults_to_unauthorized() {
        let err = Error::Unauthenticated { message: None };
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.user_message(), "Unauthorized");
    }

    #[test]
    fn test_constraint_violations_map_to_client_errors() {
        let err = Error::Database(DbError::UniqueViolation {
            constraint: Some("users_email_key".to_string()),
            table: Some("users".to_string()),
            message: "duplicate key".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.user_message(), "An account with this email address already exists");

        let err = Error::Database(DbError::CheckViolation {
            constraint: None,
            table: None,
            message: "check".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
