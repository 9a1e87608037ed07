//! API-level error taxonomy.
//!
//! All handlers return [`Result<T>`](Result); the [`Error`] type maps onto
//! HTTP status codes in its `IntoResponse` impl. Rows that exist but belong
//! to another organization are reported as `NotFound`, never as a
//! permission error, so tenants cannot probe for foreign ids.

use crate::db::errors::DbError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("authentication required")]
    Unauthenticated(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] DbError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Convenience constructor for the common masked-404 path.
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Error::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Database(db) => match db {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation(_) => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation(_) => StatusCode::NOT_FOUND,
                DbError::InvalidState(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Internal(_) | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller. Internal details stay in logs.
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated(_) => "Authentication required".to_string(),
            Error::BadRequest(msg) => msg.clone(),
            Error::NotFound { resource, id } => format!("{resource} not found: {id}"),
            Error::Conflict(msg) => msg.clone(),
            Error::Database(DbError::NotFound) => "Not found".to_string(),
            Error::Database(DbError::UniqueViolation(msg)) => msg.clone(),
            Error::Database(DbError::ForeignKeyViolation(_)) => "Not found".to_string(),
            Error::Database(DbError::InvalidState(msg)) => msg.clone(),
            Error::Database(_) | Error::Internal(_) | Error::Other(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::debug!(error = %self, "unauthenticated request");
        } else {
            tracing::info!(error = %self, "request rejected");
        }

        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::Unauthenticated("no cookie".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::not_found("client", uuid::Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Conflict("already sent".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::Database(DbError::UniqueViolation("email taken".into())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::Database(DbError::ForeignKeyViolation("bad client".into())).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_details_not_leaked() {
        let err = Error::Internal("connection pool exhausted at 10.0.0.3".into());
        assert_eq!(err.user_message(), "Internal server error");
    }
}
