//! Database error types, translated from `sqlx::Error` into domain terms.

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("row not found")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("check constraint violated: {0}")]
    CheckViolation(String),

    /// A status transition was requested from a state that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("database error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();
                if db_err.is_unique_violation() {
                    DbError::UniqueViolation(msg)
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation(msg)
                } else if db_err.is_check_violation() {
                    DbError::CheckViolation(msg)
                } else {
                    DbError::Other(err.into())
                }
            }
            _ => DbError::Other(err.into()),
        }
    }
}
