use deadpool_postgres::{BuildError, PoolError};
use thiserror::Error;

// DbError is the lowest level error type, wrapping errors from the database layer. It does not wrap
// any higher level errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique constraint violation
    #[error("unique violation: {0}")]
    UniqueViolation(String),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Pg(#[from] tokio_postgres::Error),

    #[error(transparent)]
    Migrate(#[from] refinery::Error),

    #[error(transparent)]
    Build(#[from] BuildError),
}

impl DbError {
    /// Lifts constraint violations out of a raw driver error.
    pub fn from_pg(e: tokio_postgres::Error) -> Self {
        if let Some(db_err) = e.as_db_error() {
            if *db_err.code() == tokio_postgres::error::SqlState::UNIQUE_VIOLATION {
                let what = db_err.constraint().unwrap_or("unknown").to_string();
                return DbError::UniqueViolation(what);
            }
        }
        DbError::Pg(e)
    }
}
