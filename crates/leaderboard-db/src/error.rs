//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] errors. At the [`ResultStore`](leaderboard_core::ResultStore)
//! boundary they are flattened into a [`StoreError`].

use leaderboard_core::StoreError;

/// SQLSTATE raised when `statement_timeout` cancels a query.
const QUERY_CANCELED: &str = "57014";

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A board was handed to a query it does not belong to.
    #[error("board {0} does not accept this operation")]
    WrongBoard(&'static str),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Postgres(sqlx::Error::PoolTimedOut) => Self::Timeout(err.to_string()),
            DbError::Postgres(sqlx::Error::Database(ref db))
                if db.code().as_deref() == Some(QUERY_CANCELED) =>
            {
                Self::Timeout(err.to_string())
            }
            DbError::WrongBoard(table) => Self::WrongBoard { table },
            other => Self::Backend(other.to_string()),
        }
    }
}
