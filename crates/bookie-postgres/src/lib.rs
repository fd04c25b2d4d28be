#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Embeds all migrations into the final binary.
pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!();

// Tracing target constants for consistent logging.

/// Tracing target for client-related operations.
pub const TRACING_TARGET_CLIENT: &str = "bookie_postgres::client";

/// Tracing target for database query operations.
pub const TRACING_TARGET_QUERY: &str = "bookie_postgres::queries";

/// Tracing target for database migration operations.
pub const TRACING_TARGET_MIGRATION: &str = "bookie_postgres::migrations";

/// Tracing target for connection establishment and pool management.
pub const TRACING_TARGET_CONNECTION: &str = "bookie_postgres::connection";

mod client;
pub mod model;
pub mod query;
mod schema;
pub mod types;

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::ConnectionError;
use diesel::result::{DatabaseErrorKind, Error};
pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{
    ConnectionPool, MigrationResult, PgClient, PgClientMigrationExt, PgConfig, PgConn,
    PgPoolStatus, PooledConnection,
};
use crate::types::ConstraintViolation;

pub mod error {
    //! Error types and utilities for database operations.

    /// Type-erased error type for dynamic error handling.
    pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

    pub use deadpool::managed::TimeoutType;
    pub use diesel::result::{ConnectionError as DieselConnectionError, Error as DieselError};
    pub use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;
}

/// Error type for all PostgreSQL database operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    /// Invalid configuration parameters.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database operation timed out.
    ///
    /// This can occur during connection creation, waiting for available connections,
    /// or connection recycling operations.
    #[error("Database operation timed out")]
    Timeout(TimeoutType),

    /// Failed to establish or maintain a database connection.
    #[error("Database connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Database migration operation failed.
    #[error("Database migration error: {0}")]
    Migration(error::BoxError),

    /// Database query execution failed.
    #[error("Database query error: {0}")]
    Query(#[from] Error),

    /// Unexpected error occurred.
    #[error("Unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    /// Extracts the constraint name from a constraint violation error.
    pub fn constraint(&self) -> Option<&str> {
        let PgError::Query(err) = self else {
            return None;
        };

        let Error::DatabaseError(_, err) = err else {
            return None;
        };

        err.constraint_name()
    }

    /// Returns a structured constraint violation if this error represents one.
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        self.constraint().and_then(ConstraintViolation::new)
    }

    /// Returns whether this error is a unique constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            PgError::Query(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        )
    }

    /// Returns whether this error indicates a transient failure that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PgError::Timeout(_) | PgError::Connection(ConnectionError::BadConnection(_))
        )
    }
}

impl From<error::DeadpoolError> for PgError {
    fn from(value: error::DeadpoolError) -> Self {
        use deadpool::managed::PoolError;

        match value {
            PoolError::Timeout(timeout) => Self::Timeout(timeout),
            PoolError::Backend(backend) => match backend {
                diesel_async::pooled_connection::PoolError::ConnectionError(e) => {
                    Self::Connection(e)
                }
                diesel_async::pooled_connection::PoolError::QueryError(e) => Self::Query(e),
            },
            PoolError::Closed => Self::Unexpected("Connection pool is closed".into()),
            PoolError::NoRuntimeSpecified => {
                Self::Unexpected("No async runtime specified for the pool".into())
            }
            PoolError::PostCreateHook(e) => {
                Self::Unexpected(format!("Post-create hook failed: {e}").into())
            }
        }
    }
}

/// Specialized [`Result`] type for database operations.
///
/// [`Result`]: std::result::Result
pub type PgResult<T, E = PgError> = Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_not_transient() {
        let err = PgError::Config("bad".into());
        assert!(!err.is_transient());
        assert!(!err.is_unique_violation());
        assert!(err.constraint().is_none());
    }

    #[test]
    fn timeouts_are_transient() {
        assert!(PgError::Timeout(TimeoutType::Wait).is_transient());
    }
}
