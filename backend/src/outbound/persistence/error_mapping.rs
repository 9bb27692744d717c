//! Shared classification of pool and Diesel failures.
//!
//! Repositories turn a [`DbFailure`] into their own port error so constraint
//! violations keep their meaning (duplicate email, missing reference) while
//! everything else becomes a generic query or connection failure.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse failure categories shared by every repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// Connection could not be obtained or was lost.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation(String),
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation(String),
    /// Any other failure.
    Query(String),
}

impl From<PoolError> for DbFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for DbFailure {
    fn from(error: DieselError) -> Self {
        match error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
                let constraint = info.constraint_name().unwrap_or("unknown").to_owned();
                match kind {
                    DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(constraint),
                    DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(constraint),
                    DatabaseErrorKind::ClosedConnection => {
                        Self::Connection("database connection error".to_owned())
                    }
                    _ => Self::Query("database error".to_owned()),
                }
            }
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            other => {
                debug!(error = %other, "diesel operation failed");
                Self::Query("database error".to_owned())
            }
        }
    }
}
