//! Typed error enum for the storage layer.
//!
//! Lets callers tell a broken connection apart from a migration whose DDL
//! was rejected, instead of downcasting opaque boxes.

use helpdesk_core::ConfigError;
use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQL / connection / timeout failure outside a migration body.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A migration's DDL failed; the version identifies which one.
    #[error("migration {version} failed: {source}")]
    Migration {
        version: &'static str,
        #[source]
        source: Box<StorageError>,
    },

    /// Connection settings could not be assembled.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl StorageError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) => true,
            Self::Migration { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// Whether this is a statement-level error reported by the server, as
    /// opposed to a transport failure.
    pub fn is_statement_error(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(_)) => true,
            Self::Migration { source, .. } => source.is_statement_error(),
            _ => false,
        }
    }

    pub(crate) fn in_migration(self, version: &'static str) -> Self {
        match self {
            already @ Self::Migration { .. } => already,
            other => Self::Migration { version, source: Box::new(other) },
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_transient() {
        assert!(StorageError::from(sqlx::Error::PoolTimedOut).is_transient());
        assert!(!StorageError::from(sqlx::Error::RowNotFound).is_transient());
    }

    #[test]
    fn migration_wraps_once_and_keeps_source_kind() {
        let err = StorageError::from(sqlx::Error::PoolTimedOut)
            .in_migration("20250104200055")
            .in_migration("20231211010807");
        match &err {
            StorageError::Migration { version, .. } => assert_eq!(*version, "20250104200055"),
            other => panic!("expected migration error, got {other:?}"),
        }
        assert!(err.is_transient());
        assert!(!err.is_statement_error());
        assert!(err.to_string().contains("20250104200055"));
    }
}
