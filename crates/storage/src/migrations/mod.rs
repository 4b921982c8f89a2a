//! Versioned schema migrations.
//!
//! Each migration is a one-shot pair of `up`/`down` procedures identified by
//! a timestamp version. [`all`] returns them in the order they must run.

pub(crate) mod m20231211010807_add_cached_labels_list;
pub(crate) mod m20250104200055_create_captain_tables;

use async_trait::async_trait;
use helpdesk_core::SchemaHooks;
use sqlx::PgConnection;

use crate::error::StorageError;

pub use m20231211010807_add_cached_labels_list::AddCachedLabelsList;
pub use m20250104200055_create_captain_tables::{
    CreateCaptainTables, VectorSupport, setup_vector_extension,
};

#[async_trait]
pub trait Migration: Send + Sync {
    /// Timestamp version recorded in the ledger, e.g. `20231211010807`.
    fn version(&self) -> &'static str;

    fn name(&self) -> &'static str;

    /// Whether `up`/`down` run inside a transaction together with the ledger
    /// update. Migrations that must survive a failed statement opt out.
    fn transactional(&self) -> bool {
        true
    }

    async fn up(&self, conn: &mut PgConnection, hooks: &dyn SchemaHooks)
    -> Result<(), StorageError>;

    async fn down(
        &self,
        conn: &mut PgConnection,
        hooks: &dyn SchemaHooks,
    ) -> Result<(), StorageError>;
}

/// Every known migration, oldest first.
pub fn all() -> Vec<Box<dyn Migration>> {
    vec![Box::new(AddCachedLabelsList), Box::new(CreateCaptainTables)]
}
