//! PostgreSQL schema migrations for the helpdesk application.
//!
//! Two one-shot migrations (a cached label column on conversations and the
//! assistant tables with optional pgvector embeddings), the ledger
//! bookkeeping that runs them, and the introspection helpers they share.

mod error;
pub mod migrations;
mod migrator;
mod pool;
pub mod schema_helpers;
#[cfg(test)]
mod tests;

pub use error::StorageError;
pub use migrations::{
    AddCachedLabelsList, CreateCaptainTables, Migration, VectorSupport, setup_vector_extension,
};
pub use migrator::{MigrationState, MigrationStatus, Migrator};
pub use pool::connect;
