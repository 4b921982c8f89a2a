//! Shared constants for the helpdesk schema.
//!
//! Table, column and extension names used by more than one crate live here.

/// Name of the optional PostgreSQL extension providing the `vector` type.
pub const VECTOR_EXTENSION: &str = "vector";

/// Embedding vector dimension for assistant responses and article embeddings.
pub const EMBEDDING_DIMENSION: usize = 1536;

/// Table holding conversations; gains the cached label list.
pub const CONVERSATIONS_TABLE: &str = "conversations";

/// Ledger of applied migration versions.
pub const SCHEMA_MIGRATIONS_TABLE: &str = "schema_migrations";

/// Key for the session advisory lock held while migrating.
pub const MIGRATION_ADVISORY_LOCK_ID: i64 = 2_053_462_845_191_207_170;

/// PostgreSQL connection pool: default maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 2;

/// PostgreSQL connection pool: default acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Environment variable holding the PostgreSQL connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable overriding [`PG_POOL_MAX_CONNECTIONS`].
pub const MAX_CONNECTIONS_ENV: &str = "HELPDESK_DB_MAX_CONNECTIONS";

/// Environment variable overriding [`PG_POOL_ACQUIRE_TIMEOUT_SECS`].
pub const ACQUIRE_TIMEOUT_ENV: &str = "HELPDESK_DB_ACQUIRE_TIMEOUT_SECS";
