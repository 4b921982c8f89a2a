//! Applies and reverts migrations, tracking them in `schema_migrations`.
//!
//! The ledger layout (a single `version` column) matches the one used by the
//! web application, so a database it already migrated is picked up as is.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use helpdesk_core::{MIGRATION_ADVISORY_LOCK_ID, SCHEMA_MIGRATIONS_TABLE, SchemaHooks};
use serde::Serialize;
use sqlx::{Connection, PgConnection, PgPool};

use crate::error::StorageError;
use crate::migrations::{self, Migration};
use crate::schema_helpers::table_exists;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    Applied,
    Pending,
    /// Recorded in the ledger but unknown to this binary.
    Orphaned,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub version: String,
    pub name: Option<String>,
    pub state: MigrationState,
}

#[derive(Clone, Copy, Debug)]
enum Direction {
    Up,
    Down,
}

pub struct Migrator {
    pool: PgPool,
    hooks: Arc<dyn SchemaHooks>,
    migrations: Vec<Box<dyn Migration>>,
}

impl Migrator {
    pub fn new(pool: PgPool, hooks: Arc<dyn SchemaHooks>) -> Self {
        Self::with_migrations(pool, hooks, migrations::all())
    }

    pub fn with_migrations(
        pool: PgPool,
        hooks: Arc<dyn SchemaHooks>,
        mut migrations: Vec<Box<dyn Migration>>,
    ) -> Self {
        migrations.sort_by_key(|m| m.version());
        Self { pool, hooks, migrations }
    }

    pub fn migrations(&self) -> &[Box<dyn Migration>] {
        &self.migrations
    }

    /// Apply every pending migration, oldest first. Returns the versions applied.
    pub async fn up(&self) -> Result<Vec<&'static str>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        lock(&mut conn).await?;
        let result = self.up_locked(&mut conn).await;
        let unlocked = unlock(&mut conn).await;
        let ran = result?;
        unlocked?;
        Ok(ran)
    }

    /// Revert the `steps` most recently applied migrations. Returns the versions reverted.
    pub async fn down(&self, steps: usize) -> Result<Vec<&'static str>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        lock(&mut conn).await?;
        let result = self.down_locked(&mut conn, steps).await;
        let unlocked = unlock(&mut conn).await;
        let reverted = result?;
        unlocked?;
        Ok(reverted)
    }

    /// Known migrations with their state, followed by any orphaned ledger rows.
    pub async fn status(&self) -> Result<Vec<MigrationStatus>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let applied = if table_exists(&mut conn, SCHEMA_MIGRATIONS_TABLE).await? {
            applied_versions(&mut conn).await?
        } else {
            HashSet::new()
        };

        let mut statuses: Vec<MigrationStatus> = self
            .migrations
            .iter()
            .map(|m| MigrationStatus {
                version: m.version().to_owned(),
                name: Some(m.name().to_owned()),
                state: if applied.contains(m.version()) {
                    MigrationState::Applied
                } else {
                    MigrationState::Pending
                },
            })
            .collect();

        let known: HashSet<&str> = self.migrations.iter().map(|m| m.version()).collect();
        let mut orphans: Vec<&String> =
            applied.iter().filter(|v| !known.contains(v.as_str())).collect();
        orphans.sort();
        statuses.extend(orphans.into_iter().map(|v| MigrationStatus {
            version: v.clone(),
            name: None,
            state: MigrationState::Orphaned,
        }));
        Ok(statuses)
    }

    async fn up_locked(&self, conn: &mut PgConnection) -> Result<Vec<&'static str>, StorageError> {
        ensure_ledger(conn).await?;
        let applied = applied_versions(conn).await?;

        let mut ran = Vec::new();
        for migration in self.migrations.iter().filter(|m| !applied.contains(m.version())) {
            self.run(conn, migration.as_ref(), Direction::Up)
                .await
                .map_err(|e| e.in_migration(migration.version()))?;
            ran.push(migration.version());
        }

        if ran.is_empty() {
            tracing::info!("schema up to date");
        }
        Ok(ran)
    }

    async fn down_locked(
        &self,
        conn: &mut PgConnection,
        steps: usize,
    ) -> Result<Vec<&'static str>, StorageError> {
        ensure_ledger(conn).await?;
        let applied = applied_versions(conn).await?;

        let targets: Vec<&dyn Migration> = self
            .migrations
            .iter()
            .rev()
            .filter(|m| applied.contains(m.version()))
            .take(steps)
            .map(|m| m.as_ref())
            .collect();

        let mut reverted = Vec::new();
        for migration in targets {
            self.run(conn, migration, Direction::Down)
                .await
                .map_err(|e| e.in_migration(migration.version()))?;
            reverted.push(migration.version());
        }
        Ok(reverted)
    }

    async fn run(
        &self,
        conn: &mut PgConnection,
        migration: &dyn Migration,
        direction: Direction,
    ) -> Result<(), StorageError> {
        let version = migration.version();
        let name = migration.name();
        tracing::info!(version, name, ?direction, "migrating");
        let started = Instant::now();

        if migration.transactional() {
            let mut tx = conn.begin().await?;
            step(&mut *tx, migration, &*self.hooks, direction).await?;
            tx.commit().await?;
        } else {
            step(conn, migration, &*self.hooks, direction).await?;
        }

        tracing::info!(
            version,
            name,
            ?direction,
            elapsed_secs = started.elapsed().as_secs_f64(),
            "migrated"
        );
        Ok(())
    }
}

/// Run one direction of a migration and update the ledger on the same connection.
async fn step(
    conn: &mut PgConnection,
    migration: &dyn Migration,
    hooks: &dyn SchemaHooks,
    direction: Direction,
) -> Result<(), StorageError> {
    match direction {
        Direction::Up => {
            migration.up(conn, hooks).await?;
            sqlx::query("INSERT INTO schema_migrations (version) VALUES ($1)")
                .bind(migration.version())
                .execute(&mut *conn)
                .await?;
        },
        Direction::Down => {
            migration.down(conn, hooks).await?;
            sqlx::query("DELETE FROM schema_migrations WHERE version = $1")
                .bind(migration.version())
                .execute(&mut *conn)
                .await?;
        },
    }
    Ok(())
}

async fn ensure_ledger(conn: &mut PgConnection) -> Result<(), StorageError> {
    sqlx::query("CREATE TABLE IF NOT EXISTS schema_migrations (version varchar PRIMARY KEY)")
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn applied_versions(conn: &mut PgConnection) -> Result<HashSet<String>, StorageError> {
    let versions = sqlx::query_scalar::<_, String>("SELECT version FROM schema_migrations")
        .fetch_all(&mut *conn)
        .await?;
    Ok(versions.into_iter().collect())
}

async fn lock(conn: &mut PgConnection) -> Result<(), StorageError> {
    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(MIGRATION_ADVISORY_LOCK_ID)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn unlock(conn: &mut PgConnection) -> Result<(), StorageError> {
    sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(MIGRATION_ADVISORY_LOCK_ID)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
