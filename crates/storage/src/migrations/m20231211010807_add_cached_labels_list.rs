//! Denormalized label list on conversations.

use async_trait::async_trait;
use helpdesk_core::{CONVERSATIONS_TABLE, SchemaHooks};
use sqlx::PgConnection;

use super::Migration;
use crate::error::StorageError;
use crate::schema_helpers::{add_column_if_not_exists, drop_column_if_exists};

pub(crate) const CACHED_LABEL_LIST_COLUMN: &str = "cached_label_list";

#[derive(Clone, Copy, Debug, Default)]
pub struct AddCachedLabelsList;

#[async_trait]
impl Migration for AddCachedLabelsList {
    fn version(&self) -> &'static str {
        "20231211010807"
    }

    fn name(&self) -> &'static str {
        "add_cached_labels_list"
    }

    async fn up(
        &self,
        conn: &mut PgConnection,
        hooks: &dyn SchemaHooks,
    ) -> Result<(), StorageError> {
        add_column_if_not_exists(conn, CONVERSATIONS_TABLE, CACHED_LABEL_LIST_COLUMN, "varchar")
            .await?;
        hooks.reset_column_information(CONVERSATIONS_TABLE);

        if !hooks.register_label_cache(CONVERSATIONS_TABLE) {
            tracing::warn!(table = CONVERSATIONS_TABLE, "label cache missing, skipping include");
        }
        Ok(())
    }

    async fn down(
        &self,
        conn: &mut PgConnection,
        hooks: &dyn SchemaHooks,
    ) -> Result<(), StorageError> {
        drop_column_if_exists(conn, CONVERSATIONS_TABLE, CACHED_LABEL_LIST_COLUMN).await?;
        hooks.reset_column_information(CONVERSATIONS_TABLE);
        Ok(())
    }
}
