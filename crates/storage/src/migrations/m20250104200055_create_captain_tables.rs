//! Assistant ("captain") tables with optional pgvector embeddings.
//!
//! When the `vector` extension cannot be enabled the tables are still
//! created, with `jsonb` embeddings and no ANN indexes, so the rest of the
//! schema can migrate.

use async_trait::async_trait;
use helpdesk_core::{EMBEDDING_DIMENSION, SchemaHooks, VECTOR_EXTENSION};
use sqlx::PgConnection;

use super::Migration;
use crate::error::StorageError;
use crate::schema_helpers::{drop_table_if_exists, extension_enabled};

pub(crate) const ASSISTANTS_TABLE: &str = "captain_assistants";
pub(crate) const DOCUMENTS_TABLE: &str = "captain_documents";
pub(crate) const ASSISTANT_RESPONSES_TABLE: &str = "captain_assistant_responses";
pub(crate) const ARTICLE_EMBEDDINGS_TABLE: &str = "article_embeddings";

pub(crate) const RESPONSES_EMBEDDING_INDEX: &str = "vector_idx_knowledge_entries_embedding";
pub(crate) const ARTICLE_EMBEDDING_INDEX: &str = "index_article_embeddings_on_embedding";

/// Whether the `vector` type is usable in this database.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorSupport {
    Available,
    Unavailable,
}

impl VectorSupport {
    pub fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }

    fn embedding_column(self) -> String {
        match self {
            Self::Available => format!("embedding vector({EMBEDDING_DIMENSION})"),
            Self::Unavailable => "embedding jsonb DEFAULT '[]'::jsonb".to_owned(),
        }
    }
}

const TIMESTAMPS: &str = "created_at timestamp(6) NOT NULL,\n    updated_at timestamp(6) NOT NULL";

fn index_name(table: &str, columns: &[&str]) -> String {
    format!("index_{table}_on_{}", columns.join("_and_"))
}

fn create_index(table: &str, columns: &[&str], unique: bool) -> String {
    format!(
        "CREATE {}INDEX {} ON {table} ({})",
        if unique { "UNIQUE " } else { "" },
        index_name(table, columns),
        columns.join(", ")
    )
}

pub(crate) fn assistants_ddl() -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE {ASSISTANTS_TABLE} (
    id bigserial PRIMARY KEY,
    name varchar NOT NULL,
    account_id bigint NOT NULL,
    description varchar,
    {TIMESTAMPS}
)"
        ),
        create_index(ASSISTANTS_TABLE, &["account_id"], false),
        create_index(ASSISTANTS_TABLE, &["account_id", "name"], true),
    ]
}

pub(crate) fn documents_ddl() -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE {DOCUMENTS_TABLE} (
    id bigserial PRIMARY KEY,
    name varchar NOT NULL,
    external_link varchar NOT NULL,
    content text,
    assistant_id bigint NOT NULL,
    account_id bigint NOT NULL,
    {TIMESTAMPS}
)"
        ),
        create_index(DOCUMENTS_TABLE, &["account_id"], false),
        create_index(DOCUMENTS_TABLE, &["assistant_id"], false),
        create_index(DOCUMENTS_TABLE, &["assistant_id", "external_link"], true),
    ]
}

pub(crate) fn assistant_responses_ddl(vector: VectorSupport) -> Vec<String> {
    let mut ddl = vec![
        format!(
            "CREATE TABLE {ASSISTANT_RESPONSES_TABLE} (
    id bigserial PRIMARY KEY,
    question varchar NOT NULL,
    answer text NOT NULL,
    {},
    assistant_id bigint NOT NULL,
    document_id bigint,
    account_id bigint NOT NULL,
    {TIMESTAMPS}
)",
            vector.embedding_column()
        ),
        create_index(ASSISTANT_RESPONSES_TABLE, &["account_id"], false),
        create_index(ASSISTANT_RESPONSES_TABLE, &["assistant_id"], false),
        create_index(ASSISTANT_RESPONSES_TABLE, &["document_id"], false),
    ];
    if vector.is_available() {
        ddl.push(format!(
            "CREATE INDEX {RESPONSES_EMBEDDING_INDEX} ON {ASSISTANT_RESPONSES_TABLE} \
             USING ivfflat (embedding vector_l2_ops)"
        ));
    }
    ddl
}

/// Legacy embeddings table; may already exist from an earlier feature.
pub(crate) fn article_embeddings_ddl(vector: VectorSupport) -> Vec<String> {
    let mut ddl = vec![format!(
        "CREATE TABLE IF NOT EXISTS {ARTICLE_EMBEDDINGS_TABLE} (
    id bigserial PRIMARY KEY,
    article_id bigint NOT NULL,
    term text NOT NULL,
    {},
    {TIMESTAMPS}
)",
        vector.embedding_column()
    )];
    if vector.is_available() {
        ddl.push(format!(
            "CREATE INDEX IF NOT EXISTS {ARTICLE_EMBEDDING_INDEX} ON {ARTICLE_EMBEDDINGS_TABLE} \
             USING ivfflat (embedding vector_l2_ops)"
        ));
    }
    ddl
}

/// Full `up` DDL, in execution order, for the given vector support.
pub(crate) fn create_ddl(vector: VectorSupport) -> Vec<String> {
    let mut ddl = assistants_ddl();
    ddl.extend(documents_ddl());
    ddl.extend(assistant_responses_ddl(vector));
    ddl.extend(article_embeddings_ddl(vector));
    ddl
}

/// Tables removed by `down`, in drop order.
pub(crate) const DROP_ORDER: [&str; 4] =
    [ASSISTANT_RESPONSES_TABLE, DOCUMENTS_TABLE, ASSISTANTS_TABLE, ARTICLE_EMBEDDINGS_TABLE];

/// Make sure the `vector` extension is enabled, reporting whether it is.
///
/// A statement error from `CREATE EXTENSION` (not installed on the server,
/// insufficient privilege) means the extension is unsupported; anything else
/// is a real failure.
pub async fn setup_vector_extension(conn: &mut PgConnection) -> Result<VectorSupport, StorageError> {
    if extension_enabled(conn, VECTOR_EXTENSION).await? {
        return Ok(VectorSupport::Available);
    }

    let sql = format!("CREATE EXTENSION IF NOT EXISTS \"{VECTOR_EXTENSION}\"");
    match sqlx::query(&sql).execute(&mut *conn).await {
        Ok(_) => {
            tracing::info!(extension = VECTOR_EXTENSION, "extension enabled");
            Ok(VectorSupport::Available)
        },
        Err(sqlx::Error::Database(db_err)) => {
            tracing::warn!(
                extension = VECTOR_EXTENSION,
                error = %db_err.message(),
                "failed to enable extension"
            );
            Ok(VectorSupport::Unavailable)
        },
        Err(e) => Err(e.into()),
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CreateCaptainTables;

#[async_trait]
impl Migration for CreateCaptainTables {
    fn version(&self) -> &'static str {
        "20250104200055"
    }

    fn name(&self) -> &'static str {
        "create_captain_tables"
    }

    // A failed CREATE EXTENSION would abort the surrounding transaction.
    fn transactional(&self) -> bool {
        false
    }

    async fn up(
        &self,
        conn: &mut PgConnection,
        _hooks: &dyn SchemaHooks,
    ) -> Result<(), StorageError> {
        let vector = setup_vector_extension(conn).await?;
        if !vector.is_available() {
            tracing::warn!(
                extension = VECTOR_EXTENSION,
                "proceeding without the vector extension; captain stays disabled"
            );
        }

        for statement in create_ddl(vector) {
            sqlx::query(&statement).execute(&mut *conn).await?;
        }
        tracing::info!(vector = vector.is_available(), "captain tables created");
        Ok(())
    }

    async fn down(
        &self,
        conn: &mut PgConnection,
        _hooks: &dyn SchemaHooks,
    ) -> Result<(), StorageError> {
        // The extension stays: other tables may depend on it.
        for table in DROP_ORDER {
            drop_table_if_exists(conn, table).await?;
        }
        Ok(())
    }
}
