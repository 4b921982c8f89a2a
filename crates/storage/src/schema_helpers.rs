//! Schema introspection and small DDL helpers.
//!
//! Every lookup is scoped to `current_schema()` so the same migrations can be
//! applied to any schema on the search path.

use sqlx::PgConnection;

use crate::error::StorageError;

/// Double-quote an identifier for interpolation into DDL.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

pub async fn extension_enabled(conn: &mut PgConnection, name: &str) -> Result<bool, StorageError> {
    let enabled = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM pg_extension WHERE extname::text = $1)",
    )
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;
    Ok(enabled)
}

pub async fn table_exists(conn: &mut PgConnection, table: &str) -> Result<bool, StorageError> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = current_schema() AND table_name::text = $1
        )
        "#,
    )
    .bind(table)
    .fetch_one(&mut *conn)
    .await?;
    Ok(exists)
}

pub async fn column_exists(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
) -> Result<bool, StorageError> {
    Ok(column_udt_name(conn, table, column).await?.is_some())
}

/// Underlying type name of a column (`vector`, `jsonb`, `varchar`, ...).
pub async fn column_udt_name(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
) -> Result<Option<String>, StorageError> {
    let udt = sqlx::query_scalar::<_, String>(
        r#"
        SELECT udt_name::text FROM information_schema.columns
        WHERE table_schema = current_schema() AND table_name::text = $1 AND column_name::text = $2
        "#,
    )
    .bind(table)
    .bind(column)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(udt)
}

/// Default expression of a column, as PostgreSQL renders it.
pub async fn column_default(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
) -> Result<Option<String>, StorageError> {
    let default = sqlx::query_scalar::<_, Option<String>>(
        r#"
        SELECT column_default::text FROM information_schema.columns
        WHERE table_schema = current_schema() AND table_name::text = $1 AND column_name::text = $2
        "#,
    )
    .bind(table)
    .bind(column)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(default.flatten())
}

pub async fn index_exists(conn: &mut PgConnection, index: &str) -> Result<bool, StorageError> {
    Ok(index_method(conn, index).await?.is_some())
}

/// Access method of an index (`btree`, `ivfflat`, ...).
pub async fn index_method(
    conn: &mut PgConnection,
    index: &str,
) -> Result<Option<String>, StorageError> {
    let method = sqlx::query_scalar::<_, String>(
        r#"
        SELECT am.amname::text
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_am am ON am.oid = c.relam
        WHERE c.relkind = 'i' AND c.relname::text = $1 AND n.nspname::text = current_schema()
        "#,
    )
    .bind(index)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(method)
}

pub async fn add_column_if_not_exists(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
    col_type: &str,
) -> Result<(), StorageError> {
    let sql = format!(
        "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {}",
        quote_ident(table),
        quote_ident(column),
        col_type
    );
    sqlx::query(&sql).execute(&mut *conn).await?;
    Ok(())
}

pub async fn drop_column_if_exists(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
) -> Result<(), StorageError> {
    let sql =
        format!("ALTER TABLE {} DROP COLUMN IF EXISTS {}", quote_ident(table), quote_ident(column));
    sqlx::query(&sql).execute(&mut *conn).await?;
    Ok(())
}

pub async fn drop_table_if_exists(conn: &mut PgConnection, table: &str) -> Result<(), StorageError> {
    let sql = format!("DROP TABLE IF EXISTS {}", quote_ident(table));
    sqlx::query(&sql).execute(&mut *conn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::quote_ident;

    #[test]
    fn quotes_plain_identifier() {
        assert_eq!(quote_ident("conversations"), "\"conversations\"");
    }

    #[test]
    fn escapes_embedded_quotes() {
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
