//! Key-value table layout for the SQLite medium.
//!
//! Records are never migrated field-by-field: each collection is one JSON
//! document. The only layout concern is the table itself.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Layout version written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

/// Name of the table holding serialized collections.
pub const KV_TABLE: &str = "kv_items";

const CREATE_KV_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS kv_items (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Creates the key-value table on a fresh database, or checks the layout of
/// an existing one.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   layout.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current = user_version(conn)?;
    if current > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            supported: SCHEMA_VERSION,
        });
    }
    if current == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(CREATE_KV_TABLE_SQL)?;
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;
    Ok(())
}

/// Reads `PRAGMA user_version`.
pub fn user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
