use std::path::Path;

use rusqlite::Connection;
use tracing;

use super::DatabaseError;

const SCHEMA: &str = include_str!("../../resources/schema.sql");

/// Open a SQLite connection to the given path and create any missing tables.
///
/// Called once at startup. Request handlers use [`connect`].
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let existed = path.exists();
    let conn = connect(path)?;
    initialize_schema(&conn)?;
    if !existed {
        tracing::info!(path = %path.display(), "Created new database");
    }
    Ok(conn)
}

/// Open a connection without touching the schema.
pub fn connect(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    initialize_schema(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;"
    )?;
    Ok(())
}

/// Create tables and indexes if they do not exist. Safe to re-run.
pub fn initialize_schema(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(SCHEMA)
        .map_err(|e| DatabaseError::SchemaFailed { reason: e.to_string() })
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}
