pub mod sqlite;
pub mod repository;

pub use sqlite::*;
pub use repository::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Stored JSON could not be read or written: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Schema initialization failed: {reason}")]
    SchemaFailed { reason: String },
}
