//! Shared types for the HTTP layer: request context and lenient input
//! coercion.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::db::{self, DatabaseError};
use crate::knowledge::KnowledgeBase;

// ═══════════════════════════════════════════════════════════
// API context — shared state for all routes
// ═══════════════════════════════════════════════════════════

/// Read-only state shared by every handler.
///
/// Holds the database location rather than a connection: each request
/// opens its own connection and drops it when the handler returns.
#[derive(Clone)]
pub struct ApiContext {
    db_path: Arc<PathBuf>,
    pub knowledge: Arc<KnowledgeBase>,
}

impl ApiContext {
    pub fn new(db_path: impl Into<PathBuf>, knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
            knowledge,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection scoped to the calling request.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::connect(&self.db_path)
    }
}

// ═══════════════════════════════════════════════════════════
// Lenient field coercion
// ═══════════════════════════════════════════════════════════
//
// Form clients send numbers as strings and may omit or null any field.
// These never fail: anything unusable becomes the field's default.

fn coerce_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Integer from a number or numeric string; anything else is 0.
pub fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_int).unwrap_or(0))
}

/// Identifier from a number or numeric string; 0 and garbage mean "none".
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = lenient_int(deserializer)?;
    Ok((id != 0).then_some(id))
}

/// String from a string or number; null and other shapes become "".
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// String list from an array of strings or a comma-separated string.
/// Non-string array members are skipped.
pub fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    })
}
