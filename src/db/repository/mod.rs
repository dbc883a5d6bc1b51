//! Repository layer — entity-scoped database operations.

mod patient;
mod visit;

pub use patient::*;
pub use visit::*;

use chrono::NaiveDateTime;

use crate::models::TIMESTAMP_FORMAT;

fn now_timestamp() -> String {
    chrono::Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp. Unparseable values fall back to the epoch and
/// are logged so corrupt rows stay visible.
fn parse_timestamp(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).unwrap_or_else(|e| {
        tracing::warn!(value, error = %e, "Unparseable stored timestamp");
        NaiveDateTime::default()
    })
}
