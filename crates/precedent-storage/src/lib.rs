//! # precedent-storage
//!
//! SQLite persistence for the legal graph: entities keyed by (id, version),
//! chunks keyed by (entity_id, chunk_index), citation edges, the status
//! log, cross-jurisdiction relations and the review queue. A single write
//! connection sits behind an async mutex; snapshots are saved and loaded
//! whole.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use serde::de::DeserializeOwned;
use serde::Serialize;

use precedent_core::errors::{PrecedentError, PrecedentResult, StorageError};

/// Wrap any storage failure message in the crate error type.
pub(crate) fn to_storage_err(message: String) -> PrecedentError {
    StorageError::SqliteError { message }.into()
}

/// Serialize a unit enum to its bare serde name (`"primary_statute"`).
pub(crate) fn enum_to_str<T: Serialize>(value: &T) -> PrecedentResult<String> {
    let json = serde_json::to_string(value)?;
    Ok(json.trim_matches('"').to_string())
}

/// Inverse of [`enum_to_str`].
pub(crate) fn enum_from_str<T: DeserializeOwned>(table: &str, raw: &str) -> PrecedentResult<T> {
    serde_json::from_str(&format!("\"{raw}\"")).map_err(|e| {
        StorageError::CorruptRow {
            table: table.to_string(),
            details: format!("bad enum value {raw:?}: {e}"),
        }
        .into()
    })
}

pub(crate) fn parse_time(
    table: &str,
    raw: &str,
) -> PrecedentResult<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| {
            StorageError::CorruptRow {
                table: table.to_string(),
                details: format!("bad timestamp {raw:?}: {e}"),
            }
            .into()
        })
}

pub(crate) fn parse_opt_time(
    table: &str,
    raw: Option<String>,
) -> PrecedentResult<Option<chrono::DateTime<chrono::Utc>>> {
    raw.map(|r| parse_time(table, &r)).transpose()
}

/// Fixed-width UTC timestamps so text comparison orders chronologically.
pub(crate) fn fmt_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
