//! Versioned schema migrations. Each migration runs once, inside a
//! transaction, and records itself in `schema_version`.

mod v001_initial_schema;

use rusqlite::Connection;
use tracing::info;

use precedent_core::errors::{PrecedentResult, StorageError};

use crate::to_storage_err;

type Migration = fn(&Connection) -> PrecedentResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[(1, v001_initial_schema::migrate)];

/// Latest schema version known to this build.
pub const LATEST_VERSION: u32 = 1;

/// Highest applied schema version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> PrecedentResult<u32> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
            [],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if !exists {
        return Ok(0);
    }
    conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| {
        row.get(0)
    })
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Apply every migration newer than the database's schema version.
pub fn run_migrations(conn: &Connection) -> PrecedentResult<u32> {
    let mut version = current_version(conn)?;
    for &(target, migrate) in MIGRATIONS {
        if target <= version {
            continue;
        }
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(e.to_string()))?;
        migrate(&tx).map_err(|e| StorageError::MigrationFailed {
            version: target,
            reason: e.to_string(),
        })?;
        tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [target])
            .map_err(|e| to_storage_err(e.to_string()))?;
        tx.commit().map_err(|e| to_storage_err(e.to_string()))?;
        info!(version = target, "applied schema migration");
        version = target;
    }
    Ok(version)
}
