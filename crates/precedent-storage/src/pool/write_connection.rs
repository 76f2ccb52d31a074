//! Single write connection behind `tokio::sync::Mutex`.

use std::path::Path;

use rusqlite::Connection;
use tokio::sync::Mutex;
use tracing::debug;

use precedent_core::errors::PrecedentResult;

use super::pragmas::apply_pragmas;
use crate::migrations;
use crate::to_storage_err;

/// A single write connection protected by an async mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open a new write connection to the given database path.
    pub fn open(path: &Path) -> PrecedentResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        Self::prepare(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> PrecedentResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        Self::prepare(conn)
    }

    /// Pragmas and migrations run on the bare connection, before the mutex
    /// exists, so opening never blocks on a lock and is safe inside a
    /// Tokio runtime.
    fn prepare(conn: Connection) -> PrecedentResult<Self> {
        apply_pragmas(&conn)?;
        let version = migrations::run_migrations(&conn)?;
        debug!(version, "storage schema ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the write lock and execute a closure with the connection.
    pub async fn with_conn<F, T>(&self, f: F) -> PrecedentResult<T>
    where
        F: FnOnce(&Connection) -> PrecedentResult<T>,
    {
        let guard = self.conn.lock().await;
        f(&guard)
    }

    /// Synchronous access for non-async contexts (startup migrations, CLI tools).
    /// Must not be called from inside a Tokio runtime.
    pub fn with_conn_sync<F, T>(&self, f: F) -> PrecedentResult<T>
    where
        F: FnOnce(&Connection) -> PrecedentResult<T>,
    {
        let guard = self.conn.blocking_lock();
        f(&guard)
    }
}
