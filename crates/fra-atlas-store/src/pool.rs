// SPDX-License-Identifier: Apache-2.0

use crate::schema::{migrate, verify_schema};
use crate::StoreError;
use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{info, info_span};

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
    pub max_connections: usize,
    pub busy_timeout: Duration,
    pub auto_migrate: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/fra_atlas.sqlite"),
            max_connections: 8,
            busy_timeout: Duration::from_millis(5000),
            auto_migrate: false,
        }
    }
}

/// Opens a read-write connection with the pragmas every checkout needs.
pub fn open_connection(cfg: &DbConfig) -> Result<Connection, StoreError> {
    let conn = Connection::open_with_flags(
        &cfg.path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_URI,
    )?;
    conn.busy_timeout(cfg.busy_timeout)?;
    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA synchronous=NORMAL;")?;
    let _mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
    conn.set_prepared_statement_cache_capacity(64);
    Ok(conn)
}

/// Bounded SQLite connection pool shared by request handlers.
///
/// At most `max_connections` connections are checked out at once. Work runs
/// on the blocking thread pool while the permit is held.
#[derive(Debug, Clone)]
pub struct Database {
    cfg: Arc<DbConfig>,
    permits: Arc<Semaphore>,
}

impl Database {
    pub fn open(cfg: DbConfig) -> Result<Self, StoreError> {
        if cfg.max_connections == 0 {
            return Err(StoreError::Validation(
                fra_atlas_model::ValidationError::new("max_connections", "must be > 0"),
            ));
        }
        if let Some(parent) = cfg.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let _span = info_span!("db_open", path = %cfg.path.display()).entered();
        let mut conn = open_connection(&cfg)?;
        if cfg.auto_migrate {
            migrate(&mut conn)?;
        } else {
            verify_schema(&conn)?;
        }
        info!(
            max_connections = cfg.max_connections,
            auto_migrate = cfg.auto_migrate,
            "database ready"
        );
        let permits = Arc::new(Semaphore::new(cfg.max_connections));
        Ok(Self {
            cfg: Arc::new(cfg),
            permits,
        })
    }

    #[must_use]
    pub fn config(&self) -> &DbConfig {
        &self.cfg
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    /// Runs `f` against a fresh connection on the blocking pool.
    pub async fn with_connection<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Connection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| E::from(StoreError::PoolClosed))?;
        let cfg = Arc::clone(&self.cfg);
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let mut conn = open_connection(&cfg).map_err(E::from)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| E::from(StoreError::Task(e.to_string())))?
    }

    /// Rejects new checkouts. Work already holding a permit finishes.
    pub fn close(&self) {
        self.permits.close();
        info!("database pool closed");
    }
}
