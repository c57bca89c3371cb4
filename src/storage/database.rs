use crate::storage::errors::{Result, StorageError};
use crate::storage::schema;
use rusqlite::Connection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Connection statistics for monitoring
#[derive(Debug, Default)]
pub struct ConnectionStats {
    pub operations_count: AtomicU64,
    pub transaction_count: AtomicU64,
    pub error_count: AtomicU64,
    pub total_time_ms: AtomicU64,
}

impl ConnectionStats {
    pub fn record_operation(&self, duration: Duration) {
        self.operations_count.fetch_add(1, Ordering::Relaxed);
        self.total_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_transaction(&self) {
        self.transaction_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> (u64, u64, u64, u64) {
        (
            self.operations_count.load(Ordering::Relaxed),
            self.transaction_count.load(Ordering::Relaxed),
            self.error_count.load(Ordering::Relaxed),
            self.total_time_ms.load(Ordering::Relaxed),
        )
    }
}

/// Game archive backed by a single SQLite connection.
///
/// Cloning is cheap; clones share the connection and statistics.
#[derive(Clone)]
pub struct Archive {
    conn: Arc<Mutex<Connection>>,
    stats: Arc<ConnectionStats>,
}

impl Archive {
    /// Open (or create) the archive at `db_path`
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::database_path_error(format!(
                    "Failed to create database directory: {}",
                    e
                ))
            })?;
        }

        let conn = Self::create_optimized_connection(db_path)?;
        debug!("Opened game archive at {}", db_path.display());
        Self::from_connection(conn)
    }

    /// Archive that lives only as long as the process
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let archive = Archive {
            conn: Arc::new(Mutex::new(conn)),
            stats: Arc::new(ConnectionStats::default()),
        };

        archive.run_migrations()?;
        Ok(archive)
    }

    /// Create a connection with optimal SQLite settings
    fn create_optimized_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", true)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "memory")?;

        Ok(conn)
    }

    fn run_migrations(&self) -> Result<()> {
        self.with_connection(schema::initialize_schema)
    }

    /// Get database statistics
    pub fn get_connection_stats(&self) -> (u64, u64, u64, u64) {
        self.stats.get_stats()
    }

    /// Execute a closure with access to the connection
    pub fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let start_time = Instant::now();
        let conn = self
            .conn
            .lock()
            .map_err(|_| StorageError::invalid_data("archive connection lock poisoned"))?;

        match f(&*conn) {
            Ok(result) => {
                self.stats.record_operation(start_time.elapsed());
                Ok(result)
            }
            Err(e) => {
                self.stats.record_error();
                Err(e)
            }
        }
    }

    /// Execute a transaction with automatic rollback on error
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let start_time = Instant::now();
        let conn = self
            .conn
            .lock()
            .map_err(|_| StorageError::invalid_data("archive connection lock poisoned"))?;

        let tx = conn
            .unchecked_transaction()
            .map_err(StorageError::ConnectionFailed)?;

        match f(&*tx) {
            Ok(result) => {
                tx.commit().map_err(StorageError::ConnectionFailed)?;
                self.stats.record_operation(start_time.elapsed());
                self.stats.record_transaction();
                Ok(result)
            }
            Err(e) => {
                let _ = tx.rollback(); // Ignore rollback errors, return original error
                self.stats.record_error();
                Err(e)
            }
        }
    }

    /// Get current Unix timestamp
    pub fn current_timestamp() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}
