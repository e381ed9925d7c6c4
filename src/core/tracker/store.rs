use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::error::EngineResult;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Expiring key-value store used for execution records.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Replace the value under `key`; it stops being readable `ttl_secs` after this write.
    async fn set_with_ttl(&self, key: &str, ttl_secs: u64, value: &str) -> EngineResult<()>;

    async fn get(&self, key: &str) -> EngineResult<Option<String>>;

    async fn ping(&self) -> EngineResult<()>;

    /// Reclaim space held by expired entries. Reads already ignore them.
    async fn purge_expired(&self) -> EngineResult<usize> {
        Ok(0)
    }
}

pub struct SqliteKeyValueStore {
    db: Arc<Mutex<Connection>>,
    clock: Clock,
}

impl SqliteKeyValueStore {
    pub fn open<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let db = Connection::open(path.as_ref())?;
        Self::from_connection(db)
    }

    #[cfg(test)]
    pub fn in_memory() -> EngineResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(db: Connection) -> EngineResult<Self> {
        db.execute(
            "CREATE TABLE IF NOT EXISTS kv_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            )",
            [],
        )?;
        db.execute(
            "CREATE INDEX IF NOT EXISTS idx_kv_entries_expires_at ON kv_entries(expires_at)",
            [],
        )?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            clock: system_clock(),
        })
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn now_secs(&self) -> i64 {
        (self.clock)().timestamp()
    }

    /// Number of stored entries, expired or not.
    #[cfg(test)]
    pub(crate) async fn len(&self) -> EngineResult<usize> {
        let db = self.db.lock().await;
        let count: i64 = db.query_row("SELECT COUNT(*) FROM kv_entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Every stored value in key order, expired or not.
    #[cfg(test)]
    pub(crate) async fn values(&self) -> EngineResult<Vec<String>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare("SELECT value FROM kv_entries ORDER BY key")?;
        let values = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn set_with_ttl(&self, key: &str, ttl_secs: u64, value: &str) -> EngineResult<()> {
        let expires_at = self.now_secs() + ttl_secs as i64;
        let db = self.db.lock().await;
        db.execute(
            "INSERT OR REPLACE INTO kv_entries (key, value, expires_at) VALUES (?1, ?2, ?3)",
            params![key, value, expires_at],
        )?;
        Ok(())
    }

    async fn get(&self, key: &str) -> EngineResult<Option<String>> {
        let now = self.now_secs();
        let db = self.db.lock().await;
        let value = db
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1 AND expires_at > ?2",
                params![key, now],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn ping(&self) -> EngineResult<()> {
        let db = self.db.lock().await;
        db.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    async fn purge_expired(&self) -> EngineResult<usize> {
        let now = self.now_secs();
        let db = self.db.lock().await;
        let removed = db.execute("DELETE FROM kv_entries WHERE expires_at <= ?1", params![now])?;
        if removed > 0 {
            debug!("Purged {} expired key-value entries", removed);
        }
        Ok(removed)
    }
}
