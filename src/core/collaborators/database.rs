use async_trait::async_trait;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, ToSql};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::error::EngineResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMeta {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutput {
    /// Positional rows, one JSON array per row.
    pub rows: Vec<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub meta_data: Vec<ColumnMeta>,
}

/// Executes parameterized statements against the profile store.
///
/// Binds are named (`:name`); keys may be given with or without the colon.
#[async_trait]
pub trait RelationalExecutor: Send + Sync {
    async fn execute(&self, sql: &str, binds: &Map<String, Value>) -> EngineResult<QueryOutput>;

    async fn ping(&self) -> EngineResult<()>;
}

/// INSERT/UPDATE/DELETE statements are committed by the executor.
pub fn is_dml(sql: &str) -> bool {
    let head: String = sql
        .trim_start()
        .chars()
        .take(6)
        .collect::<String>()
        .to_ascii_uppercase();
    head.starts_with("INSERT") || head.starts_with("UPDATE") || head.starts_with("DELETE")
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn to_json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) | ValueRef::Blob(t) => {
            Value::String(String::from_utf8_lossy(t).into_owned())
        }
    }
}

fn named_binds(binds: &Map<String, Value>) -> Vec<(String, SqlValue)> {
    binds
        .iter()
        .map(|(k, v)| {
            let name = if k.starts_with(':') {
                k.clone()
            } else {
                format!(":{}", k)
            };
            (name, to_sql_value(v))
        })
        .collect()
}

/// SQLite-backed profile store.
pub struct SqliteExecutor {
    db: Arc<Mutex<Connection>>,
}

impl SqliteExecutor {
    pub fn open<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        Self::from_connection(Connection::open(path.as_ref())?)
    }

    #[cfg(test)]
    pub fn in_memory() -> EngineResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(db: Connection) -> EngineResult<Self> {
        db.execute(
            "CREATE TABLE IF NOT EXISTS client_profiles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                full_name TEXT NOT NULL,
                title TEXT,
                company TEXT,
                location TEXT,
                industry TEXT,
                company_size TEXT,
                ai_score REAL,
                linkedin_url TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;
        db.execute(
            "CREATE TABLE IF NOT EXISTS profiles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                full_name TEXT NOT NULL,
                title TEXT,
                company TEXT,
                location TEXT,
                status TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;
        db.execute(
            "CREATE INDEX IF NOT EXISTS idx_client_profiles_score_created
             ON client_profiles(ai_score, created_at)",
            [],
        )?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    #[cfg(test)]
    pub fn get_db(&self) -> Arc<Mutex<Connection>> {
        self.db.clone()
    }
}

#[async_trait]
impl RelationalExecutor for SqliteExecutor {
    async fn execute(&self, sql: &str, binds: &Map<String, Value>) -> EngineResult<QueryOutput> {
        let owned = named_binds(binds);
        debug!("SQL: {} ({} binds)", sql.trim(), owned.len());

        // Guard is held for the whole statement and released on every return path.
        let mut db = self.db.lock().await;
        let params: Vec<(&str, &dyn ToSql)> = owned
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();

        if is_dml(sql) {
            let tx = db.transaction()?;
            let affected = {
                let mut stmt = tx.prepare(sql)?;
                stmt.execute(params.as_slice())?
            };
            tx.commit()?;
            return Ok(QueryOutput {
                rows: Vec::new(),
                rows_affected: Some(affected),
                meta_data: Vec::new(),
            });
        }

        let mut stmt = db.prepare(sql)?;
        let meta_data: Vec<ColumnMeta> = stmt
            .column_names()
            .into_iter()
            .map(|name| ColumnMeta {
                name: name.to_uppercase(),
            })
            .collect();
        let width = meta_data.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query(params.as_slice())?;
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(to_json_value(row.get_ref(i)?));
            }
            rows.push(values);
        }

        Ok(QueryOutput {
            rows,
            rows_affected: None,
            meta_data,
        })
    }

    async fn ping(&self) -> EngineResult<()> {
        let db = self.db.lock().await;
        db.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}
