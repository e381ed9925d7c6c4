//! Execution records: one expiring JSON document per tool invocation.
//!
//! Records live under `execution:{id}` in the key-value store (the body
//! repeats the id) with a fixed one-hour TTL counted from the most recent
//! write. Every write replaces the whole record, so concurrent executions
//! never read-modify-write each other.

pub mod store;

use chrono::SecondsFormat;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::core::error::{EngineError, EngineResult};
pub use store::{Clock, KeyValueStore, SqliteKeyValueStore, system_clock};

pub const EXECUTION_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Running,
    Completed,
    Failed,
}

impl ExecutionStatus {
    #[cfg(test)]
    pub fn is_terminal(self) -> bool {
        !matches!(self, ExecutionStatus::Running)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    #[serde(default)]
    pub execution_id: String,
    pub tool_name: String,
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status: ExecutionStatus,
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Handle returned by [`ExecutionTracker::begin`]. Carries what the terminal
/// write must preserve, so finishing an execution never reads the store.
#[derive(Debug, Clone)]
pub struct TrackedExecution {
    pub execution_id: String,
    tool_name: String,
    input: Value,
    start_time: String,
}

#[derive(Clone)]
pub struct ExecutionTracker {
    store: Arc<dyn KeyValueStore>,
    clock: Clock,
}

fn record_key(execution_id: &str) -> String {
    format!("execution:{}", execution_id)
}

fn random_suffix(len: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

impl ExecutionTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: system_clock(),
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn timestamp(&self) -> String {
        (self.clock)().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn next_execution_id(&self) -> String {
        format!(
            "exec_{}_{}",
            (self.clock)().timestamp_millis(),
            random_suffix(9)
        )
    }

    async fn write(&self, execution_id: &str, record: &ExecutionRecord) -> EngineResult<()> {
        let body = serde_json::to_string(record)?;
        self.store
            .set_with_ttl(&record_key(execution_id), EXECUTION_TTL_SECS, &body)
            .await
    }

    pub async fn begin(&self, tool_name: &str, input: &Value) -> EngineResult<TrackedExecution> {
        let tracked = TrackedExecution {
            execution_id: self.next_execution_id(),
            tool_name: tool_name.to_string(),
            input: input.clone(),
            start_time: self.timestamp(),
        };
        let record = ExecutionRecord {
            execution_id: tracked.execution_id.clone(),
            tool_name: tracked.tool_name.clone(),
            input: tracked.input.clone(),
            result: None,
            error: None,
            status: ExecutionStatus::Running,
            start_time: tracked.start_time.clone(),
            end_time: None,
        };
        self.write(&tracked.execution_id, &record).await?;
        Ok(tracked)
    }

    /// Write the terminal `completed` record. Call at most once per execution.
    pub async fn complete(&self, tracked: &TrackedExecution, result: &Value) -> EngineResult<()> {
        let record = ExecutionRecord {
            execution_id: tracked.execution_id.clone(),
            tool_name: tracked.tool_name.clone(),
            input: tracked.input.clone(),
            result: Some(result.clone()),
            error: None,
            status: ExecutionStatus::Completed,
            start_time: tracked.start_time.clone(),
            end_time: Some(self.timestamp()),
        };
        self.write(&tracked.execution_id, &record).await
    }

    /// Write the terminal `failed` record. Call at most once per execution.
    pub async fn fail(&self, tracked: &TrackedExecution, error: &str) -> EngineResult<()> {
        let record = ExecutionRecord {
            execution_id: tracked.execution_id.clone(),
            tool_name: tracked.tool_name.clone(),
            input: tracked.input.clone(),
            result: None,
            error: Some(error.to_string()),
            status: ExecutionStatus::Failed,
            start_time: tracked.start_time.clone(),
            end_time: Some(self.timestamp()),
        };
        self.write(&tracked.execution_id, &record).await
    }

    pub async fn get(&self, execution_id: &str) -> EngineResult<ExecutionRecord> {
        let raw = self
            .store
            .get(&record_key(execution_id))
            .await?
            .ok_or_else(|| EngineError::ExecutionNotFound(execution_id.to_string()))?;
        Ok(serde_json::from_str(&raw)?)
    }
}
