use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::error::EngineResult;
use crate::core::tools::{ToolDefinition, ToolRegistry};
use crate::core::tracker::{ExecutionRecord, ExecutionTracker};

/// Result of a tracked tool call. Handler failures are data here, not errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DispatchOutcome {
    Success {
        #[serde(rename = "executionId")]
        execution_id: String,
        result: Value,
    },
    Error {
        #[serde(rename = "executionId")]
        execution_id: String,
        error: String,
    },
}

impl DispatchOutcome {
    pub fn execution_id(&self) -> &str {
        match self {
            DispatchOutcome::Success { execution_id, .. }
            | DispatchOutcome::Error { execution_id, .. } => execution_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success { .. })
    }
}

pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    tracker: ExecutionTracker,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, tracker: ExecutionTracker) -> Self {
        Self { registry, tracker }
    }

    pub fn tools(&self) -> &[ToolDefinition] {
        self.registry.list()
    }

    pub async fn execution(&self, execution_id: &str) -> EngineResult<ExecutionRecord> {
        self.tracker.get(execution_id).await
    }

    /// Run `tool_name` as a tracked execution.
    ///
    /// `Err` is returned only when the call is rejected before tracking starts
    /// (unknown tool, input the contract or handler rejects) or when the
    /// initial record cannot be written. Once the record exists, every path
    /// ends in a terminal write and an `Ok` outcome.
    pub async fn execute(&self, tool_name: &str, input: Value) -> EngineResult<DispatchOutcome> {
        let definition = self.registry.lookup(tool_name)?;
        let handler = self.registry.handler(tool_name)?;
        definition.contract.validate(&input)?;
        handler.check(&input)?;

        let tracked = self.tracker.begin(tool_name, &input).await.map_err(|e| {
            error!("Failed to record execution start for '{}': {}", tool_name, e);
            e
        })?;
        info!(
            "Executing tool '{}' as {}",
            tool_name, tracked.execution_id
        );

        match handler.call(input).await {
            Ok(result) => {
                if let Err(e) = self.tracker.complete(&tracked, &result).await {
                    error!(
                        "Failed to record completion of {}: {}",
                        tracked.execution_id, e
                    );
                }
                info!("Execution {} completed", tracked.execution_id);
                Ok(DispatchOutcome::Success {
                    execution_id: tracked.execution_id,
                    result,
                })
            }
            Err(err) => {
                let message = err.to_string();
                warn!(
                    "Execution {} of '{}' failed ({}): {}",
                    tracked.execution_id,
                    tool_name,
                    err.kind(),
                    message
                );
                if let Err(e) = self.tracker.fail(&tracked, &message).await {
                    error!(
                        "Failed to record failure of {}: {}",
                        tracked.execution_id, e
                    );
                }
                Ok(DispatchOutcome::Error {
                    execution_id: tracked.execution_id,
                    error: message,
                })
            }
        }
    }
}
