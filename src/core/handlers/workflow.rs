use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::core::collaborators::WorkflowTrigger;
use crate::core::error::{EngineError, EngineResult};
use crate::core::tools::{ToolHandler, check_input, parse_input};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggerRequest {
    workflow_id: Option<String>,
    #[serde(default)]
    payload: Option<Value>,
}

pub struct TriggerWorkflowTool {
    workflows: Arc<dyn WorkflowTrigger>,
}

impl TriggerWorkflowTool {
    pub fn new(workflows: Arc<dyn WorkflowTrigger>) -> Self {
        Self { workflows }
    }
}

#[async_trait]
impl ToolHandler for TriggerWorkflowTool {
    fn check(&self, input: &Value) -> EngineResult<()> {
        check_input::<TriggerRequest>(input)
    }

    async fn call(&self, input: Value) -> EngineResult<Value> {
        let req: TriggerRequest = parse_input(input)?;
        let workflow_id = req
            .workflow_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| EngineError::Validation("workflowId is required".into()))?;
        let payload = req.payload.unwrap_or_else(|| json!({}));
        self.workflows.trigger(&workflow_id, &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collaborators::fakes::FakeWorkflows;

    #[tokio::test]
    async fn triggers_with_payload() {
        let workflows = Arc::new(FakeWorkflows::default());
        let tool = TriggerWorkflowTool::new(workflows.clone());
        let out = tool
            .call(json!({ "workflowId": "wf-9", "payload": { "lead": 1 } }))
            .await
            .unwrap();
        assert_eq!(out["status"], json!("triggered"));
        assert_eq!(out["workflowId"], json!("wf-9"));
        assert_eq!(
            workflows.triggered.lock().unwrap()[0],
            ("wf-9".to_string(), json!({ "lead": 1 }))
        );
    }

    #[tokio::test]
    async fn workflow_id_is_required() {
        let tool = TriggerWorkflowTool::new(Arc::new(FakeWorkflows::default()));
        assert!(tool.call(json!({ "payload": {} })).await.is_err());
    }
}
