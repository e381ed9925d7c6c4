use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::core::config::N8nConfig;
use crate::core::error::{EngineError, EngineResult};

/// Starts a workflow on the automation engine and reports its execution id.
#[async_trait]
pub trait WorkflowTrigger: Send + Sync {
    async fn trigger(&self, workflow_id: &str, payload: &Value) -> EngineResult<Value>;
}

#[derive(Deserialize)]
struct TriggerResponse {
    #[serde(rename = "executionId", default)]
    execution_id: Value,
}

pub struct N8nClient {
    config: N8nConfig,
    client: Client,
}

impl N8nClient {
    pub fn new(config: N8nConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn post(&self, workflow_id: &str, payload: &Value) -> EngineResult<Value> {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .ok_or_else(|| EngineError::Configuration("N8N_BASE_URL is not configured".into()))?;
        let url = format!(
            "{}/api/v1/workflows/{}/execute",
            base_url.trim_end_matches('/'),
            workflow_id
        );
        debug!("Triggering n8n workflow at {}", url);

        let mut req = self.client.post(&url).json(&json!({ "data": payload }));
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }
        let res = req.send().await?;
        if !res.status().is_success() {
            return Err(EngineError::Collaborator(format!(
                "Request failed with status {}",
                res.status()
            )));
        }

        let body: TriggerResponse = res.json().await?;
        Ok(json!({
            "executionId": body.execution_id,
            "status": "triggered",
            "workflowId": workflow_id,
        }))
    }
}

#[async_trait]
impl WorkflowTrigger for N8nClient {
    async fn trigger(&self, workflow_id: &str, payload: &Value) -> EngineResult<Value> {
        self.post(workflow_id, payload)
            .await
            .map_err(|e| e.with_prefix("n8n workflow trigger failed"))
    }
}
