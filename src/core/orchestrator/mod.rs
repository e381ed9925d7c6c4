mod query;
mod stages;
pub mod types;

pub use query::{BuiltQuery, SearchFilter, build_search_query};
pub use stages::{
    MAX_ANALYZED, MAX_NOTES, PipelineState, StageAction, default_stages, rank_top, run_stages,
};
pub use types::{
    AnalysisDepth, OrchestrationResult, OrchestrationSummary, ProfileRow, StepSummary,
};

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::core::collaborators::Resources;
use crate::core::error::{EngineError, EngineResult};
use crate::core::tools::{ToolHandler, parse_input};

/// Search, optionally score, optionally publish notes for the best matches.
///
/// Stage side effects are not rolled back when a later stage fails; the
/// whole orchestration then fails with the stage's message.
pub async fn orchestrate(
    resources: &Resources,
    search_params: Value,
    depth: AnalysisDepth,
) -> EngineResult<OrchestrationResult> {
    let orchestration_id = format!("orch_{}", Utc::now().timestamp_millis());
    info!(
        "Starting orchestration {} at depth {}",
        orchestration_id,
        depth.as_str()
    );

    let filter: SearchFilter = parse_input(search_params.clone())?;
    let mut state = PipelineState::new(resources.clone(), depth);
    let steps = run_stages(&default_stages(filter), &mut state).await?;

    Ok(OrchestrationResult {
        orchestration_id,
        search_params,
        analysis_depth: depth,
        summary: OrchestrationSummary::from_steps(&steps),
        results: steps,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrchestrateRequest {
    #[serde(default)]
    search_params: Option<Value>,
    analysis_depth: AnalysisDepth,
}

impl OrchestrateRequest {
    /// Parse the request and its nested filter; an absent filter searches
    /// everything.
    fn parse(input: Value) -> EngineResult<(Value, AnalysisDepth)> {
        let req: OrchestrateRequest = parse_input(input)?;
        let search_params = req
            .search_params
            .filter(|p| !p.is_null())
            .unwrap_or_else(|| json!({}));
        parse_input::<SearchFilter>(search_params.clone())?;
        Ok((search_params, req.analysis_depth))
    }
}

pub struct OrchestrateSearchTool {
    resources: Resources,
}

impl OrchestrateSearchTool {
    pub fn new(resources: Resources) -> Self {
        Self { resources }
    }
}

#[async_trait]
impl ToolHandler for OrchestrateSearchTool {
    fn check(&self, input: &Value) -> EngineResult<()> {
        OrchestrateRequest::parse(input.clone()).map(|_| ())
    }

    async fn call(&self, input: Value) -> EngineResult<Value> {
        let run = async {
            let (search_params, depth) = OrchestrateRequest::parse(input)?;
            let result = orchestrate(&self.resources, search_params, depth).await?;
            Ok::<_, EngineError>(serde_json::to_value(result)?)
        };
        run.await
            .map_err(|e| e.with_prefix("Search orchestration failed"))
    }
}

#[cfg(test)]
mod tests;
