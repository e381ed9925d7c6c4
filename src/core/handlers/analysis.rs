use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::core::collaborators::{AnalysisMode, ProfileAnalyzer};
use crate::core::error::EngineResult;
use crate::core::tools::{ToolHandler, check_input, parse_input};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    #[serde(default)]
    profile_data: Option<Value>,
    analysis_type: Option<String>,
}

pub struct AnalyzeProfileTool {
    analyzer: Arc<dyn ProfileAnalyzer>,
}

impl AnalyzeProfileTool {
    pub fn new(analyzer: Arc<dyn ProfileAnalyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl ToolHandler for AnalyzeProfileTool {
    fn check(&self, input: &Value) -> EngineResult<()> {
        check_input::<AnalyzeRequest>(input)
    }

    async fn call(&self, input: Value) -> EngineResult<Value> {
        let req: AnalyzeRequest = parse_input(input)?;
        let mode = AnalysisMode::parse_or_default(req.analysis_type.as_deref());
        let profile = req.profile_data.unwrap_or_else(|| json!({}));
        self.analyzer.analyze(&profile, mode).await
    }
}
