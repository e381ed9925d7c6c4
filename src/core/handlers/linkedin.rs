use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::core::collaborators::ProfileScraper;
use crate::core::error::{EngineError, EngineResult};
use crate::core::tools::{ToolHandler, check_input, parse_input};

#[derive(Debug, Deserialize)]
struct SearchRequest {
    keywords: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

pub struct SearchLinkedinTool {
    scraper: Arc<dyn ProfileScraper>,
}

impl SearchLinkedinTool {
    pub fn new(scraper: Arc<dyn ProfileScraper>) -> Self {
        Self { scraper }
    }
}

#[async_trait]
impl ToolHandler for SearchLinkedinTool {
    fn check(&self, input: &Value) -> EngineResult<()> {
        check_input::<SearchRequest>(input)
    }

    async fn call(&self, input: Value) -> EngineResult<Value> {
        let req: SearchRequest = parse_input(input)?;
        let keywords = req
            .keywords
            .ok_or_else(|| EngineError::Validation("keywords is required".into()))?;
        let location = req.location.unwrap_or_default();

        let results = self.scraper.search(&keywords, &location).await?;
        Ok(json!({
            "status": "success",
            "count": results.len(),
            "results": results,
            "searchKeywords": keywords,
            "searchLocation": location,
        }))
    }
}
