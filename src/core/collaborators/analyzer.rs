use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::config::ClaudeConfig;
use crate::core::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Scoring,
    Outreach,
    Research,
}

impl AnalysisMode {
    /// Unknown or missing modes fall back to scoring.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("outreach") => AnalysisMode::Outreach,
            Some("research") => AnalysisMode::Research,
            _ => AnalysisMode::Scoring,
        }
    }

    pub fn prompt(self, profile: &Value) -> String {
        let profile = profile.to_string();
        match self {
            AnalysisMode::Scoring => format!(
                "Analyze this LinkedIn profile and provide a numerical score (1-10) for client potential:\n\
                 Profile: {}\n\n\
                 Respond with JSON: {{\"score\": X, \"reasoning\": \"...\", \"key_indicators\": [...]}}",
                profile
            ),
            AnalysisMode::Outreach => format!(
                "Create personalized outreach strategy for this profile:\n\
                 Profile: {}\n\n\
                 Respond with JSON: {{\"approach\": \"...\", \"key_points\": [...], \"timing_recommendation\": \"...\"}}",
                profile
            ),
            AnalysisMode::Research => format!(
                "Extract key research insights from this profile:\n\
                 Profile: {}\n\n\
                 Respond with JSON: {{\"company_insights\": \"...\", \"decision_maker_level\": \"...\", \"pain_points\": [...]}}",
                profile
            ),
        }
    }
}

/// Language-model analysis of a single profile.
#[async_trait]
pub trait ProfileAnalyzer: Send + Sync {
    async fn analyze(&self, profile: &Value, mode: AnalysisMode) -> EngineResult<Value>;
}

/// Pull a JSON document out of model text: a fenced ```json block first,
/// then the outermost `{...}` span.
pub(crate) fn extract_json_block(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if let Some(start) = trimmed.find("```json") {
        let content_start = start + 7;
        if let Some(end) = trimmed[content_start..].find("```") {
            let block = trimmed[content_start..content_start + end].trim();
            if !block.is_empty() {
                return Some(block);
            }
        }
    }
    let open = trimmed.find('{')?;
    let close = trimmed.rfind('}')?;
    (close > open).then(|| &trimmed[open..=close])
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

pub struct ClaudeAnalyzer {
    config: ClaudeConfig,
    client: Client,
}

impl ClaudeAnalyzer {
    pub fn new(config: ClaudeConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn request(&self, prompt: &str) -> EngineResult<Value> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            EngineError::Configuration("CLAUDE_API_KEY is not configured".to_string())
        })?;

        let req = MessagesRequest {
            model: &self.config.model,
            max_tokens: 1000,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        let url = format!("{}/v1/messages", self.config.api_url.trim_end_matches('/'));
        let res = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(EngineError::Collaborator(format!(
                "Request failed with status {}: {}",
                status, body
            )));
        }

        let parsed: MessagesResponse = res.json().await?;
        let text = parsed
            .content
            .first()
            .map(|block| block.text.as_str())
            .ok_or_else(|| EngineError::Collaborator("Empty response content".to_string()))?;
        debug!("Claude response: {}", text);

        let json = extract_json_block(text).ok_or_else(|| {
            EngineError::Collaborator("Response did not contain a JSON object".to_string())
        })?;
        Ok(serde_json::from_str(json)?)
    }
}

#[async_trait]
impl ProfileAnalyzer for ClaudeAnalyzer {
    async fn analyze(&self, profile: &Value, mode: AnalysisMode) -> EngineResult<Value> {
        self.request(&mode.prompt(profile))
            .await
            .map_err(|e| e.with_prefix("Claude analysis failed"))
    }
}
