use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::error::EngineResult;
use crate::core::tools::{ToolHandler, check_input, parse_input};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileRequest {
    linkedin_url: Option<String>,
    profile_id: Option<String>,
}

/// Profile lookup stub. Returns sample data until a profile source is wired in.
pub struct GetPersonProfileTool;

#[async_trait]
impl ToolHandler for GetPersonProfileTool {
    fn check(&self, input: &Value) -> EngineResult<()> {
        check_input::<ProfileRequest>(input)
    }

    async fn call(&self, input: Value) -> EngineResult<Value> {
        let req: ProfileRequest = parse_input(input)?;
        let profile_id = req
            .profile_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("profile_{}", Utc::now().timestamp_millis()));

        Ok(json!({
            "profileId": profile_id,
            "linkedinUrl": req.linkedin_url,
            "status": "retrieved",
            "data": {
                "name": "Sample Profile",
                "title": "Sample Title",
                "company": "Sample Company",
                "location": "Sample Location"
            }
        }))
    }
}
