use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::core::collaborators::RelationalExecutor;
use crate::core::error::{EngineError, EngineResult};
use crate::core::tools::{ToolHandler, check_input, parse_input};

const LIST_PROFILES_SQL: &str = "SELECT id, full_name, title, company, location, status, created_at
     FROM profiles
     ORDER BY id DESC
     LIMIT :limit OFFSET :offset";

#[derive(Debug, Deserialize)]
struct QueryRequest {
    query: Option<String>,
    #[serde(default)]
    binds: Option<Map<String, Value>>,
}

/// Raw parameterized SQL against the profile store.
pub struct OracleQueryTool {
    database: Arc<dyn RelationalExecutor>,
}

impl OracleQueryTool {
    pub fn new(database: Arc<dyn RelationalExecutor>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl ToolHandler for OracleQueryTool {
    fn check(&self, input: &Value) -> EngineResult<()> {
        check_input::<QueryRequest>(input)
    }

    async fn call(&self, input: Value) -> EngineResult<Value> {
        let req: QueryRequest = parse_input(input)?;
        let query = req
            .query
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| EngineError::Validation("query is required".into()))?;
        let output = self
            .database
            .execute(&query, &req.binds.unwrap_or_default())
            .await?;
        Ok(serde_json::to_value(output)?)
    }
}

#[derive(Debug, Deserialize)]
struct ListRequest {
    limit: Option<u64>,
    offset: Option<u64>,
}

pub struct ListProfilesTool {
    database: Arc<dyn RelationalExecutor>,
}

impl ListProfilesTool {
    pub fn new(database: Arc<dyn RelationalExecutor>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl ToolHandler for ListProfilesTool {
    fn check(&self, input: &Value) -> EngineResult<()> {
        check_input::<ListRequest>(input)
    }

    async fn call(&self, input: Value) -> EngineResult<Value> {
        let req: ListRequest = parse_input(input)?;
        let limit = req.limit.unwrap_or(50);
        let offset = req.offset.unwrap_or(0);

        let mut binds = Map::new();
        binds.insert("limit".into(), json!(limit));
        binds.insert("offset".into(), json!(offset));
        let output = self.database.execute(LIST_PROFILES_SQL, &binds).await?;

        Ok(json!({
            "total": output.rows.len(),
            "profiles": output.rows,
            "limit": limit,
            "offset": offset,
            "metaData": output.meta_data,
        }))
    }
}
