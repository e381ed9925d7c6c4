use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::super::AppState;
use super::{dispatch_detached, parse_body};
use crate::core::tools::catalog::resource_types;

pub async fn list_tools_endpoint(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "tools": state.engine.dispatcher().tools(),
        "resourceTypes": resource_types(),
    }))
}

pub async fn execute_tool_endpoint(
    Path(tool_name): Path<String>,
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let input = match parse_body(&body) {
        Ok(input) => input,
        Err(resp) => return resp,
    };
    dispatch_detached(state.engine.clone(), tool_name, input).await
}

pub async fn get_execution_endpoint(
    Path(execution_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    match state.engine.dispatcher().execution(&execution_id).await {
        Ok(record) => Json(record).into_response(),
        Err(err) => err.into_response(),
    }
}
