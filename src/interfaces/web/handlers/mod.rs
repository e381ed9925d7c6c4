pub mod health;
pub mod mcp;
pub mod search;

use axum::{
    Json,
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::error;

use crate::core::dispatcher::DispatchOutcome;
use crate::core::engine::Engine;
use crate::core::error::{EngineError, EngineResult};

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match &self {
            EngineError::ToolNotFound(_) | EngineError::ExecutionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            EngineError::Validation(_) => StatusCode::BAD_REQUEST,
            EngineError::Collaborator(_) | EngineError::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        error_response(status, self.to_string())
    }
}

/// An empty body reads as `null`; anything else must be JSON.
pub(crate) fn parse_body(body: &Bytes) -> Result<Value, Response> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| {
        error_response(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e))
    })
}

fn outcome_response(outcome: EngineResult<DispatchOutcome>) -> Response {
    match outcome {
        Ok(outcome) => Json(outcome).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Run a tracked call on its own task. Dropping the request (client gone,
/// request timeout) only drops the wait; the execution still reaches a
/// terminal record.
pub(crate) async fn dispatch_detached(
    engine: Arc<Engine>,
    tool_name: String,
    input: Value,
) -> Response {
    let task =
        tokio::spawn(async move { engine.dispatcher().execute(&tool_name, input).await });
    match task.await {
        Ok(outcome) => outcome_response(outcome),
        Err(e) => {
            error!("Tool execution task failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Tool execution task failed: {}", e),
            )
        }
    }
}
