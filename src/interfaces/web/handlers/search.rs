use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use serde_json::json;

use super::super::AppState;
use super::{dispatch_detached, parse_body};
use crate::core::tools::catalog::ORCHESTRATE_SEARCH;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    depth: Option<String>,
}

/// Shorthand for `orchestrate-search`: the body is the search filter and
/// `?depth=` selects the stages (basic when absent).
pub async fn search_endpoint(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    body: Bytes,
) -> Response {
    let search_params = match parse_body(&body) {
        Ok(params) => params,
        Err(resp) => return resp,
    };
    let depth = query
        .depth
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "basic".to_string());

    let input = json!({ "searchParams": search_params, "analysisDepth": depth });
    dispatch_detached(state.engine.clone(), ORCHESTRATE_SEARCH.to_string(), input).await
}
