use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request, header},
    middleware,
    middleware::Next,
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::AppState;
use super::handlers::{health, mcp, search};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_api_router(state: AppState) -> Router {
    Router::new()
        .route("/mcp/tools", get(mcp::list_tools_endpoint))
        .route("/mcp/execute/{tool_name}", post(mcp::execute_tool_endpoint))
        .route(
            "/mcp/execution/{execution_id}",
            get(mcp::get_execution_endpoint),
        )
        .route("/health", get(health::health_endpoint))
        .route("/search", post(search::search_endpoint))
        .layer(middleware::from_fn(security_headers))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn security_headers(req: Request<Body>, next: Next) -> axum::response::Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collaborators::fakes::{FakeAnalyzer, FakeWorld};
    use crate::core::engine::Engine;
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn state_for(world: &FakeWorld) -> AppState {
        AppState {
            engine: Arc::new(Engine::new(world.resources.clone())),
        }
    }

    async fn json_request(
        app: Router,
        method: Method,
        path: &str,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let body = match body {
            Some(raw) => Body::from(raw.to_string()),
            None => Body::empty(),
        };
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body_bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));
        (status, json)
    }

    #[tokio::test]
    async fn tools_endpoint_lists_catalog_and_resource_types() {
        let world = FakeWorld::new(FakeAnalyzer::default());
        let app = build_api_router(state_for(&world));
        let (status, json) = json_request(app, Method::GET, "/mcp/tools", None).await;

        assert_eq!(status, StatusCode::OK);
        let tools = json["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 9);
        assert_eq!(tools[0]["name"], json!("oracle-query"));
        assert_eq!(tools[0]["inputSchema"]["type"], json!("object"));
        assert_eq!(json["resourceTypes"]["N8N_WORKFLOW"], json!("n8n-workflow"));
    }

    #[tokio::test]
    async fn unknown_tool_is_404() {
        let world = FakeWorld::new(FakeAnalyzer::default());
        let app = build_api_router(state_for(&world));
        let (status, json) =
            json_request(app, Method::POST, "/mcp/execute/nope", Some("{}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, json!({ "error": "Tool 'nope' not found" }));
    }

    #[tokio::test]
    async fn contract_violation_is_400() {
        let world = FakeWorld::new(FakeAnalyzer::default());
        let app = build_api_router(state_for(&world));
        let (status, json) = json_request(
            app,
            Method::POST,
            "/mcp/execute/search_linkedin",
            Some(r#"{"location":"Berlin"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], json!("Missing required field 'keywords'"));
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let world = FakeWorld::new(FakeAnalyzer::default());
        let app = build_api_router(state_for(&world));
        let (status, json) =
            json_request(app, Method::POST, "/mcp/execute/list_profiles", Some("{oops")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn executed_tool_can_be_looked_up_by_id() {
        let world = FakeWorld::new(FakeAnalyzer::default());
        let state = state_for(&world);

        let (status, outcome) = json_request(
            build_api_router(state.clone()),
            Method::POST,
            "/mcp/execute/get_person_profile",
            Some(r#"{"profileId":"p-7"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["status"], json!("success"));
        assert_eq!(outcome["result"]["profileId"], json!("p-7"));

        let id = outcome["executionId"].as_str().unwrap();
        let (status, record) = json_request(
            build_api_router(state),
            Method::GET,
            &format!("/mcp/execution/{}", id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["status"], json!("completed"));
        assert_eq!(record["executionId"], json!(id));
        assert_eq!(record["toolName"], json!("get_person_profile"));
        assert!(record.get("endTime").is_some());
    }

    #[tokio::test]
    async fn handler_failure_is_200_with_error_outcome() {
        let world = FakeWorld::new(FakeAnalyzer::default());
        let app = build_api_router(state_for(&world));
        let (status, outcome) = json_request(
            app,
            Method::POST,
            "/mcp/execute/oracle-query",
            Some(r#"{"query":"SELECT * FROM nowhere"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["status"], json!("error"));
        assert!(outcome["executionId"].as_str().unwrap().starts_with("exec_"));
    }

    #[tokio::test]
    async fn missing_execution_is_404() {
        let world = FakeWorld::new(FakeAnalyzer::default());
        let app = build_api_router(state_for(&world));
        let (status, json) =
            json_request(app, Method::GET, "/mcp/execution/exec_0_missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, json!({ "error": "Execution not found" }));
    }

    #[tokio::test]
    async fn health_reports_services() {
        let world = FakeWorld::new(FakeAnalyzer::default());
        let app = build_api_router(state_for(&world));
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], json!("ok"));
        assert_eq!(json["services"]["redis"], json!("connected"));
        assert_eq!(json["services"]["oracle"], json!("connected"));
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn search_defaults_to_basic_depth() {
        let world = FakeWorld::new(FakeAnalyzer::default());
        world
            .seed(&[("Ada", "Fintech", None), ("Bo", "Retail", None)])
            .await;
        let app = build_api_router(state_for(&world));
        let (status, outcome) =
            json_request(app, Method::POST, "/search", Some(r#"{"industry":"fin"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["status"], json!("success"));
        assert_eq!(outcome["result"]["analysisDepth"], json!("basic"));
        assert_eq!(outcome["result"]["summary"]["totalFound"], json!(1));
    }

    #[tokio::test(start_paused = true)]
    async fn request_timeout_does_not_cut_the_execution_short() {
        let world = FakeWorld::new(FakeAnalyzer::slow(
            vec![Some(6.0); 6],
            Duration::from_secs(8),
        ));
        world
            .seed(&[
                ("A", "Tech", None),
                ("B", "Tech", None),
                ("C", "Tech", None),
                ("D", "Tech", None),
                ("E", "Tech", None),
                ("F", "Tech", None),
            ])
            .await;
        let app = build_api_router(state_for(&world));
        let (status, _) =
            json_request(app, Method::POST, "/search?depth=detailed", Some("{}")).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert!(world.analyzer.call_count() < 6);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(world.analyzer.call_count(), 6);
        let records = world.state.values().await.unwrap();
        assert_eq!(records.len(), 1);
        let record: Value = serde_json::from_str(&records[0]).unwrap();
        assert_eq!(record["toolName"], json!("orchestrate-search"));
        assert_eq!(record["status"], json!("completed"));
        assert_eq!(record["result"]["summary"]["analyzed"], json!(6));
    }

    #[tokio::test]
    async fn orchestrate_search_requires_a_depth() {
        let world = FakeWorld::new(FakeAnalyzer::default());
        let app = build_api_router(state_for(&world));
        let (status, json) = json_request(
            app,
            Method::POST,
            "/mcp/execute/orchestrate-search",
            Some(r#"{"searchParams":{}}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], json!("Missing required field 'analysisDepth'"));
        assert_eq!(world.state.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn inputs_the_handler_cannot_read_are_rejected_before_tracking() {
        let world = FakeWorld::new(FakeAnalyzer::default());
        let cases = [
            ("list_profiles", r#"{"limit":2.5}"#),
            ("list_profiles", r#"{"offset":-1}"#),
            (
                "orchestrate-search",
                r#"{"searchParams":{"industry":5},"analysisDepth":"basic"}"#,
            ),
        ];
        for (tool, body) in cases {
            let app = build_api_router(state_for(&world));
            let (status, json) = json_request(
                app,
                Method::POST,
                &format!("/mcp/execute/{}", tool),
                Some(body),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", tool, body);
            assert!(
                json["error"]
                    .as_str()
                    .unwrap()
                    .starts_with("Invalid tool input")
            );
        }
        assert_eq!(world.state.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn search_rejects_unknown_depth() {
        let world = FakeWorld::new(FakeAnalyzer::default());
        let app = build_api_router(state_for(&world));
        let (status, _) =
            json_request(app, Method::POST, "/search?depth=deep", Some("{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
