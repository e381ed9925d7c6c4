use axum::{Json, extract::State};

use super::super::AppState;
use crate::core::engine::HealthReport;

pub async fn health_endpoint(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.engine.health().await)
}
