//! Health endpoint (spec.md S6 "Health check exit codes"). Ambient surface,
//! not part of the specified core — gated by `HEALTH_ENABLED`.

use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
