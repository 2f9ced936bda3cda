//! Metrics handler (spec.md S6 "/metrics handler").

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::error::ExchangeError;
use crate::metrics::analyzer::PerformanceAnalysis;
use crate::metrics::collector::MetricsSnapshot;
use crate::utils::response::ApiResponse;

use super::super::state::AppState;

pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<MetricsSnapshot>>, ExchangeError> {
    if !state.metrics.is_healthy() {
        return Err(ExchangeError::Internal("metrics service is stopped".into()));
    }
    Ok(Json(ApiResponse::success(state.metrics.current_snapshot())))
}

pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PerformanceAnalysis>>, ExchangeError> {
    if !state.metrics.is_healthy() {
        return Err(ExchangeError::Internal("metrics service is stopped".into()));
    }
    Ok(Json(ApiResponse::success(state.metrics.analyze())))
}
