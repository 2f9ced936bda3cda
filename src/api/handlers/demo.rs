//! Demo orchestrator handlers (spec.md S6 "/demo/... handlers").

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::demo::orchestrator::{ExperimentResult, ScenarioKind};
use crate::demo::progress::Progress;
use crate::demo::scenario::{ChaosTestScenario, LoadTestScenario};
use crate::error::ExchangeError;
use crate::utils::response::ApiResponse;

use super::super::state::AppState;

pub async fn start_load_test(
    State(state): State<Arc<AppState>>,
    Json(scenario): Json<LoadTestScenario>,
) -> Result<Json<ApiResponse<()>>, ExchangeError> {
    state.demo.start_load_test(scenario)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn start_chaos_test(
    State(state): State<Arc<AppState>>,
    Json(scenario): Json<ChaosTestScenario>,
) -> Result<Json<ApiResponse<()>>, ExchangeError> {
    state.demo.start_chaos_test(scenario)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Progress>> {
    Json(ApiResponse::success(state.demo.status()))
}

pub async fn stop(State(state): State<Arc<AppState>>) -> Json<ApiResponse<()>> {
    state.demo.stop();
    Json(ApiResponse::success(()))
}

pub async fn load_results(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ExperimentResult>>, ExchangeError> {
    Ok(Json(ApiResponse::success(state.demo.results(ScenarioKind::Load)?)))
}

pub async fn chaos_results(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ExperimentResult>>, ExchangeError> {
    Ok(Json(ApiResponse::success(state.demo.results(ScenarioKind::Chaos)?)))
}
