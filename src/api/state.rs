//! Composition-root handle shared across handlers (spec.md S9: "a single
//! composition root that constructs repositories, engine, metrics,
//! simulator, and orchestrator in the right order"). Generalizes the
//! teacher's `AppState` struct.

use std::sync::Arc;

use crate::demo::{ChaosState, DemoOrchestrator};
use crate::matching::engine::TradingEngine;
use crate::metrics::MetricsService;
use crate::simulation::MarketSimulator;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn TradingEngine>,
    pub metrics: Arc<MetricsService>,
    pub simulator: Arc<MarketSimulator>,
    pub demo: Arc<DemoOrchestrator>,
    pub chaos: Arc<ChaosState>,
}
