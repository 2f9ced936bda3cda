use serde::Serialize;

use crate::metrics::collector::MetricsSnapshot;

use super::orchestrator::{DemoState, ScenarioKind};

/// Live progress snapshot returned by `Status()` (spec.md S4.5 "Progress
/// contract": scenario summary, elapsed/remaining time, % progress, current
/// phase, affected targets, a live metrics snapshot, attempt counts, and the
/// resilience score once a baseline exists).
#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub running: bool,
    pub state: DemoState,
    pub kind: Option<ScenarioKind>,
    pub scenario_summary: Option<String>,
    pub elapsed_secs: f64,
    pub remaining_secs: f64,
    pub total_secs: f64,
    pub percent_complete: f64,
    pub affected_targets: Vec<String>,
    pub metrics: MetricsSnapshot,
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub resilience_score: Option<f64>,
}
