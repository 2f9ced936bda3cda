//! Scenario configuration for the demo orchestrator (spec.md S4.5, S6 "Wire
//! formats").

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct LoadTestScenario {
    pub symbols: Vec<String>,
    /// Target synthetic orders per second at full ramp.
    pub target_rate: f64,
    pub concurrent_users: u32,
    pub duration_secs: u64,
}

impl LoadTestScenario {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultType {
    LatencyInjection,
    ErrorInjection,
    ResourceExhaustion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Extra latency in milliseconds injected per affected call, scaled by
    /// severity — used only for `FaultType::LatencyInjection`.
    pub fn latency_ms(self) -> u64 {
        match self {
            Severity::Low => 25,
            Severity::Medium => 100,
            Severity::High => 400,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChaosTarget {
    pub component: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecoveryConfig {
    #[serde(default = "default_true")]
    pub auto_recover: bool,
    pub recovery_time_secs: u64,
    #[serde(default = "default_true")]
    pub graceful_recover: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChaosTestScenario {
    #[serde(rename = "type")]
    pub fault_type: FaultType,
    pub duration_secs: u64,
    pub severity: Severity,
    pub target: ChaosTarget,
    pub recovery: RecoveryConfig,
}

impl ChaosTestScenario {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

/// Spec.md S4.5's typical phase split: 10% ramp-up, 80% sustained, 10%
/// ramp-down.
pub struct PhaseSplit {
    pub ramp_up: Duration,
    pub sustained: Duration,
    pub ramp_down: Duration,
}

pub fn split_phases(total: Duration) -> PhaseSplit {
    let total_ms = total.as_millis() as u64;
    let ramp_up = Duration::from_millis(total_ms / 10);
    let ramp_down = Duration::from_millis(total_ms / 10);
    let sustained = total.saturating_sub(ramp_up).saturating_sub(ramp_down);
    PhaseSplit {
        ramp_up,
        sustained,
        ramp_down,
    }
}
