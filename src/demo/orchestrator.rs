//! Demo orchestrator state machine (spec.md S4.5).
//!
//! Runs exactly one load or chaos experiment at a time, driving it through
//! ramp-up/sustained/ramp-down phases on a timer, exposing live progress,
//! and retaining the most recent completed result of each kind. The
//! phase-timer-plus-callback shape follows the teacher pack's
//! `MitigationController`/`CircuitBreaker` pattern (cooldowns tracked as
//! `RwLock<Option<Instant>>`, state transitions guarded by a single lock).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::info;

use crate::error::ExchangeError;
use crate::metrics::collector::MetricsCollector;
use crate::simulation::MarketSimulator;

use super::chaos::ChaosState;
use super::progress::Progress;
use super::scenario::{split_phases, ChaosTestScenario, LoadTestScenario};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoState {
    Idle,
    RampUp,
    Sustained,
    RampDown,
    Completed,
    Aborted,
}

impl DemoState {
    fn is_terminal(self) -> bool {
        matches!(self, DemoState::Idle | DemoState::Completed | DemoState::Aborted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Load,
    Chaos,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperimentResult {
    pub kind: ScenarioKind,
    pub final_state: DemoState,
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub resilience_score: Option<f64>,
    pub recovery_time_secs: Option<f64>,
    pub baseline_latency_ms: Option<f64>,
}

const PHASE_TICK: Duration = Duration::from_millis(200);
const RECOVERY_THRESHOLD_RATIO: f64 = 1.2;

struct RunContext {
    kind: ScenarioKind,
    phases: super::scenario::PhaseSplit,
    /// Human-readable description of the running scenario, surfaced
    /// verbatim in the progress contract (spec.md S4.5 "scenario summary").
    summary: String,
    /// Components/symbols the scenario is exercising — for a chaos test,
    /// the faulted component; for a load test, the symbol universe.
    targets: Vec<String>,
}

pub struct DemoOrchestrator {
    state: RwLock<DemoState>,
    run: RwLock<Option<RunContext>>,
    run_started_at: RwLock<Instant>,
    simulator: Arc<MarketSimulator>,
    metrics: Arc<MetricsCollector>,
    chaos: Arc<ChaosState>,
    baseline_latency_ms: RwLock<Option<f64>>,
    recovery_started_at: RwLock<Option<Instant>>,
    recovery_time_secs: RwLock<Option<f64>>,
    results: RwLock<HashMap<&'static str, ExperimentResult>>,
    task: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl DemoOrchestrator {
    pub fn new(simulator: Arc<MarketSimulator>, metrics: Arc<MetricsCollector>, chaos: Arc<ChaosState>) -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(DemoState::Idle),
            run: RwLock::new(None),
            run_started_at: RwLock::new(Instant::now()),
            simulator,
            metrics,
            chaos,
            baseline_latency_ms: RwLock::new(None),
            recovery_started_at: RwLock::new(None),
            recovery_time_secs: RwLock::new(None),
            results: RwLock::new(HashMap::new()),
            task: parking_lot::Mutex::new(None),
        })
    }

    fn ensure_idle(&self) -> Result<(), ExchangeError> {
        if !self.state.read().is_terminal() {
            return Err(ExchangeError::Conflict("an experiment is already running".into()));
        }
        Ok(())
    }

    fn reset_counters(&self) {
        self.simulator.reset_stats();
        *self.baseline_latency_ms.write() = None;
        *self.recovery_started_at.write() = None;
        *self.recovery_time_secs.write() = None;
    }

    pub fn start_load_test(self: &Arc<Self>, scenario: LoadTestScenario) -> Result<(), ExchangeError> {
        self.ensure_idle()?;
        self.reset_counters();

        let phases = split_phases(scenario.duration());
        let summary = format!(
            "load test: {:.1} orders/sec against {:?} with {} concurrent users for {}s",
            scenario.target_rate, scenario.symbols, scenario.concurrent_users, scenario.duration_secs
        );
        *self.run.write() = Some(RunContext {
            kind: ScenarioKind::Load,
            phases,
            summary,
            targets: scenario.symbols.clone(),
        });
        *self.state.write() = DemoState::RampUp;
        *self.run_started_at.write() = Instant::now();

        self.simulator.configure(scenario.symbols.clone(), scenario.target_rate, scenario.concurrent_users);
        self.simulator.start();
        self.simulator.set_rate_multiplier(0.0);

        let me = self.clone();
        let handle = tokio::spawn(async move { me.drive_load(scenario).await });
        *self.task.lock() = Some(handle);
        info!("load test started");
        Ok(())
    }

    pub fn start_chaos_test(self: &Arc<Self>, scenario: ChaosTestScenario) -> Result<(), ExchangeError> {
        self.ensure_idle()?;
        self.reset_counters();

        let phases = split_phases(scenario.duration());
        let summary = format!(
            "chaos test: {:?} on {} ({:.0}% of calls, {:?} severity) for {}s",
            scenario.fault_type, scenario.target.component, scenario.target.percentage, scenario.severity, scenario.duration_secs
        );
        *self.run.write() = Some(RunContext {
            kind: ScenarioKind::Chaos,
            phases,
            summary,
            targets: vec![scenario.target.component.clone()],
        });
        *self.state.write() = DemoState::RampUp;
        *self.run_started_at.write() = Instant::now();

        self.simulator.start();

        let component = scenario.target.component.clone();
        let me = self.clone();
        let handle = tokio::spawn(async move { me.drive_chaos(scenario).await });
        *self.task.lock() = Some(handle);
        info!(component, "chaos test started");
        Ok(())
    }

    async fn drive_load(self: Arc<Self>, scenario: LoadTestScenario) {
        let phases = {
            let run = self.run.read();
            match run.as_ref() {
                Some(ctx) => (ctx.phases.ramp_up, ctx.phases.sustained, ctx.phases.ramp_down),
                None => return,
            }
        };
        let (ramp_up, sustained, ramp_down) = phases;

        if !self.ramp_phase(ramp_up, |frac| self.simulator.set_rate_multiplier(frac.max(0.01))).await {
            return;
        }

        *self.state.write() = DemoState::Sustained;
        self.simulator.set_rate_multiplier(1.0);
        if !self.wait_phase(sustained).await {
            return;
        }

        *self.state.write() = DemoState::RampDown;
        if !self
            .ramp_phase(ramp_down, |frac| self.simulator.set_rate_multiplier((1.0 - frac).max(0.01)))
            .await
        {
            return;
        }

        self.simulator.stop();
        self.complete(ScenarioKind::Load);
    }

    async fn drive_chaos(self: Arc<Self>, scenario: ChaosTestScenario) {
        let phases = {
            let run = self.run.read();
            match run.as_ref() {
                Some(ctx) => (ctx.phases.ramp_up, ctx.phases.sustained, ctx.phases.ramp_down),
                None => return,
            }
        };
        let (ramp_up, sustained, ramp_down) = phases;

        if !self.wait_phase(ramp_up).await {
            return;
        }
        *self.baseline_latency_ms.write() = Some(self.metrics.get_current_metrics().avg_latency_ms);

        *self.state.write() = DemoState::Sustained;
        self.chaos.activate(scenario.fault_type, scenario.target.percentage, scenario.severity.latency_ms());
        if !self.wait_phase(sustained).await {
            return;
        }

        *self.state.write() = DemoState::RampDown;
        *self.recovery_started_at.write() = Some(Instant::now());

        if scenario.recovery.graceful_recover {
            if !self
                .ramp_phase(ramp_down, |frac| self.chaos.graduate(1.0 - frac))
                .await
            {
                return;
            }
        } else if !self.wait_phase(ramp_down).await {
            return;
        }

        self.chaos.deactivate();
        self.simulator.stop();
        self.record_recovery_time();
        self.complete(ScenarioKind::Chaos);
    }

    fn record_recovery_time(&self) {
        let Some(started) = *self.recovery_started_at.read() else { return };
        let Some(baseline) = *self.baseline_latency_ms.read() else { return };
        let current = self.metrics.get_current_metrics().avg_latency_ms;
        if current <= baseline * RECOVERY_THRESHOLD_RATIO {
            *self.recovery_time_secs.write() = Some(started.elapsed().as_secs_f64());
        }
    }

    /// Sleep in small ticks for `duration`, bailing out early if the run was
    /// aborted. Returns false when the run should stop.
    async fn wait_phase(self: &Arc<Self>, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        while Instant::now() < deadline {
            if *self.state.read() == DemoState::Aborted {
                return false;
            }
            sleep(PHASE_TICK.min(duration)).await;
        }
        *self.state.read() != DemoState::Aborted
    }

    /// Like `wait_phase` but calls `on_tick(fraction_elapsed)` each tick so
    /// callers can ramp a linked control (simulator rate, fault percentage)
    /// smoothly across the phase.
    async fn ramp_phase(self: &Arc<Self>, duration: Duration, on_tick: impl Fn(f64)) -> bool {
        if duration.is_zero() {
            on_tick(1.0);
            return *self.state.read() != DemoState::Aborted;
        }
        let start = Instant::now();
        loop {
            if *self.state.read() == DemoState::Aborted {
                return false;
            }
            let elapsed = start.elapsed();
            let frac = (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0);
            on_tick(frac);
            if elapsed >= duration {
                return true;
            }
            sleep(PHASE_TICK.min(duration)).await;
        }
    }

    fn complete(&self, kind: ScenarioKind) {
        *self.state.write() = DemoState::Completed;
        let result = self.build_result(kind, DemoState::Completed);
        self.results.write().insert(result_key(kind), result);
    }

    fn build_result(&self, kind: ScenarioKind, final_state: DemoState) -> ExperimentResult {
        let baseline = *self.baseline_latency_ms.read();
        let resilience_score = baseline.map(|b| resilience_score(b, self.metrics.get_current_metrics().avg_latency_ms));
        ExperimentResult {
            kind,
            final_state,
            attempted: self.simulator.attempted(),
            succeeded: self.simulator.succeeded(),
            failed: self.simulator.failed(),
            resilience_score,
            recovery_time_secs: *self.recovery_time_secs.read(),
            baseline_latency_ms: baseline,
        }
    }

    /// Explicit, graceful abort (spec.md S4.5: "aborted is entered on
    /// explicit stop ... terminated gracefully").
    pub fn stop(&self) {
        if self.state.read().is_terminal() {
            return;
        }
        let kind = self.run.read().as_ref().map(|r| r.kind);
        *self.state.write() = DemoState::Aborted;
        self.simulator.stop();
        self.chaos.deactivate();
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
        if let Some(kind) = kind {
            let result = self.build_result(kind, DemoState::Aborted);
            self.results.write().insert(result_key(kind), result);
        }
    }

    pub fn status(&self) -> Progress {
        let state = *self.state.read();
        let run = self.run.read();
        let (kind, total, summary, targets) = match run.as_ref() {
            Some(ctx) => (
                Some(ctx.kind),
                ctx.phases.ramp_up + ctx.phases.sustained + ctx.phases.ramp_down,
                Some(ctx.summary.clone()),
                ctx.targets.clone(),
            ),
            None => (None, Duration::ZERO, None, Vec::new()),
        };
        drop(run);

        let total_secs = total.as_secs_f64();
        let elapsed_secs = if total_secs > 0.0 {
            self.run_started_at.read().elapsed().as_secs_f64().min(total_secs)
        } else {
            0.0
        };
        let percent_complete = if total_secs > 0.0 {
            (elapsed_secs / total_secs * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let remaining_secs = (total_secs - elapsed_secs).max(0.0);

        Progress {
            running: !state.is_terminal(),
            state,
            kind,
            scenario_summary: summary,
            elapsed_secs,
            remaining_secs,
            total_secs,
            percent_complete,
            affected_targets: targets,
            metrics: self.metrics.get_current_metrics(),
            attempted: self.simulator.attempted(),
            succeeded: self.simulator.succeeded(),
            failed: self.simulator.failed(),
            resilience_score: self
                .baseline_latency_ms
                .read()
                .map(|b| resilience_score(b, self.metrics.get_current_metrics().avg_latency_ms)),
        }
    }

    pub fn results(&self, kind: ScenarioKind) -> Result<ExperimentResult, ExchangeError> {
        self.results
            .read()
            .get(result_key(kind))
            .cloned()
            .ok_or_else(|| ExchangeError::NotFound(format!("no completed {kind:?} experiment")))
    }
}

fn result_key(kind: ScenarioKind) -> &'static str {
    match kind {
        ScenarioKind::Load => "load",
        ScenarioKind::Chaos => "chaos",
    }
}

/// `100 x (1 - degradation_ratio)`, clamped to [0, 100] (spec.md S4.5).
fn resilience_score(baseline_ms: f64, current_ms: f64) -> f64 {
    if baseline_ms <= 0.0 {
        return 100.0;
    }
    let degradation_ratio = ((current_ms - baseline_ms) / baseline_ms).clamp(0.0, 1.0);
    (100.0 * (1.0 - degradation_ratio)).clamp(0.0, 100.0)
}
