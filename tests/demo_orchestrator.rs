//! Integration coverage of the demo orchestrator's state machine across
//! real (short) phase transitions, beyond the inline unit tests in
//! `src/demo/orchestrator.rs`.

use std::sync::Arc;
use std::time::Duration;

use exchange_sim::demo::{
    ChaosState, ChaosTarget, ChaosTestScenario, DemoOrchestrator, DemoState, FaultType,
    LoadTestScenario, RecoveryConfig, ScenarioKind, Severity,
};
use exchange_sim::matching::engine::{MatchingEngine, TradingEngine};
use exchange_sim::matching::executor::BasicExecutor;
use exchange_sim::metrics::collector::MetricsCollector;
use exchange_sim::repository::{OrderRepository, TradeRepository};
use exchange_sim::simulation::MarketSimulator;

fn new_orchestrator() -> Arc<DemoOrchestrator> {
    let order_repo = Arc::new(OrderRepository::new());
    let trade_repo = Arc::new(TradeRepository::new());
    let executor = Box::new(BasicExecutor::new(trade_repo));
    let engine: Arc<dyn TradingEngine> = Arc::new(MatchingEngine::new(order_repo, executor));
    let simulator = Arc::new(MarketSimulator::new(engine, Default::default()));
    let metrics = Arc::new(MetricsCollector::new(Duration::from_secs(60)));
    let chaos = Arc::new(ChaosState::default());
    DemoOrchestrator::new(simulator, metrics, chaos)
}

/// A short load test runs through ramp-up/sustained/ramp-down and reaches
/// `Completed` without manual intervention, with the simulator stopped
/// again by the time it's done.
#[tokio::test]
async fn load_test_runs_to_completion() {
    let orchestrator = new_orchestrator();
    orchestrator
        .start_load_test(LoadTestScenario {
            symbols: vec!["AAPL".to_string()],
            target_rate: 5.0,
            concurrent_users: 1,
            duration_secs: 1,
        })
        .unwrap();

    assert!(orchestrator.status().running);

    tokio::time::sleep(Duration::from_millis(1_500)).await;

    let status = orchestrator.status();
    assert_eq!(status.state, DemoState::Completed);
    assert!(!status.running);

    let result = orchestrator.results(ScenarioKind::Load).unwrap();
    assert_eq!(result.final_state, DemoState::Completed);
}

/// Stopping mid-run transitions to `Aborted` immediately and records a
/// result for the aborted kind, rather than hanging until the scenario's
/// natural duration elapses.
#[tokio::test]
async fn stop_mid_run_aborts_immediately() {
    let orchestrator = new_orchestrator();
    orchestrator
        .start_load_test(LoadTestScenario {
            symbols: vec!["AAPL".to_string()],
            target_rate: 5.0,
            concurrent_users: 1,
            duration_secs: 30,
        })
        .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    orchestrator.stop();

    let status = orchestrator.status();
    assert_eq!(status.state, DemoState::Aborted);

    let result = orchestrator.results(ScenarioKind::Load).unwrap();
    assert_eq!(result.final_state, DemoState::Aborted);
}

/// A short chaos test captures a baseline during ramp-up, activates a fault
/// during the sustained phase, and reaches `Completed` with a resilience
/// score recorded.
#[tokio::test]
async fn chaos_test_completes_with_resilience_score() {
    let orchestrator = new_orchestrator();
    orchestrator
        .start_chaos_test(ChaosTestScenario {
            fault_type: FaultType::LatencyInjection,
            duration_secs: 1,
            severity: Severity::Low,
            target: ChaosTarget {
                component: "matching_engine".to_string(),
                percentage: 50.0,
            },
            recovery: RecoveryConfig {
                auto_recover: true,
                recovery_time_secs: 1,
                graceful_recover: true,
            },
        })
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1_500)).await;

    let status = orchestrator.status();
    assert_eq!(status.state, DemoState::Completed);

    let result = orchestrator.results(ScenarioKind::Chaos).unwrap();
    assert_eq!(result.final_state, DemoState::Completed);
    assert!(result.resilience_score.is_some());
    assert!(result.baseline_latency_ms.is_some());
}

/// Starting a second experiment while one is already running is rejected
/// with `Conflict`, observed at the integration level against the public
/// orchestrator surface.
#[tokio::test]
async fn concurrent_start_rejected_with_conflict() {
    let orchestrator = new_orchestrator();
    let scenario = LoadTestScenario {
        symbols: vec!["AAPL".to_string()],
        target_rate: 5.0,
        concurrent_users: 1,
        duration_secs: 5,
    };
    orchestrator.start_load_test(scenario.clone()).unwrap();
    let err = orchestrator.start_load_test(scenario).unwrap_err();
    assert!(matches!(err, exchange_sim::error::ExchangeError::Conflict(_)));
    orchestrator.stop();
}
