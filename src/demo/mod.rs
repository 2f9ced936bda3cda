//! Demo orchestrator (spec.md S4.5): load/chaos experiment state machine,
//! fault-injection decorator, and progress reporting.

pub mod chaos;
pub mod orchestrator;
pub mod progress;
pub mod scenario;

pub use chaos::{ChaosEngine, ChaosState};
pub use orchestrator::{DemoOrchestrator, DemoState, ExperimentResult, ScenarioKind};
pub use progress::Progress;
pub use scenario::{ChaosTarget, ChaosTestScenario, FaultType, LoadTestScenario, RecoveryConfig, Severity};
