//! Chaos-fault injection decorator (spec.md S4.5 "Chaos test").
//!
//! The orchestrator flips switches on a shared [`ChaosState`]; a
//! [`ChaosEngine`] decorator consults it on every `place_order` call and
//! injects latency or errors on a target percentage of operations.
//! Grounded in the teacher pack's `route_quality::mitigation::CircuitBreaker`
//! (an `RwLock`-guarded state struct mutated by a controller, consulted by
//! the hot path) rather than embedding fault logic in the matching engine
//! itself — another instance of the decorator-stack strategy (spec.md S9).

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use uuid::Uuid;

use crate::error::ExchangeError;
use crate::matching::book::OrderBookSnapshot;
use crate::matching::engine::TradingEngine;
use crate::matching::types::PlaceOrderOutcome;
use crate::models::NewOrder;

use super::scenario::FaultType;

/// Shared fault-injection toggle, mutated by the demo orchestrator and read
/// by [`ChaosEngine`] on the hot path. Percentage/latency are stored as
/// fixed-point atomics so the read side never takes a lock.
pub struct ChaosState {
    active: AtomicBool,
    fault_type: AtomicU32,
    target_percentage: AtomicU32,
    latency_ms: AtomicU64,
}

const FAULT_LATENCY: u32 = 0;
const FAULT_ERROR: u32 = 1;
const FAULT_RESOURCE: u32 = 2;

impl Default for ChaosState {
    fn default() -> Self {
        Self {
            active: AtomicBool::new(false),
            fault_type: AtomicU32::new(FAULT_LATENCY),
            target_percentage: AtomicU32::new(0),
            latency_ms: AtomicU64::new(0),
        }
    }
}

impl ChaosState {
    pub fn activate(&self, fault_type: FaultType, target_percentage: f64, latency_ms: u64) {
        let code = match fault_type {
            FaultType::LatencyInjection => FAULT_LATENCY,
            FaultType::ErrorInjection => FAULT_ERROR,
            FaultType::ResourceExhaustion => FAULT_RESOURCE,
        };
        self.fault_type.store(code, Ordering::Relaxed);
        self.target_percentage
            .store((target_percentage.clamp(0.0, 100.0) * 100.0) as u32, Ordering::Relaxed);
        self.latency_ms.store(latency_ms, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Graduate the fault out by linearly scaling its target percentage down
    /// to `fraction` of its original value, avoiding a thundering-herd
    /// recovery (spec.md S4.5).
    pub fn graduate(&self, fraction: f64) {
        let base = self.target_percentage.load(Ordering::Relaxed) as f64;
        self.target_percentage
            .store((base * fraction.clamp(0.0, 1.0)) as u32, Ordering::Relaxed);
    }

    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
        self.target_percentage.store(0, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn should_affect(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        let percentage = self.target_percentage.load(Ordering::Relaxed) as f64 / 100.0;
        if percentage <= 0.0 {
            return false;
        }
        rand::thread_rng().gen_range(0.0..100.0) < percentage
    }

    fn fault_type(&self) -> FaultType {
        match self.fault_type.load(Ordering::Relaxed) {
            FAULT_ERROR => FaultType::ErrorInjection,
            FAULT_RESOURCE => FaultType::ResourceExhaustion,
            _ => FaultType::LatencyInjection,
        }
    }

    fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms.load(Ordering::Relaxed))
    }
}

/// Decorates a [`TradingEngine`] with fault injection driven by a shared
/// [`ChaosState`]. Composed outermost in the engine stack so injected
/// latency/errors are visible to the metrics layer beneath it, the same way
/// real degradation would be.
pub struct ChaosEngine {
    inner: Box<dyn TradingEngine>,
    state: Arc<ChaosState>,
}

impl ChaosEngine {
    pub fn new(inner: Box<dyn TradingEngine>, state: Arc<ChaosState>) -> Self {
        Self { inner, state }
    }
}

impl TradingEngine for ChaosEngine {
    fn place_order(&self, order: NewOrder) -> Result<PlaceOrderOutcome, ExchangeError> {
        if self.state.should_affect() {
            match self.state.fault_type() {
                FaultType::LatencyInjection => {
                    std::thread::sleep(self.state.latency());
                }
                FaultType::ErrorInjection => {
                    return Err(ExchangeError::Internal(
                        "injected fault: simulated matching engine error".into(),
                    ));
                }
                FaultType::ResourceExhaustion => {
                    std::thread::sleep(self.state.latency());
                    return Err(ExchangeError::Internal(
                        "injected fault: simulated resource exhaustion".into(),
                    ));
                }
            }
        }
        self.inner.place_order(order)
    }

    fn cancel_order(&self, id: Uuid) -> Result<(), ExchangeError> {
        self.inner.cancel_order(id)
    }

    fn get_order_book(&self, symbol: &str) -> Result<OrderBookSnapshot, ExchangeError> {
        self.inner.get_order_book(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_state_never_affects() {
        let state = ChaosState::default();
        assert!(!state.should_affect());
    }

    #[test]
    fn activate_sets_fields() {
        let state = ChaosState::default();
        state.activate(FaultType::LatencyInjection, 50.0, 100);
        assert!(state.is_active());
        assert_eq!(state.fault_type(), FaultType::LatencyInjection);
        assert_eq!(state.latency(), Duration::from_millis(100));
    }

    #[test]
    fn deactivate_clears_percentage() {
        let state = ChaosState::default();
        state.activate(FaultType::ErrorInjection, 100.0, 0);
        state.deactivate();
        assert!(!state.is_active());
        assert!(!state.should_affect());
    }
}
