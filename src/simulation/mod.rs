//! Synthetic per-symbol order generator (spec.md S2 "Simulation ~6%").
//!
//! Grounded in the teacher pack's `performance::load_generator::LoadGenerator`:
//! an `Arc<AtomicBool>` running flag, a `tokio::spawn`'d loop driven by a
//! tick interval, and random jitter drawn per tick. Here the event emitted
//! each tick is a synthetic order placed against the real matching engine
//! rather than a latency span recorded into a registry. The worker pool
//! (spec.md S4.5 "a worker pool produces synthetic orders ... with a
//! bounded concurrent-user count") spawns one such loop per configured
//! user, each pacing itself against a shared, live-readable rate so a
//! demo-orchestrator ramp can scale the whole pool smoothly mid-run.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tracing::info;

use crate::matching::engine::TradingEngine;
use crate::models::{NewOrder, OrderSide, OrderType};

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub symbols: Vec<String>,
    /// Target synthetic orders placed per second at full ramp (fraction 1.0),
    /// summed across all workers.
    pub orders_per_sec: f64,
    /// Fractional price jitter applied around each symbol's walking mid-price.
    pub volatility: f64,
    pub base_prices: Vec<Decimal>,
    /// Bounded concurrent-user count (spec.md S4.5): number of independent
    /// order-generating workers run side by side, each pacing at its share
    /// of the total rate.
    pub concurrent_workers: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["AAPL".to_string(), "MSFT".to_string(), "GOOG".to_string()],
            orders_per_sec: 10.0,
            volatility: 0.01,
            base_prices: vec![Decimal::from(150), Decimal::from(300), Decimal::from(2800)],
            concurrent_workers: 1,
        }
    }
}

/// Outcome counters surfaced through the demo orchestrator's progress
/// contract and result reports (spec.md S4.5).
#[derive(Default)]
struct SimStats {
    attempted: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

/// Drives synthetic order flow against a [`TradingEngine`] so the metrics
/// pipeline and demo orchestrator have something to observe without a real
/// market feed.
pub struct MarketSimulator {
    engine: Arc<dyn TradingEngine>,
    config: Mutex<SimulatorConfig>,
    /// Target rate at full ramp (fraction 1.0), stored as `f64` bits so
    /// workers can read it lock-free every tick.
    base_rate: Arc<AtomicU64>,
    /// Live ramp fraction in `[0.0, 1.0]`, applied against `base_rate`
    /// fresh on every tick — never compounded into the rate itself.
    rate_fraction: Arc<AtomicU64>,
    volatility_bits: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<()>>>,
    stats: Arc<SimStats>,
}

impl MarketSimulator {
    pub fn new(engine: Arc<dyn TradingEngine>, config: SimulatorConfig) -> Self {
        let base_rate = Arc::new(AtomicU64::new(config.orders_per_sec.to_bits()));
        let volatility_bits = Arc::new(AtomicU64::new(config.volatility.to_bits()));
        Self {
            engine,
            config: Mutex::new(config),
            base_rate,
            rate_fraction: Arc::new(AtomicU64::new(1.0f64.to_bits())),
            volatility_bits,
            running: Arc::new(AtomicBool::new(false)),
            task: Mutex::new(None),
            stats: Arc::new(SimStats::default()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Apply a demo scenario's symbols, target rate, and concurrent-user
    /// count before starting a run (spec.md S4.5: "against chosen symbols
    /// with a bounded concurrent-user count"). Takes effect on the next
    /// `start()`; a no-op `symbols` list leaves the current symbol universe
    /// untouched.
    pub fn configure(&self, symbols: Vec<String>, target_rate: f64, concurrent_users: u32) {
        if !symbols.is_empty() {
            self.config.lock().symbols = symbols;
        }
        self.config.lock().concurrent_workers = concurrent_users.max(1);
        self.base_rate.store(target_rate.max(0.0).to_bits(), Ordering::Relaxed);
        self.rate_fraction.store(1.0f64.to_bits(), Ordering::Relaxed);
    }

    /// Scale the live rate to `fraction` of the configured target
    /// (spec.md S4.5: "ramp-up linearly increases rate from 0 to target;
    /// ramp-down reverses"). Computed fresh against the immutable target
    /// rate every call, so repeated ramp ticks never compound.
    pub fn set_rate_multiplier(&self, fraction: f64) {
        self.rate_fraction.store(fraction.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    /// Temporarily widen per-tick price jitter to emulate a volatility spike.
    pub fn inject_volatility(&self, volatility: f64) {
        self.volatility_bits.store(volatility.to_bits(), Ordering::Relaxed);
        self.config.lock().volatility = volatility;
    }

    pub fn attempted(&self) -> u64 {
        self.stats.attempted.load(Ordering::Relaxed)
    }

    pub fn succeeded(&self) -> u64 {
        self.stats.succeeded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.stats.failed.load(Ordering::Relaxed)
    }

    pub fn reset_stats(&self) {
        self.stats.attempted.store(0, Ordering::Relaxed);
        self.stats.succeeded.store(0, Ordering::Relaxed);
        self.stats.failed.store(0, Ordering::Relaxed);
    }

    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let (symbols, base_prices, workers) = {
            let config = self.config.lock();
            (config.symbols.clone(), config.base_prices.clone(), config.concurrent_workers.max(1))
        };

        info!(workers, symbols = ?symbols, "market simulator started");

        let mut handles = Vec::with_capacity(workers as usize);
        for _ in 0..workers {
            let engine = self.engine.clone();
            let running = self.running.clone();
            let base_rate = self.base_rate.clone();
            let rate_fraction = self.rate_fraction.clone();
            let volatility_bits = self.volatility_bits.clone();
            let stats = self.stats.clone();
            let symbols = symbols.clone();
            let base_prices = base_prices.clone();

            handles.push(tokio::spawn(async move {
                let mut rng = StdRng::from_entropy();

                while running.load(Ordering::SeqCst) {
                    let rate = f64::from_bits(base_rate.load(Ordering::Relaxed))
                        * f64::from_bits(rate_fraction.load(Ordering::Relaxed))
                        / workers as f64;
                    let interval = Duration::from_secs_f64(1.0 / rate.max(0.01));
                    tokio::time::sleep(interval).await;
                    if !running.load(Ordering::SeqCst) {
                        break;
                    }

                    let volatility = f64::from_bits(volatility_bits.load(Ordering::Relaxed));
                    let idx = rng.gen_range(0..symbols.len());
                    let symbol = symbols[idx].clone();
                    let base_price = base_prices.get(idx).copied().unwrap_or(Decimal::from(100));

                    let jitter: f64 = rng.gen_range(-volatility..volatility);
                    let price = base_price.to_f64().unwrap_or(100.0) * (1.0 + jitter);
                    let price = Decimal::from_f64_retain(price).unwrap_or(base_price);

                    let side = if rng.gen_bool(0.5) { OrderSide::Buy } else { OrderSide::Sell };
                    let order_type = if rng.gen_bool(0.1) { OrderType::Market } else { OrderType::Limit };
                    let quantity = Decimal::from(rng.gen_range(1..=50));

                    let order = NewOrder {
                        id: None,
                        symbol,
                        side,
                        order_type,
                        quantity,
                        price: matches!(order_type, OrderType::Limit).then_some(price),
                        timestamp: None,
                    };

                    stats.attempted.fetch_add(1, Ordering::Relaxed);
                    match engine.place_order(order) {
                        Ok(_) => {
                            stats.succeeded.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(err) => {
                            stats.failed.fetch_add(1, Ordering::Relaxed);
                            tracing::debug!(error = %err, "simulator order rejected");
                        }
                    }
                }
            }));
        }

        *self.task.lock() = Some(tokio::spawn(async move {
            for handle in handles {
                let _ = handle.await;
            }
            info!("market simulator stopped");
        }));
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }
}
