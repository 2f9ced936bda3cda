//! Executor (spec.md S2 "Executor ~4%"): turns a `Match` into a persisted
//! `Trade`. The decorator variant additionally emits a trade event to the
//! metrics collector, following the "decorator stack around the engine"
//! strategy from spec.md S9 — composition by explicit wrapping, no
//! inheritance, mirroring the teacher's middleware-layering idiom in
//! `api::middleware::metrics`.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::ExchangeError;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::types::TradeEvent;
use crate::models::Trade;
use crate::repository::TradeRepository;

use super::types::Match;

pub trait TradeExecutor: Send + Sync {
    /// Persist the trade described by `m` and return it.
    fn execute(&self, m: &Match) -> Result<Trade, ExchangeError>;
}

/// Builds and saves the `Trade` record for a match. No metrics, no side
/// effects beyond the trade repository.
pub struct BasicExecutor {
    trade_repo: Arc<TradeRepository>,
}

impl BasicExecutor {
    pub fn new(trade_repo: Arc<TradeRepository>) -> Self {
        Self { trade_repo }
    }
}

impl TradeExecutor for BasicExecutor {
    fn execute(&self, m: &Match) -> Result<Trade, ExchangeError> {
        let trade = Trade {
            id: Uuid::new_v4(),
            buy_order_id: m.buy_order_id,
            sell_order_id: m.sell_order_id,
            symbol: m.symbol.clone(),
            quantity: m.quantity,
            price: m.price,
            timestamp: Utc::now().timestamp_millis(),
        };
        self.trade_repo
            .save(trade)
            .map_err(|e| ExchangeError::Repository(format!("failed to save trade: {e}")))
    }
}

/// Wraps an inner executor and records a [`TradeEvent`] for every successful
/// execution. Never fails the caller on a metrics error: if the collector is
/// unhealthy the event is simply dropped (spec.md S7 — metrics paths must
/// never cause the caller to fail).
pub struct MetricsDecoratedExecutor {
    inner: Box<dyn TradeExecutor>,
    collector: Arc<MetricsCollector>,
}

impl MetricsDecoratedExecutor {
    pub fn new(inner: Box<dyn TradeExecutor>, collector: Arc<MetricsCollector>) -> Self {
        Self { inner, collector }
    }
}

impl TradeExecutor for MetricsDecoratedExecutor {
    fn execute(&self, m: &Match) -> Result<Trade, ExchangeError> {
        let started = std::time::Instant::now();
        let trade = self.inner.execute(m)?;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.collector.record_trade(TradeEvent::with_latency(&trade, latency_ms));
        Ok(trade)
    }
}
