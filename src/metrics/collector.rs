//! Windowed, lock-protected metrics collector (spec.md S4.3).
//!
//! Two bounded event sequences (orders, trades) plus a derived per-symbol
//! map. Ingestion is O(1) append under a single exclusive lock; eviction of
//! events older than the configured window is lazy, triggered by either
//! ingestion or a read. Grounded in the teacher's counter/histogram
//! recording idiom (`metrics::record_*`) but reimplemented as an in-memory
//! event buffer since the windowed-on-demand-percentile contract cannot be
//! reconstructed from a push-only Prometheus exporter (see `prometheus` for
//! the ambient counterpart).

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;

use super::types::{OrderEvent, TradeEvent};

#[derive(Debug, Clone, Default, Serialize)]
pub struct SymbolStats {
    pub order_count: u64,
    pub trade_count: u64,
    pub volume: Decimal,
    pub avg_price: Decimal,
    pub last_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub order_count: u64,
    pub trade_count: u64,
    pub total_volume: Decimal,
    pub avg_latency_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub p99_latency_ms: f64,
    pub orders_per_sec: f64,
    pub trades_per_sec: f64,
    pub volume_per_sec: f64,
    pub error_rate: f64,
    pub symbol_metrics: HashMap<String, SymbolStats>,
}

struct CollectorState {
    order_events: VecDeque<OrderEvent>,
    trade_events: VecDeque<TradeEvent>,
}

/// Windowed collector of order/trade events. Shared behind an `Arc` across
/// the metrics-decorated engine/executor and the HTTP metrics handler.
pub struct MetricsCollector {
    state: Mutex<CollectorState>,
    window: Duration,
    healthy: AtomicBool,
    errors: std::sync::atomic::AtomicU64,
}

impl MetricsCollector {
    pub fn new(window: Duration) -> Self {
        Self {
            state: Mutex::new(CollectorState {
                order_events: VecDeque::new(),
                trade_events: VecDeque::new(),
            }),
            window,
            healthy: AtomicBool::new(true),
            errors: std::sync::atomic::AtomicU64::new(0),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(AtomicOrdering::Relaxed)
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, AtomicOrdering::Relaxed);
    }

    /// Process-lifetime count of rejected `place_order` calls, surfaced in
    /// the metrics wire format as `error_rate` (spec.md S6).
    pub fn record_error(&self) {
        self.errors.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// O(1) append. Silently dropped if the collector has been stopped
    /// (spec.md S7: metrics paths must never fail the caller).
    pub fn record_order(&self, event: OrderEvent) {
        if !self.is_healthy() {
            return;
        }
        let mut state = self.state.lock();
        state.order_events.push_back(event);
        Self::prune(&mut state.order_events, self.window);
    }

    pub fn record_trade(&self, event: TradeEvent) {
        if !self.is_healthy() {
            return;
        }
        let mut state = self.state.lock();
        state.trade_events.push_back(event);
        Self::prune(&mut state.trade_events, self.window);
    }

    /// Aggregate over the configured default window.
    pub fn get_current_metrics(&self) -> MetricsSnapshot {
        self.calculate_metrics(self.window)
    }

    /// Aggregate over an arbitrary window, as of now. Also prunes the
    /// backing buffers against the collector's configured window.
    pub fn calculate_metrics(&self, window: Duration) -> MetricsSnapshot {
        let now = Utc::now().timestamp_millis();
        let window_ms = window.as_millis() as i64;
        let window_secs = window.as_secs_f64().max(f64::EPSILON);
        let cutoff = now - window_ms;

        let mut state = self.state.lock();
        Self::prune(&mut state.order_events, self.window);
        Self::prune(&mut state.trade_events, self.window);

        let orders: Vec<&OrderEvent> = state
            .order_events
            .iter()
            .filter(|e| e.timestamp >= cutoff)
            .collect();
        let trades: Vec<&TradeEvent> = state
            .trade_events
            .iter()
            .filter(|e| e.timestamp >= cutoff)
            .collect();

        let order_count = orders.len() as u64;
        let trade_count = trades.len() as u64;
        let total_volume: Decimal = trades.iter().map(|t| t.quantity).sum();

        let mut latencies: Vec<f64> = orders.iter().map(|e| e.latency_ms).collect();
        latencies.extend(trades.iter().map(|e| e.latency_ms));

        let (avg_latency_ms, min_latency_ms, max_latency_ms, p95_latency_ms, p99_latency_ms) =
            latency_stats(&mut latencies);

        let mut symbol_metrics: HashMap<String, SymbolStats> = HashMap::new();
        for e in &orders {
            let stats = symbol_metrics.entry(e.symbol.clone()).or_default();
            stats.order_count += 1;
        }
        for t in &trades {
            let stats = symbol_metrics.entry(t.symbol.clone()).or_default();
            stats.trade_count += 1;
            stats.volume += t.quantity;
            stats.last_price = t.price;
            if stats.high_price.is_zero() || t.price > stats.high_price {
                stats.high_price = t.price;
            }
            if stats.low_price.is_zero() || t.price < stats.low_price {
                stats.low_price = t.price;
            }
        }
        for (symbol, stats) in symbol_metrics.iter_mut() {
            let symbol_trades: Vec<&&TradeEvent> =
                trades.iter().filter(|t| t.symbol == *symbol).collect();
            if !symbol_trades.is_empty() {
                let sum: Decimal = symbol_trades.iter().map(|t| t.price).sum();
                stats.avg_price = sum / Decimal::from(symbol_trades.len());
            }
        }

        MetricsSnapshot {
            order_count,
            trade_count,
            total_volume,
            avg_latency_ms,
            min_latency_ms,
            max_latency_ms,
            p95_latency_ms,
            p99_latency_ms,
            orders_per_sec: order_count as f64 / window_secs,
            trades_per_sec: trade_count as f64 / window_secs,
            volume_per_sec: total_volume.to_string().parse::<f64>().unwrap_or(0.0) / window_secs,
            error_rate: {
                let errors = self.errors.load(AtomicOrdering::Relaxed) as f64;
                errors / (order_count as f64 + errors).max(1.0)
            },
            symbol_metrics,
        }
    }

    fn prune<T>(events: &mut VecDeque<T>, window: Duration)
    where
        T: TimestampedEvent,
    {
        let cutoff = Utc::now().timestamp_millis() - window.as_millis() as i64;
        while let Some(front) = events.front() {
            if front.timestamp() < cutoff {
                events.pop_front();
            } else {
                break;
            }
        }
    }
}

trait TimestampedEvent {
    fn timestamp(&self) -> i64;
}

impl TimestampedEvent for OrderEvent {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl TimestampedEvent for TradeEvent {
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Nearest-rank percentile computation (spec.md S9 Open Question: percentiles
/// reconstructed from the same event buffer rather than left approximate).
fn latency_stats(latencies: &mut [f64]) -> (f64, f64, f64, f64, f64) {
    if latencies.is_empty() {
        return (0.0, 0.0, 0.0, 0.0, 0.0);
    }
    latencies.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let avg = latencies.iter().sum::<f64>() / latencies.len() as f64;
    let min = latencies[0];
    let max = latencies[latencies.len() - 1];
    (avg, min, max, percentile(latencies, 0.95), percentile(latencies, 0.99))
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p * sorted.len() as f64).ceil() as usize;
    let idx = rank.saturating_sub(1).min(sorted.len() - 1);
    sorted[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Order, OrderSide, OrderType, Trade};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn order_event(symbol: &str, latency_ms: f64) -> OrderEvent {
        let order = Order {
            id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            side: OrderSide::Buy,
            order_type: OrderType::Limit,
            quantity: dec!(10),
            original_quantity: dec!(10),
            price: Some(dec!(100)),
            timestamp: 0,
        };
        OrderEvent::new(&order, latency_ms)
    }

    fn trade_event(symbol: &str, price: Decimal, qty: Decimal) -> TradeEvent {
        let trade = Trade {
            id: Uuid::new_v4(),
            buy_order_id: Uuid::new_v4(),
            sell_order_id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            quantity: qty,
            price,
            timestamp: Utc::now().timestamp_millis(),
        };
        TradeEvent::from_trade(&trade)
    }

    #[test]
    fn counts_accumulate() {
        let collector = MetricsCollector::new(Duration::from_secs(60));
        for _ in 0..5 {
            collector.record_order(order_event("AAPL", 1.0));
        }
        for _ in 0..3 {
            collector.record_trade(trade_event("AAPL", dec!(100), dec!(1)));
        }
        let snapshot = collector.get_current_metrics();
        assert_eq!(snapshot.order_count, 5);
        assert_eq!(snapshot.trade_count, 3);
    }

    #[test]
    fn unhealthy_collector_drops_events() {
        let collector = MetricsCollector::new(Duration::from_secs(60));
        collector.set_healthy(false);
        collector.record_order(order_event("AAPL", 1.0));
        assert_eq!(collector.get_current_metrics().order_count, 0);
    }

    #[test]
    fn per_symbol_price_stats() {
        let collector = MetricsCollector::new(Duration::from_secs(60));
        collector.record_trade(trade_event("AAPL", dec!(100), dec!(1)));
        collector.record_trade(trade_event("AAPL", dec!(110), dec!(1)));
        let snapshot = collector.get_current_metrics();
        let stats = &snapshot.symbol_metrics["AAPL"];
        assert_eq!(stats.high_price, dec!(110));
        assert_eq!(stats.low_price, dec!(100));
        assert_eq!(stats.last_price, dec!(110));
    }

    #[test]
    fn percentiles_are_nearest_rank() {
        let mut values = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        let (avg, min, max, p95, p99) = latency_stats(&mut values);
        assert_eq!(avg, 30.0);
        assert_eq!(min, 10.0);
        assert_eq!(max, 50.0);
        assert_eq!(p95, 50.0);
        assert_eq!(p99, 50.0);
    }
}
