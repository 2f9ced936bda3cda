//! Matching engine (spec.md S4.1): serializes mutations to the global
//! trading state, enforces the matching protocol, and serves read-only
//! order-book snapshots. Generalizes the teacher's `Orderbook::match_order`
//! (a single struct owning `RwLock<BTreeMap<..>>` books plus an
//! `order_index`) into an engine that drives the repository layer through
//! the pure `matcher` and a swappable `executor`, holding one engine-wide
//! `RwLock<()>` for the compound critical section spec.md S5 requires.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ExchangeError;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::types::OrderEvent;
use crate::models::{NewOrder, Order, OrderSide, OrderType};
use crate::repository::OrderRepository;

use super::book::{build_levels, pending_market, OrderBookSnapshot};
use super::executor::TradeExecutor;
use super::matcher::{generate_matches, sort_candidates};
use super::types::PlaceOrderOutcome;

/// The engine's public contract (spec.md S6), small enough to decorate by
/// explicit wrapping rather than inheritance.
pub trait TradingEngine: Send + Sync {
    fn place_order(&self, order: NewOrder) -> Result<PlaceOrderOutcome, ExchangeError>;
    fn cancel_order(&self, id: Uuid) -> Result<(), ExchangeError>;
    fn get_order_book(&self, symbol: &str) -> Result<OrderBookSnapshot, ExchangeError>;
}

/// Base engine: validate, load candidates, match, execute, persist. No
/// metrics logic lives here — see [`MetricsEngine`].
pub struct MatchingEngine {
    order_repo: Arc<OrderRepository>,
    executor: Box<dyn TradeExecutor>,
    lock: RwLock<()>,
}

impl MatchingEngine {
    pub fn new(order_repo: Arc<OrderRepository>, executor: Box<dyn TradeExecutor>) -> Self {
        Self {
            order_repo,
            executor,
            lock: RwLock::new(()),
        }
    }

    fn validate(order: &NewOrder) -> Result<(), ExchangeError> {
        if order.symbol.trim().is_empty() {
            return Err(ExchangeError::Validation("symbol must not be empty".into()));
        }
        if order.quantity <= Decimal::ZERO {
            return Err(ExchangeError::Validation("quantity must be positive".into()));
        }
        if order.order_type == OrderType::Limit {
            match order.price {
                Some(p) if p > Decimal::ZERO => {}
                _ => {
                    return Err(ExchangeError::Validation(
                        "limit order requires a positive price".into(),
                    ))
                }
            }
        }
        Ok(())
    }
}

impl TradingEngine for MatchingEngine {
    fn place_order(&self, new_order: NewOrder) -> Result<PlaceOrderOutcome, ExchangeError> {
        Self::validate(&new_order)?;

        let _guard = self.lock.write();

        let mut incoming = Order {
            id: new_order.id.unwrap_or_else(Uuid::new_v4),
            symbol: new_order.symbol,
            side: new_order.side,
            order_type: new_order.order_type,
            quantity: new_order.quantity,
            original_quantity: new_order.quantity,
            price: new_order.price,
            timestamp: new_order.timestamp.unwrap_or_else(|| Utc::now().timestamp_millis()),
        };

        let mut candidates = self
            .order_repo
            .get_by_symbol(&incoming.symbol)
            .into_iter()
            .filter(|o| o.side == incoming.side.opposite())
            .collect::<Vec<_>>();
        sort_candidates(incoming.side, &mut candidates);

        let outcome = generate_matches(&incoming, &candidates);

        let mut trades = Vec::with_capacity(outcome.matches.len());
        for m in &outcome.matches {
            let trade = self.executor.execute(m)?;
            trades.push(trade);
        }

        for candidate in &candidates {
            if let Some(&remaining) = outcome.resting_remaining.get(&candidate.id) {
                if remaining <= Decimal::ZERO {
                    // missing id is a benign race with a concurrent cancel; ignore
                    let _ = self.order_repo.delete(candidate.id);
                } else {
                    let mut updated = candidate.clone();
                    updated.quantity = remaining;
                    self.order_repo.update(updated)?;
                }
            }
        }

        incoming.quantity = outcome.incoming_remaining;
        if incoming.quantity > Decimal::ZERO {
            self.order_repo.save(incoming.clone())?;
        }

        Ok(PlaceOrderOutcome {
            order: incoming,
            trades,
        })
    }

    fn cancel_order(&self, id: Uuid) -> Result<(), ExchangeError> {
        let _guard = self.lock.write();
        self.order_repo.delete(id)
    }

    fn get_order_book(&self, symbol: &str) -> Result<OrderBookSnapshot, ExchangeError> {
        let _guard = self.lock.read();
        let orders = self.order_repo.get_by_symbol(symbol);
        let bids: Vec<Order> = orders.iter().filter(|o| o.side == OrderSide::Buy).cloned().collect();
        let asks: Vec<Order> = orders.iter().filter(|o| o.side == OrderSide::Sell).cloned().collect();

        Ok(OrderBookSnapshot {
            symbol: symbol.to_string(),
            bids: build_levels(&bids, true),
            asks: build_levels(&asks, false),
            pending_market_bids: pending_market(&bids),
            pending_market_asks: pending_market(&asks),
            timestamp: Utc::now().timestamp_millis(),
        })
    }
}

/// Decorates any [`TradingEngine`] with order-event timing, following the
/// "metrics-enabled engine wraps base engine" strategy from spec.md S9.
/// Never fails the caller on a metrics error.
pub struct MetricsEngine {
    inner: Box<dyn TradingEngine>,
    collector: Arc<MetricsCollector>,
}

impl MetricsEngine {
    pub fn new(inner: Box<dyn TradingEngine>, collector: Arc<MetricsCollector>) -> Self {
        Self { inner, collector }
    }
}

impl TradingEngine for MetricsEngine {
    fn place_order(&self, order: NewOrder) -> Result<PlaceOrderOutcome, ExchangeError> {
        let started = std::time::Instant::now();
        let result = self.inner.place_order(order);
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(outcome) => self.collector.record_order(OrderEvent::new(&outcome.order, latency_ms)),
            Err(_) => self.collector.record_error(),
        }
        result
    }

    fn cancel_order(&self, id: Uuid) -> Result<(), ExchangeError> {
        self.inner.cancel_order(id)
    }

    fn get_order_book(&self, symbol: &str) -> Result<OrderBookSnapshot, ExchangeError> {
        self.inner.get_order_book(symbol)
    }
}
