//! Integration-level coverage of spec.md's testable properties S1-S4, S6,
//! exercised through the public `TradingEngine` surface rather than the
//! pure `matcher` functions directly.

use std::sync::Arc;

use exchange_sim::matching::engine::{MatchingEngine, TradingEngine};
use exchange_sim::matching::executor::BasicExecutor;
use exchange_sim::models::{NewOrder, OrderSide, OrderType};
use exchange_sim::repository::{OrderRepository, TradeRepository};
use rust_decimal_macros::dec;

fn new_engine() -> MatchingEngine {
    let order_repo = Arc::new(OrderRepository::new());
    let trade_repo = Arc::new(TradeRepository::new());
    let executor = Box::new(BasicExecutor::new(trade_repo));
    MatchingEngine::new(order_repo, executor)
}

fn limit(side: OrderSide, qty: rust_decimal::Decimal, price: rust_decimal::Decimal) -> NewOrder {
    NewOrder {
        id: None,
        symbol: "MSFT".to_string(),
        side,
        order_type: OrderType::Limit,
        quantity: qty,
        price: Some(price),
        timestamp: None,
    }
}

fn market(side: OrderSide, qty: rust_decimal::Decimal) -> NewOrder {
    NewOrder {
        id: None,
        symbol: "MSFT".to_string(),
        side,
        order_type: OrderType::Market,
        quantity: qty,
        price: None,
        timestamp: None,
    }
}

/// S1: a crossing limit order against a single resting order matches fully
/// and leaves the remainder resting.
#[test]
fn s1_crossing_limit_matches_and_rests_remainder() {
    let engine = new_engine();
    engine.place_order(limit(OrderSide::Sell, dec!(100), dec!(50))).unwrap();
    let outcome = engine.place_order(limit(OrderSide::Buy, dec!(40), dec!(50))).unwrap();

    assert_eq!(outcome.trades.len(), 1);
    assert_eq!(outcome.trades[0].quantity, dec!(40));
    assert_eq!(outcome.trades[0].price, dec!(50));

    let book = engine.get_order_book("MSFT").unwrap();
    assert_eq!(book.asks[0].quantity, dec!(60));
}

/// S2: a market order sweeps multiple price levels in price-then-time
/// order and trades at each resting order's own price.
#[test]
fn s2_market_order_sweeps_price_levels_in_order() {
    let engine = new_engine();
    engine.place_order(limit(OrderSide::Sell, dec!(10), dec!(101))).unwrap();
    engine.place_order(limit(OrderSide::Sell, dec!(10), dec!(100))).unwrap();
    engine.place_order(limit(OrderSide::Sell, dec!(10), dec!(102))).unwrap();

    let outcome = engine.place_order(market(OrderSide::Buy, dec!(25))).unwrap();

    assert_eq!(outcome.trades.len(), 3);
    assert_eq!(outcome.trades[0].price, dec!(100));
    assert_eq!(outcome.trades[1].price, dec!(101));
    assert_eq!(outcome.trades[2].price, dec!(102));
    assert_eq!(outcome.trades[2].quantity, dec!(5));

    let book = engine.get_order_book("MSFT").unwrap();
    assert_eq!(book.asks.len(), 1);
    assert_eq!(book.asks[0].price, dec!(102));
    assert_eq!(book.asks[0].quantity, dec!(5));
}

/// S3: two resting orders at the same price trade in timestamp (arrival)
/// order — first in, first matched.
#[test]
fn s3_same_price_ties_break_by_arrival_order() {
    let engine = new_engine();
    let mut first = limit(OrderSide::Sell, dec!(10), dec!(50));
    first.timestamp = Some(1_000);
    let mut second = limit(OrderSide::Sell, dec!(10), dec!(50));
    second.timestamp = Some(2_000);

    let r1 = engine.place_order(first).unwrap();
    let r2 = engine.place_order(second).unwrap();

    let outcome = engine.place_order(limit(OrderSide::Buy, dec!(10), dec!(50))).unwrap();
    assert_eq!(outcome.trades.len(), 1);
    assert_eq!(outcome.trades[0].sell_order_id, r1.order.id);
    assert_ne!(outcome.trades[0].sell_order_id, r2.order.id);
}

/// S4: cancelling a resting order removes it from the book and a later
/// crossing order no longer matches against it.
#[test]
fn s4_cancel_removes_order_from_future_matches() {
    let engine = new_engine();
    let mut order = limit(OrderSide::Buy, dec!(10), dec!(50));
    let id = uuid::Uuid::new_v4();
    order.id = Some(id);
    engine.place_order(order).unwrap();

    engine.cancel_order(id).unwrap();

    let outcome = engine.place_order(limit(OrderSide::Sell, dec!(10), dec!(50))).unwrap();
    assert!(outcome.trades.is_empty());

    let book = engine.get_order_book("MSFT").unwrap();
    assert_eq!(book.asks.len(), 1);
}

/// S6: a non-crossing limit order rests untouched on its own side with no
/// trades generated.
#[test]
fn s6_non_crossing_limit_rests_without_trading() {
    let engine = new_engine();
    engine.place_order(limit(OrderSide::Sell, dec!(10), dec!(60))).unwrap();
    let outcome = engine.place_order(limit(OrderSide::Buy, dec!(10), dec!(50))).unwrap();

    assert!(outcome.trades.is_empty());
    let book = engine.get_order_book("MSFT").unwrap();
    assert_eq!(book.bids.len(), 1);
    assert_eq!(book.asks.len(), 1);
}

/// S8 round-trip law: a market order that partially fills and rests (no
/// opposite liquidity left for the remainder) must still be visible in the
/// book — as a matter of its un-priced remainder, not silently dropped —
/// since it was neither fully matched nor cancelled.
#[test]
fn s8_resting_market_remainder_is_visible_in_book() {
    let engine = new_engine();
    engine.place_order(limit(OrderSide::Sell, dec!(10), dec!(100))).unwrap();

    let outcome = engine.place_order(market(OrderSide::Buy, dec!(30))).unwrap();
    assert_eq!(outcome.trades.len(), 1);
    assert_eq!(outcome.order.quantity, dec!(20));

    let book = engine.get_order_book("MSFT").unwrap();
    assert!(book.asks.is_empty());
    assert_eq!(book.pending_market_bids.quantity, dec!(20));
    assert_eq!(book.pending_market_bids.order_count, 1);
    assert_eq!(book.pending_market_asks.order_count, 0);
}
