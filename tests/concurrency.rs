//! S5: conservation under concurrent order submission — the sum of all
//! matched volume plus whatever remains resting in the book must always
//! equal the total quantity submitted, no matter how the threads interleave.
//! Also covers the collector's own count-conservation property: N
//! concurrent producers each emitting K events must be reflected exactly.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use exchange_sim::matching::engine::{MatchingEngine, TradingEngine};
use exchange_sim::matching::executor::BasicExecutor;
use exchange_sim::metrics::collector::MetricsCollector;
use exchange_sim::metrics::types::OrderEvent;
use exchange_sim::models::{NewOrder, Order, OrderSide, OrderType};
use exchange_sim::repository::{OrderRepository, TradeRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

const THREADS_PER_SIDE: usize = 10;
const ORDERS_PER_THREAD: usize = 100;
const QTY_PER_ORDER: i64 = 10;

/// S5: 10 threads submitting 100 buy orders race 10 threads submitting 100
/// sell orders, all at the same price so every order is tradable against
/// every other. Total submitted quantity must equal twice the matched
/// volume plus whatever remains resting, regardless of interleaving.
#[test]
fn s5_concurrent_orders_conserve_total_quantity() {
    let order_repo = Arc::new(OrderRepository::new());
    let trade_repo = Arc::new(TradeRepository::new());
    let executor = Box::new(BasicExecutor::new(trade_repo.clone()));
    let engine: Arc<dyn TradingEngine> = Arc::new(MatchingEngine::new(order_repo.clone(), executor));

    let mut handles = Vec::new();
    for _ in 0..THREADS_PER_SIDE {
        let engine = engine.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..ORDERS_PER_THREAD {
                engine
                    .place_order(NewOrder {
                        id: None,
                        symbol: "NVDA".to_string(),
                        side: OrderSide::Buy,
                        order_type: OrderType::Limit,
                        quantity: Decimal::from(QTY_PER_ORDER),
                        price: Some(dec!(500)),
                        timestamp: None,
                    })
                    .unwrap();
            }
        }));
    }
    for _ in 0..THREADS_PER_SIDE {
        let engine = engine.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..ORDERS_PER_THREAD {
                engine
                    .place_order(NewOrder {
                        id: None,
                        symbol: "NVDA".to_string(),
                        side: OrderSide::Sell,
                        order_type: OrderType::Limit,
                        quantity: Decimal::from(QTY_PER_ORDER),
                        price: Some(dec!(500)),
                        timestamp: None,
                    })
                    .unwrap();
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    let total_submitted: Decimal =
        Decimal::from((2 * THREADS_PER_SIDE * ORDERS_PER_THREAD) as i64) * Decimal::from(QTY_PER_ORDER);

    let trades = trade_repo.get_all();
    let matched_volume: Decimal = trades.iter().map(|t| t.quantity).sum();

    let book = engine.get_order_book("NVDA").unwrap();
    let resting_volume: Decimal = book
        .bids
        .iter()
        .chain(book.asks.iter())
        .map(|level| level.quantity)
        .sum();

    assert_eq!(matched_volume * Decimal::from(2) + resting_volume, total_submitted);
}

/// Collector event-count conservation: N concurrent producers each pushing
/// K events must yield exactly N*K events visible in the snapshot, with no
/// lost updates under contention.
#[test]
fn collector_conserves_event_count_under_contention() {
    const PRODUCERS: usize = 8;
    const EVENTS_PER_PRODUCER: usize = 250;

    let collector = Arc::new(MetricsCollector::new(Duration::from_secs(60)));
    let mut handles = Vec::new();
    for _ in 0..PRODUCERS {
        let collector = collector.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..EVENTS_PER_PRODUCER {
                let order = Order {
                    id: Uuid::new_v4(),
                    symbol: "NVDA".to_string(),
                    side: OrderSide::Buy,
                    order_type: OrderType::Limit,
                    quantity: dec!(1),
                    original_quantity: dec!(1),
                    price: Some(dec!(500)),
                    timestamp: 0,
                };
                collector.record_order(OrderEvent::new(&order, 1.0));
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    let snapshot = collector.get_current_metrics();
    assert_eq!(snapshot.order_count, (PRODUCERS * EVENTS_PER_PRODUCER) as u64);
}
