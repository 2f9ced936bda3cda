use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::Order;

/// A transient matching decision: trade `quantity` units between `buy_order_id`
/// and `sell_order_id` at `price`. Produced by the matcher, consumed exactly
/// once by the executor in the same critical section (spec.md S3).
#[derive(Debug, Clone)]
pub struct Match {
    pub buy_order_id: Uuid,
    pub sell_order_id: Uuid,
    pub symbol: String,
    pub quantity: Decimal,
    pub price: Decimal,
}

/// Result of `MatchingEngine::place_order`: the (possibly mutated) order as
/// it ended up, plus every trade generated while filling it.
#[derive(Debug, Clone)]
pub struct PlaceOrderOutcome {
    pub order: Order,
    pub trades: Vec<crate::models::Trade>,
}
