use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Order;

/// One price level in a [`OrderBookSnapshot`]: aggregate resting quantity
/// and order count at that price.
#[derive(Debug, Clone, Serialize)]
pub struct PriceLevelSnapshot {
    pub price: Decimal,
    pub quantity: Decimal,
    pub order_count: usize,
}

/// Aggregate resting quantity with no price level, i.e. resting `Market`
/// orders that matched partially and carried a remainder (spec.md S8 round
/// trip: `PlaceOrder(O)` then `GetOrderBook` must show `O`, possibly reduced,
/// or no trace of it at all — a priced-levels-only view would silently drop
/// these and break that disjunction).
#[derive(Debug, Clone, Default, Serialize)]
pub struct MarketLevelSnapshot {
    pub quantity: Decimal,
    pub order_count: usize,
}

/// A consistent, read-only view of a symbol's resting bids and asks, sorted
/// by price-time priority (spec.md S3 "OrderBook (derived)"). Never
/// persisted; constructed fresh under the engine's shared lock.
#[derive(Debug, Clone, Serialize)]
pub struct OrderBookSnapshot {
    pub symbol: String,
    pub bids: Vec<PriceLevelSnapshot>,
    pub asks: Vec<PriceLevelSnapshot>,
    /// Resting unpriced (market) bid quantity, not represented in `bids`.
    pub pending_market_bids: MarketLevelSnapshot,
    /// Resting unpriced (market) ask quantity, not represented in `asks`.
    pub pending_market_asks: MarketLevelSnapshot,
    pub timestamp: i64,
}

/// Aggregate same-side resting *priced* orders into price levels, bids
/// sorted descending by price, asks ascending. Orders with no price (resting
/// market orders) are excluded — see [`pending_market`].
pub fn build_levels(orders: &[Order], descending: bool) -> Vec<PriceLevelSnapshot> {
    use std::collections::BTreeMap;

    let mut levels: BTreeMap<Decimal, (Decimal, usize)> = BTreeMap::new();
    for order in orders {
        let Some(price) = order.price else { continue };
        let entry = levels.entry(price).or_insert((Decimal::ZERO, 0));
        entry.0 += order.quantity;
        entry.1 += 1;
    }

    let mut result: Vec<PriceLevelSnapshot> = levels
        .into_iter()
        .map(|(price, (quantity, order_count))| PriceLevelSnapshot {
            price,
            quantity,
            order_count,
        })
        .collect();

    if descending {
        result.reverse();
    }
    result
}

/// Aggregate same-side resting orders that carry no price — the complement
/// of [`build_levels`], so every resting order is represented somewhere in
/// the snapshot.
pub fn pending_market(orders: &[Order]) -> MarketLevelSnapshot {
    orders.iter().filter(|o| o.price.is_none()).fold(MarketLevelSnapshot::default(), |mut acc, o| {
        acc.quantity += o.quantity;
        acc.order_count += 1;
        acc
    })
}
