//! Pure matching logic (spec.md S4.1, S2 "Matcher ~8%").
//!
//! Given an incoming order and a price-time-sorted slice of resting
//! candidates, produces the ordered sequence of matches. Never touches a
//! repository or a lock — the engine is solely responsible for wiring this
//! into the critical section.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Order, OrderSide, OrderType};

use super::types::Match;

/// True when `resting` can trade against `incoming` under spec.md S4.1's
/// tradability rule: either side is a market order, or the incoming limit
/// crosses the resting price.
pub fn is_tradable(incoming: &Order, resting: &Order) -> bool {
    if incoming.order_type == OrderType::Market || resting.order_type == OrderType::Market {
        return true;
    }
    let (Some(incoming_price), Some(resting_price)) = (incoming.price, resting.price) else {
        return true;
    };
    match incoming.side {
        OrderSide::Buy => incoming_price >= resting_price,
        OrderSide::Sell => incoming_price <= resting_price,
    }
}

/// Trade price: the resting order's price if it is a limit order, else the
/// incoming order's price if it is a limit order, else zero (the degenerate
/// market-against-market case, not expected in practice).
pub fn match_price(incoming: &Order, resting: &Order) -> Decimal {
    if resting.order_type == OrderType::Limit {
        resting.price.unwrap_or(Decimal::ZERO)
    } else if incoming.order_type == OrderType::Limit {
        incoming.price.unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}

/// Sort resting candidates by price-time priority for the given incoming
/// side: best price for the incoming side first, ties broken by earliest
/// timestamp. Candidates without a price (market orders) sort first, since
/// any limit crosses a market order.
pub fn sort_candidates(incoming_side: OrderSide, candidates: &mut [Order]) {
    candidates.sort_by(|a, b| {
        let price_cmp = match (a.price, b.price) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(pa), Some(pb)) => match incoming_side {
                // incoming buy wants lowest ask first
                OrderSide::Buy => pa.cmp(&pb),
                // incoming sell wants highest bid first
                OrderSide::Sell => pb.cmp(&pa),
            },
        };
        price_cmp.then_with(|| a.timestamp.cmp(&b.timestamp))
    });
}

/// Outcome of a single matching pass: the ordered matches produced, the
/// incoming order's remaining quantity after the pass, and the post-match
/// remaining quantity for every resting order touched (zero means fully
/// filled and due for deletion).
pub struct MatchOutcome {
    pub matches: Vec<Match>,
    pub incoming_remaining: Decimal,
    pub resting_remaining: HashMap<Uuid, Decimal>,
}

/// Walk `sorted_candidates` in order, consuming the incoming order's
/// quantity against each tradable candidate until either is exhausted.
/// `sorted_candidates` must already be ordered by [`sort_candidates`].
pub fn generate_matches(incoming: &Order, sorted_candidates: &[Order]) -> MatchOutcome {
    let mut remaining = incoming.quantity;
    let mut matches = Vec::new();
    let mut resting_remaining = HashMap::new();

    for resting in sorted_candidates {
        if remaining <= Decimal::ZERO {
            break;
        }
        if !is_tradable(incoming, resting) {
            continue;
        }

        let resting_qty = resting_remaining
            .get(&resting.id)
            .copied()
            .unwrap_or(resting.quantity);
        if resting_qty <= Decimal::ZERO {
            continue;
        }

        let trade_qty = remaining.min(resting_qty);
        let price = match_price(incoming, resting);

        let (buy_order_id, sell_order_id) = match incoming.side {
            OrderSide::Buy => (incoming.id, resting.id),
            OrderSide::Sell => (resting.id, incoming.id),
        };

        matches.push(Match {
            buy_order_id,
            sell_order_id,
            symbol: incoming.symbol.clone(),
            quantity: trade_qty,
            price,
        });

        remaining -= trade_qty;
        resting_remaining.insert(resting.id, resting_qty - trade_qty);
    }

    MatchOutcome {
        matches,
        incoming_remaining: remaining,
        resting_remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn limit_order(side: OrderSide, qty: Decimal, price: Decimal, timestamp: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            symbol: "AAPL".to_string(),
            side,
            order_type: OrderType::Limit,
            quantity: qty,
            original_quantity: qty,
            price: Some(price),
            timestamp,
        }
    }

    #[test]
    fn simple_match_s1() {
        let sell1 = limit_order(OrderSide::Sell, dec!(100), dec!(150), 1);
        let buy1 = limit_order(OrderSide::Buy, dec!(80), dec!(150), 2);
        let mut candidates = vec![sell1.clone()];
        sort_candidates(buy1.side, &mut candidates);
        let outcome = generate_matches(&buy1, &candidates);
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].quantity, dec!(80));
        assert_eq!(outcome.matches[0].price, dec!(150));
        assert_eq!(outcome.incoming_remaining, dec!(0));
        assert_eq!(outcome.resting_remaining[&sell1.id], dec!(20));
    }

    #[test]
    fn price_time_priority_s3() {
        let sell1 = limit_order(OrderSide::Sell, dec!(50), dec!(150), 1);
        let sell2 = limit_order(OrderSide::Sell, dec!(30), dec!(150), 2);
        let sell3 = limit_order(OrderSide::Sell, dec!(40), dec!(149), 2);
        let buy = limit_order(OrderSide::Buy, dec!(100), dec!(151), 3);

        let mut candidates = vec![sell1.clone(), sell2.clone(), sell3.clone()];
        sort_candidates(buy.side, &mut candidates);
        let outcome = generate_matches(&buy, &candidates);

        assert_eq!(outcome.matches.len(), 3);
        assert_eq!(outcome.matches[0].price, dec!(149));
        assert_eq!(outcome.matches[0].quantity, dec!(40));
        assert_eq!(outcome.matches[1].price, dec!(150));
        assert_eq!(outcome.matches[1].quantity, dec!(50));
        assert_eq!(outcome.matches[2].price, dec!(150));
        assert_eq!(outcome.matches[2].quantity, dec!(10));
        assert_eq!(outcome.incoming_remaining, dec!(0));
        assert_eq!(outcome.resting_remaining[&sell2.id], dec!(20));
    }

    #[test]
    fn untradable_prices_produce_no_match() {
        let sell1 = limit_order(OrderSide::Sell, dec!(50), dec!(151), 1);
        let buy = limit_order(OrderSide::Buy, dec!(50), dec!(150), 2);
        let mut candidates = vec![sell1];
        sort_candidates(buy.side, &mut candidates);
        let outcome = generate_matches(&buy, &candidates);
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.incoming_remaining, dec!(50));
    }
}
