use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Order, OrderSide, Trade};

/// A recorded order submission, annotated with the latency observed placing
/// it (spec.md S3: "OrderEvent ... references to the above + observed
/// latency + event timestamp").
#[derive(Debug, Clone)]
pub struct OrderEvent {
    pub order_id: Uuid,
    pub symbol: String,
    pub side: OrderSide,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl OrderEvent {
    pub fn new(order: &Order, latency_ms: f64) -> Self {
        Self {
            order_id: order.id,
            symbol: order.symbol.clone(),
            side: order.side,
            latency_ms,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// A recorded trade execution, annotated with the latency observed executing
/// it.
#[derive(Debug, Clone)]
pub struct TradeEvent {
    pub trade_id: Uuid,
    pub symbol: String,
    pub price: Decimal,
    pub quantity: Decimal,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl TradeEvent {
    pub fn from_trade(trade: &Trade) -> Self {
        Self {
            trade_id: trade.id,
            symbol: trade.symbol.clone(),
            price: trade.price,
            quantity: trade.quantity,
            latency_ms: 0.0,
            timestamp: trade.timestamp,
        }
    }

    pub fn with_latency(trade: &Trade, latency_ms: f64) -> Self {
        Self {
            latency_ms,
            ..Self::from_trade(trade)
        }
    }
}
