use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "limit"),
            OrderType::Market => write!(f, "market"),
        }
    }
}

/// Status reported back to the caller after `PlaceOrder` (spec.md S6 wire format).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Resting untouched or with a reduced remaining quantity.
    Active,
    /// Matched partially; a smaller order still rests.
    Partial,
    /// Fully matched, no longer in the book.
    Filled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Active => write!(f, "active"),
            OrderStatus::Partial => write!(f, "partial"),
            OrderStatus::Filled => write!(f, "filled"),
        }
    }
}

/// A resting or incoming order. `quantity` always holds the *remaining*
/// amount; `original_quantity` is fixed at submission time and used for
/// conservation checks and status derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub original_quantity: Decimal,
    /// Required for limit orders, ignored (should be `None`) for market orders.
    pub price: Option<Decimal>,
    /// Milliseconds since epoch; assigned by the engine if the caller omits it.
    pub timestamp: i64,
}

impl Order {
    pub fn is_filled(&self) -> bool {
        self.quantity <= Decimal::ZERO
    }
}

/// Caller-supplied order submission. `id` and `timestamp` are optional —
/// the engine assigns fresh values for whichever are missing before the
/// order is persisted (spec.md S4.1, "Identity and timestamp assignment").
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub id: Option<Uuid>,
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub timestamp: Option<i64>,
}
