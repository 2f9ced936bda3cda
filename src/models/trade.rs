use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An immutable trade record. Created once during execution and never modified
/// (spec.md S3: "Trade ... immutable once created").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub buy_order_id: Uuid,
    pub sell_order_id: Uuid,
    pub symbol: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub timestamp: i64,
}
