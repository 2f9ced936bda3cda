//! Domain value types shared across the matching engine, repositories, and API layer.

mod order;
mod trade;

pub use order::{NewOrder, Order, OrderSide, OrderStatus, OrderType};
pub use trade::Trade;
