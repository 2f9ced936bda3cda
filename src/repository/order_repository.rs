use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::ExchangeError;
use crate::models::Order;

/// Keyed store of live orders. One instance is shared across the matching
/// engine and the API layer behind an `Arc`.
///
/// Follows the teacher's `order_index: DashMap<Uuid, OrderEntry>` shape from
/// `services::matching::orderbook::Orderbook`, but uses a single
/// `RwLock<HashMap<..>>` since this store is not sharded per price level.
#[derive(Default)]
pub struct OrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl OrderRepository {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }

    pub fn save(&self, order: Order) -> Result<Order, ExchangeError> {
        if order.symbol.trim().is_empty() {
            return Err(ExchangeError::Validation("symbol must not be empty".into()));
        }
        self.orders.write().insert(order.id, order.clone());
        Ok(order)
    }

    pub fn get_by_id(&self, id: Uuid) -> Result<Order, ExchangeError> {
        self.orders
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| ExchangeError::NotFound(format!("order {id} not found")))
    }

    pub fn get_by_symbol(&self, symbol: &str) -> Vec<Order> {
        self.orders
            .read()
            .values()
            .filter(|o| o.symbol == symbol)
            .cloned()
            .collect()
    }

    pub fn get_all(&self) -> Vec<Order> {
        self.orders.read().values().cloned().collect()
    }

    pub fn delete(&self, id: Uuid) -> Result<(), ExchangeError> {
        self.orders
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ExchangeError::NotFound(format!("order {id} not found")))
    }

    pub fn update(&self, order: Order) -> Result<Order, ExchangeError> {
        let mut guard = self.orders.write();
        if !guard.contains_key(&order.id) {
            return Err(ExchangeError::NotFound(format!(
                "order {} not found",
                order.id
            )));
        }
        guard.insert(order.id, order.clone());
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderSide, OrderType};
    use rust_decimal_macros::dec;

    fn sample_order(symbol: &str) -> Order {
        Order {
            id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            side: OrderSide::Buy,
            order_type: OrderType::Limit,
            quantity: dec!(10),
            original_quantity: dec!(10),
            price: Some(dec!(100)),
            timestamp: 0,
        }
    }

    #[test]
    fn save_and_get_round_trips() {
        let repo = OrderRepository::new();
        let order = sample_order("AAPL");
        let id = order.id;
        repo.save(order).unwrap();
        let fetched = repo.get_by_id(id).unwrap();
        assert_eq!(fetched.symbol, "AAPL");
    }

    #[test]
    fn get_by_id_missing_is_not_found() {
        let repo = OrderRepository::new();
        let err = repo.get_by_id(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ExchangeError::NotFound(_)));
    }

    #[test]
    fn get_by_symbol_filters() {
        let repo = OrderRepository::new();
        repo.save(sample_order("AAPL")).unwrap();
        repo.save(sample_order("MSFT")).unwrap();
        assert_eq!(repo.get_by_symbol("AAPL").len(), 1);
    }

    #[test]
    fn save_rejects_empty_symbol() {
        let repo = OrderRepository::new();
        let err = repo.save(sample_order("")).unwrap_err();
        assert!(matches!(err, ExchangeError::Validation(_)));
    }

    #[test]
    fn delete_missing_is_not_found() {
        let repo = OrderRepository::new();
        let err = repo.delete(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ExchangeError::NotFound(_)));
    }
}
