use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::ExchangeError;
use crate::models::Trade;

/// Append-only trade store. No `delete`: trades are immutable once created
/// (spec.md S3), so the repository surface only offers insertion and lookup.
#[derive(Default)]
pub struct TradeRepository {
    trades: RwLock<HashMap<Uuid, Trade>>,
}

impl TradeRepository {
    pub fn new() -> Self {
        Self {
            trades: RwLock::new(HashMap::new()),
        }
    }

    pub fn save(&self, trade: Trade) -> Result<Trade, ExchangeError> {
        if trade.symbol.trim().is_empty() {
            return Err(ExchangeError::Validation("symbol must not be empty".into()));
        }
        self.trades.write().insert(trade.id, trade.clone());
        Ok(trade)
    }

    pub fn get_by_id(&self, id: Uuid) -> Result<Trade, ExchangeError> {
        self.trades
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| ExchangeError::NotFound(format!("trade {id} not found")))
    }

    pub fn get_by_symbol(&self, symbol: &str) -> Vec<Trade> {
        let mut trades: Vec<Trade> = self
            .trades
            .read()
            .values()
            .filter(|t| t.symbol == symbol)
            .cloned()
            .collect();
        trades.sort_by_key(|t| t.timestamp);
        trades
    }

    pub fn get_all(&self) -> Vec<Trade> {
        self.trades.read().values().cloned().collect()
    }
}
