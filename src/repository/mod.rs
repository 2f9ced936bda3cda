//! In-memory order/trade repositories (spec.md S4.2).
//!
//! Mirrors the teacher's `order_index: DashMap` keyed lookup from
//! `services::matching::orderbook`, generalized to a standalone repository
//! pair guarded by `parking_lot::RwLock` rather than embedded in the book.

mod order_repository;
mod trade_repository;

pub use order_repository::OrderRepository;
pub use trade_repository::TradeRepository;
