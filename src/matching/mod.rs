//! Price-time-priority matching engine (spec.md S4.1).
//!
//! Generalizes the teacher's `services::matching::orderbook::Orderbook`
//! (a `DashMap`-indexed, `RwLock<BTreeMap>`-backed book with an embedded
//! `match_order` loop) into three seams so metrics/chaos behavior can be
//! composed around the core without touching it: a pure `matcher`, a
//! swappable `executor`, and an `engine` that owns the repositories and the
//! engine-wide lock.

pub mod book;
pub mod engine;
pub mod executor;
pub mod matcher;
pub mod types;

pub use book::OrderBookSnapshot;
pub use engine::{MatchingEngine, MetricsEngine, TradingEngine};
pub use executor::{BasicExecutor, MetricsDecoratedExecutor, TradeExecutor};
pub use types::Match;
