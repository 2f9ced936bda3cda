//! Metrics pipeline (spec.md S4.3, S4.4): a windowed event collector feeding
//! on-demand aggregates/percentiles, an analyzer turning snapshots into
//! bottleneck reports, a lifecycle service, and an ambient Prometheus
//! exporter for dashboards. Two coexisting subsystems, both fed from the
//! same order/trade call sites.

pub mod analyzer;
pub mod collector;
pub mod prometheus;
pub mod service;
pub mod types;

pub use analyzer::{PerformanceAnalysis, PerformanceAnalyzer};
pub use collector::{MetricsCollector, MetricsSnapshot};
pub use service::MetricsService;
pub use types::{OrderEvent, TradeEvent};
