//! Metrics service lifecycle (spec.md S4.4): owns the collector and
//! analyzer, exposes start/stop/health. Periodically triggers window
//! cleanup via a background task, following the teacher's
//! `tokio::spawn`-a-worker-against-a-broadcast-channel idiom from
//! `main.rs`, adapted to a plain interval tick since there is no channel
//! to drain here.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{info, warn};

use super::analyzer::{PerformanceAnalysis, PerformanceAnalyzer};
use super::collector::{MetricsCollector, MetricsSnapshot};

pub struct MetricsService {
    collector: Arc<MetricsCollector>,
    cleanup_interval: Duration,
    cleanup_task: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl MetricsService {
    pub fn new(collector: Arc<MetricsCollector>, cleanup_interval: Duration) -> Self {
        Self {
            collector,
            cleanup_interval,
            cleanup_task: parking_lot::Mutex::new(None),
        }
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    /// Start accepting events and spawn the periodic window-cleanup task.
    pub fn start(&self) {
        self.collector.set_healthy(true);
        let collector = self.collector.clone();
        let tick = self.cleanup_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = interval(tick);
            loop {
                ticker.tick().await;
                if !collector.is_healthy() {
                    break;
                }
                // a read alone is enough to trigger the collector's lazy prune
                let _ = collector.get_current_metrics();
            }
        });
        *self.cleanup_task.lock() = Some(handle);
        info!("metrics service started");
    }

    /// Close the ingestion gate; subsequent `Record*` calls become silent
    /// no-ops (spec.md S5).
    pub fn stop(&self) {
        self.collector.set_healthy(false);
        if let Some(handle) = self.cleanup_task.lock().take() {
            handle.abort();
        }
        warn!("metrics service stopped");
    }

    pub fn is_healthy(&self) -> bool {
        self.collector.is_healthy()
    }

    pub fn current_snapshot(&self) -> MetricsSnapshot {
        self.collector.get_current_metrics()
    }

    pub fn analyze(&self) -> PerformanceAnalysis {
        PerformanceAnalyzer::analyze(&self.current_snapshot())
    }
}
