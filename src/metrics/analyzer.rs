//! Metrics analyzer (spec.md S4.4): a pure function from a snapshot to a
//! bottleneck/recommendation report. Deterministic in its input.

use serde::Serialize;

use super::collector::MetricsSnapshot;

#[derive(Debug, Clone, Serialize)]
pub struct Bottleneck {
    pub name: String,
    pub severity: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct PerformanceAnalysis {
    pub bottlenecks: Vec<Bottleneck>,
    pub recommendations: Vec<String>,
}

const HIGH_LATENCY_MS: f64 = 50.0;
const HIGH_P99_MS: f64 = 200.0;
const LOW_THROUGHPUT_ORDERS_PER_SEC: f64 = 1.0;

pub struct PerformanceAnalyzer;

impl PerformanceAnalyzer {
    pub fn analyze(snapshot: &MetricsSnapshot) -> PerformanceAnalysis {
        let mut bottlenecks = Vec::new();
        let mut recommendations = Vec::new();

        if snapshot.avg_latency_ms > HIGH_LATENCY_MS {
            let severity = (snapshot.avg_latency_ms / HIGH_LATENCY_MS / 4.0).min(1.0);
            bottlenecks.push(Bottleneck {
                name: "average_latency".to_string(),
                severity,
                description: format!(
                    "average latency {:.1}ms exceeds {HIGH_LATENCY_MS}ms baseline",
                    snapshot.avg_latency_ms
                ),
            });
            recommendations.push("investigate contention on the engine-wide lock".to_string());
        }

        if snapshot.p99_latency_ms > HIGH_P99_MS {
            let severity = (snapshot.p99_latency_ms / HIGH_P99_MS / 4.0).min(1.0);
            bottlenecks.push(Bottleneck {
                name: "p99_latency".to_string(),
                severity,
                description: format!(
                    "p99 latency {:.1}ms exceeds {HIGH_P99_MS}ms baseline",
                    snapshot.p99_latency_ms
                ),
            });
            recommendations.push("check for tail-latency outliers from chaos injection".to_string());
        }

        if snapshot.order_count > 0 && snapshot.orders_per_sec < LOW_THROUGHPUT_ORDERS_PER_SEC {
            bottlenecks.push(Bottleneck {
                name: "low_throughput".to_string(),
                severity: 0.3,
                description: format!(
                    "orders_per_sec {:.2} below {LOW_THROUGHPUT_ORDERS_PER_SEC} floor",
                    snapshot.orders_per_sec
                ),
            });
            recommendations.push("increase simulator order rate or widen the metrics window".to_string());
        }

        if bottlenecks.is_empty() {
            recommendations.push("no bottlenecks detected in the current window".to_string());
        }

        PerformanceAnalysis {
            bottlenecks,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_snapshot_has_no_bottlenecks() {
        let snapshot = MetricsSnapshot {
            avg_latency_ms: 5.0,
            p99_latency_ms: 10.0,
            order_count: 100,
            orders_per_sec: 10.0,
            ..Default::default()
        };
        let analysis = PerformanceAnalyzer::analyze(&snapshot);
        assert!(analysis.bottlenecks.is_empty());
    }

    #[test]
    fn high_latency_flagged() {
        let snapshot = MetricsSnapshot {
            avg_latency_ms: 500.0,
            order_count: 10,
            orders_per_sec: 5.0,
            ..Default::default()
        };
        let analysis = PerformanceAnalyzer::analyze(&snapshot);
        assert!(analysis.bottlenecks.iter().any(|b| b.name == "average_latency"));
    }
}
