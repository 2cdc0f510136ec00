use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Request counters reported on `/health`
#[derive(Debug, Default)]
pub struct Metrics {
    queries_received: AtomicU64,
    queries_failed: AtomicU64,
    hashes_submitted: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query_received(&self) {
        self.queries_received.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "queries_received", "Metric incremented");
    }

    pub fn query_failed(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "queries_failed", "Metric incremented");
    }

    pub fn hashes_submitted(&self, count: usize) {
        self.hashes_submitted
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_received: self.queries_received.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            hashes_submitted: self.hashes_submitted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queries_received: u64,
    pub queries_failed: u64,
    pub hashes_submitted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = Metrics::new();
        metrics.query_received();
        metrics.query_received();
        metrics.query_failed();
        metrics.hashes_submitted(3);
        metrics.hashes_submitted(2);

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                queries_received: 2,
                queries_failed: 1,
                hashes_submitted: 5,
            }
        );
    }
}
