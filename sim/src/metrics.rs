//! # Prometheus Metrics
//!
//! Counters for a simulation run, rendered in the Prometheus text
//! exposition format when `--metrics` is passed.
//!
//! All metrics live in a dedicated [`prometheus::Registry`] with the
//! `wabisabi_sim` prefix, so nothing leaks into the default global registry.

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

use wabisabi_pool::PoolStats;

/// Metric handles for a simulation run.
#[derive(Clone)]
pub struct SimMetrics {
    registry: Registry,
    /// Rounds that ran to completion.
    pub rounds_completed_total: IntCounter,
    /// Rounds abandoned after an error.
    pub rounds_failed_total: IntCounter,
    /// Padding attempts retried after the pool ran dry.
    pub exhaustion_retries_total: IntCounter,
    /// Zero-value credentials left in the pool at the end of the run.
    pub pool_available: IntGauge,
    /// Zero-value credentials registered over the run.
    pub pool_registered: IntGauge,
    /// Zero-value credentials consumed as filler over the run.
    pub pool_consumed: IntGauge,
}

impl SimMetrics {
    /// Creates and registers all metrics.
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("wabisabi_sim".into()), None)?;

        let rounds_completed_total =
            IntCounter::new("rounds_completed_total", "Rounds that ran to completion")?;
        registry.register(Box::new(rounds_completed_total.clone()))?;

        let rounds_failed_total =
            IntCounter::new("rounds_failed_total", "Rounds abandoned after an error")?;
        registry.register(Box::new(rounds_failed_total.clone()))?;

        let exhaustion_retries_total = IntCounter::new(
            "exhaustion_retries_total",
            "Padding attempts retried after the zero credential pool ran dry",
        )?;
        registry.register(Box::new(exhaustion_retries_total.clone()))?;

        let pool_available = IntGauge::new(
            "pool_available",
            "Zero-value credentials queued at the end of the run",
        )?;
        registry.register(Box::new(pool_available.clone()))?;

        let pool_registered = IntGauge::new(
            "pool_registered",
            "Zero-value credentials registered over the run",
        )?;
        registry.register(Box::new(pool_registered.clone()))?;

        let pool_consumed = IntGauge::new(
            "pool_consumed",
            "Zero-value credentials consumed as filler over the run",
        )?;
        registry.register(Box::new(pool_consumed.clone()))?;

        Ok(Self {
            registry,
            rounds_completed_total,
            rounds_failed_total,
            exhaustion_retries_total,
            pool_available,
            pool_registered,
            pool_consumed,
        })
    }

    /// Copies a pool snapshot into the gauges.
    pub fn observe_pool(&self, stats: &PoolStats) {
        self.pool_available.set(stats.available as i64);
        self.pool_registered.set(stats.registered_total as i64);
        self.pool_consumed.set(stats.consumed_total as i64);
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_prefixed_metrics() {
        let metrics = SimMetrics::new().unwrap();
        metrics.rounds_completed_total.inc();
        metrics.observe_pool(&PoolStats {
            available: 3,
            registered_total: 10,
            consumed_total: 7,
            exhausted_total: 0,
        });

        let text = metrics.encode().unwrap();
        assert!(text.contains("wabisabi_sim_rounds_completed_total 1"));
        assert!(text.contains("wabisabi_sim_pool_available 3"));
        assert!(text.contains("wabisabi_sim_pool_consumed 7"));
    }
}
