pub mod server;

pub use server::{run_metrics_server, MetricsServerConfig};

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

/// Scanner progress, exported for Prometheus.
///
/// Every per-task series carries a `task` label (`tailing-1`, `range-3`, ...).
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    last_processed_slot: IntGaugeVec,
    blocks_persisted: IntCounterVec,
    fetch_failures: IntCounterVec,
    skipped_slots: IntCounterVec,
    chain_head_slot: IntGauge,
    block_processing_time: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let last_processed_slot = IntGaugeVec::new(
            Opts::new("scanner_last_processed_slot", "Last slot durably processed by a scan task"),
            &["task"],
        )?;
        registry.register(Box::new(last_processed_slot.clone()))?;

        let blocks_persisted = IntCounterVec::new(
            Opts::new("scanner_blocks_persisted_total", "Blocks written to storage"),
            &["task"],
        )?;
        registry.register(Box::new(blocks_persisted.clone()))?;

        let fetch_failures = IntCounterVec::new(
            Opts::new("scanner_fetch_failures_total", "Failed block fetches"),
            &["task"],
        )?;
        registry.register(Box::new(fetch_failures.clone()))?;

        let skipped_slots = IntCounterVec::new(
            Opts::new(
                "scanner_skipped_slots_total",
                "Slots passed over without a stored block",
            ),
            &["task"],
        )?;
        registry.register(Box::new(skipped_slots.clone()))?;

        let chain_head_slot = IntGauge::with_opts(Opts::new(
            "scanner_chain_head_slot",
            "Latest head slot reported by the node",
        ))?;
        registry.register(Box::new(chain_head_slot.clone()))?;

        let block_processing_time = Histogram::with_opts(
            HistogramOpts::new(
                "scanner_block_processing_time_seconds",
                "Time taken to fetch, normalize and store one block",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 1.0, 5.0]),
        )?;
        registry.register(Box::new(block_processing_time.clone()))?;

        Ok(Self {
            registry,
            last_processed_slot,
            blocks_persisted,
            fetch_failures,
            skipped_slots,
            chain_head_slot,
            block_processing_time,
        })
    }

    /// Text exposition of every registered series.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::<u8>::new();
        TextEncoder::new().encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }

    pub fn set_last_processed_slot(&self, task: &str, slot: u64) {
        self.last_processed_slot
            .with_label_values(&[task])
            .set(slot as i64);
    }

    pub fn inc_blocks_persisted(&self, task: &str) {
        self.blocks_persisted.with_label_values(&[task]).inc();
    }

    pub fn inc_fetch_failures(&self, task: &str) {
        self.fetch_failures.with_label_values(&[task]).inc();
    }

    pub fn inc_skipped_slots(&self, task: &str) {
        self.skipped_slots.with_label_values(&[task]).inc();
    }

    pub fn set_chain_head_slot(&self, slot: u64) {
        self.chain_head_slot.set(slot as i64);
    }

    pub fn observe_block_processing_time(&self, duration: Duration) {
        self.block_processing_time.observe(duration.as_secs_f64());
    }
}

pub type SharedMetrics = Arc<Metrics>;
