//! Prometheus metrics for latency tracking and monitoring.
//!
//! This module provides metrics for:
//! - Inbound request latency
//! - Rotation outcomes
//! - Statistics service call latency and failures
//! - Token signing latency

use std::sync::OnceLock;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{debug, warn};

use crate::error::MatrixErrorKind;

// === Metric Name Constants ===

/// Inbound HTTP request latency metric name.
pub const METRIC_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Statistics service call latency metric name.
pub const METRIC_STATS_CALL_LATENCY: &str = "stats_call_latency_ms";
/// Signing latency metric name.
pub const METRIC_SIGNING_LATENCY: &str = "signing_latency_ms";
/// Successful rotations counter metric name.
pub const METRIC_ROTATIONS: &str = "rotations_total";
/// Rejected rotations counter metric name.
pub const METRIC_ROTATIONS_REJECTED: &str = "rotations_rejected_total";
/// Failed statistics calls counter metric name.
pub const METRIC_STATS_FAILURES: &str = "stats_failures_total";

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder, returning its handle.
///
/// The first call installs the global recorder; later calls return the same handle.
pub fn init_prometheus() -> &'static PrometheusHandle {
    PROMETHEUS_HANDLE.get_or_init(|| {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        if metrics::set_global_recorder(recorder).is_err() {
            warn!("A metrics recorder was already installed; Prometheus output will be empty");
        }
        handle
    })
}

/// Render all metrics in the Prometheus text format.
pub fn render() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_else(|| "# Prometheus metrics not initialized\n".to_string())
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_REQUEST_LATENCY,
        "Inbound HTTP request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_STATS_CALL_LATENCY,
        "Statistics service call latency in milliseconds"
    );
    describe_histogram!(
        METRIC_SIGNING_LATENCY,
        "Bearer token signing latency in milliseconds"
    );

    describe_counter!(METRIC_ROTATIONS, "Total number of successful rotations");
    describe_counter!(
        METRIC_ROTATIONS_REJECTED,
        "Total number of matrices rejected by validation"
    );
    describe_counter!(
        METRIC_STATS_FAILURES,
        "Total number of failed statistics service calls"
    );

    debug!("Metrics initialized");
}

/// Record inbound request latency.
pub fn record_request_latency(start: Instant, endpoint: &'static str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_REQUEST_LATENCY, "endpoint" => endpoint).record(latency_ms);
}

/// Record statistics service call latency.
pub fn record_stats_call_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_STATS_CALL_LATENCY).record(latency_ms);
}

/// Increment successful rotations counter.
pub fn inc_rotations() {
    counter!(METRIC_ROTATIONS).increment(1);
}

/// Increment rejected rotations counter.
pub fn inc_rotations_rejected(kind: MatrixErrorKind) {
    let kind: &'static str = kind.into();
    counter!(METRIC_ROTATIONS_REJECTED, "kind" => kind).increment(1);
}

/// Increment failed statistics calls counter.
pub fn inc_stats_failures(reason: &'static str) {
    counter!(METRIC_STATS_FAILURES, "reason" => reason).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

/// Create a latency timer for signing operations.
pub fn timer_signing() -> LatencyTimer {
    LatencyTimer::new(METRIC_SIGNING_LATENCY)
}
