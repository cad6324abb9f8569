//! Prometheus metrics collection for blockgate.
//!
//! - `blockgate_decisions_total{verdict,stage}` - Pipeline verdicts by deciding stage
//! - `blockgate_decision_duration_seconds` - Pipeline latency, store reads included
//! - `blockgate_outbound_suppressed_total` - Outbound messages suppressed by the filter
//! - `blockgate_store_errors_total{error}` - Store failures that forced a deny
//! - `blockgate_admin_commands_total{command,outcome}` - Block commands by outcome
//!
//! Recording is a no-op until [`init`] has run, so library users and tests
//! pay nothing for metrics they never scrape.

use crate::gate::Decision;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{Once, OnceLock};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Pipeline verdicts by verdict and stage.
pub static DECISIONS: OnceLock<IntCounterVec> = OnceLock::new();

/// Pipeline latency.
pub static DECISION_LATENCY: OnceLock<Histogram> = OnceLock::new();

/// Outbound messages suppressed.
pub static OUTBOUND_SUPPRESSED: OnceLock<IntCounter> = OnceLock::new();

/// Store errors by error code.
pub static STORE_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Administrative commands by command and outcome.
pub static ADMIN_COMMANDS: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Metrics recorded before this are dropped. Later calls are no-ops.
pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(register_all);
}

fn register_all() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(
                            error = %e,
                            concat!("Failed to register metric ", stringify!($metric))
                        );
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        concat!("Failed to create metric ", stringify!($metric))
                    );
                }
            }
        };
    }

    register!(
        DECISIONS,
        IntCounterVec::new(
            Opts::new("blockgate_decisions_total", "Pipeline verdicts by stage"),
            &["verdict", "stage"],
        )
    );
    register!(
        DECISION_LATENCY,
        Histogram::with_opts(
            HistogramOpts::new("blockgate_decision_duration_seconds", "Decision pipeline latency")
                .buckets(vec![0.00001, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        )
    );
    register!(
        OUTBOUND_SUPPRESSED,
        IntCounter::new(
            "blockgate_outbound_suppressed_total",
            "Outbound messages suppressed"
        )
    );
    register!(
        STORE_ERRORS,
        IntCounterVec::new(
            Opts::new(
                "blockgate_store_errors_total",
                "Block store failures during gating"
            ),
            &["error"],
        )
    );
    register!(
        ADMIN_COMMANDS,
        IntCounterVec::new(
            Opts::new(
                "blockgate_admin_commands_total",
                "Administrative commands by outcome"
            ),
            &["command", "outcome"],
        )
    );
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

/// Record a terminal pipeline verdict.
#[inline]
pub fn record_decision(decision: Decision) {
    if let Some(c) = DECISIONS.get() {
        c.with_label_values(&[decision.verdict.as_str(), decision.stage.as_str()])
            .inc();
    }
}

/// Record pipeline latency.
#[inline]
pub fn record_decision_latency(duration_secs: f64) {
    if let Some(h) = DECISION_LATENCY.get() {
        h.observe(duration_secs);
    }
}

/// Record a suppressed outbound message.
#[inline]
pub fn record_outbound_suppressed() {
    if let Some(c) = OUTBOUND_SUPPRESSED.get() {
        c.inc();
    }
}

/// Record a store failure.
#[inline]
pub fn record_store_error(error: &str) {
    if let Some(c) = STORE_ERRORS.get() {
        c.with_label_values(&[error]).inc();
    }
}

/// Record an administrative command outcome.
#[inline]
pub fn record_admin_command(command: &str, outcome: &str) {
    if let Some(c) = ADMIN_COMMANDS.get() {
        c.with_label_values(&[command, outcome]).inc();
    }
}
