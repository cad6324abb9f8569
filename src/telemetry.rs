//! Telemetry utilities for decision timing and message correlation.

use std::time::Instant;

/// Guard for timing a pipeline evaluation.
///
/// Records decision latency when dropped.
pub struct DecisionTimer {
    start: Instant,
}

impl DecisionTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for DecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DecisionTimer {
    fn drop(&mut self) {
        crate::metrics::record_decision_latency(self.start.elapsed().as_secs_f64());
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Span for one inbound message, from gating through its replies.
    pub fn inbound(platform: &str, channel: &str, user: &str) -> Span {
        info_span!("inbound", platform = %platform, channel = %channel, user = %user)
    }

    /// Span for an administrative command.
    pub fn admin_command(name: &str, target: Option<&str>) -> Span {
        if let Some(target) = target {
            info_span!("admin_command", name = %name, target = %target)
        } else {
            info_span!("admin_command", name = %name)
        }
    }
}
