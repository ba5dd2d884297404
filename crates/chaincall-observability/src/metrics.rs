//! ChainCall metrics definitions.
//!
//! All metrics use OpenTelemetry conventions. Without an installed meter
//! provider the global meter is a no-op, so recording is always safe.

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Central metrics handle for the call orchestrator.
#[derive(Clone)]
pub struct CallMetrics {
    pub invocations: Counter<u64>,
    pub invocation_failures: Counter<u64>,
    pub events_decoded: Counter<u64>,
    pub logs_skipped: Counter<u64>,
    pub call_latency_ms: Histogram<f64>,
}

impl CallMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            invocations: meter
                .u64_counter("chaincall.invocations")
                .with_description("Invocations started, by function and path")
                .init(),
            invocation_failures: meter
                .u64_counter("chaincall.invocation_failures")
                .with_description("Invocations that ended in an error")
                .init(),
            events_decoded: meter
                .u64_counter("chaincall.events_decoded")
                .with_description("Receipt logs decoded against a known event")
                .init(),
            logs_skipped: meter
                .u64_counter("chaincall.logs_skipped")
                .with_description("Receipt logs that matched no known event")
                .init(),
            call_latency_ms: meter
                .f64_histogram("chaincall.call_latency_ms")
                .with_description("Wall time of one invocation in milliseconds")
                .init(),
        }
    }

    /// Instruments on the global meter named `chaincall`.
    pub fn global() -> Self {
        Self::new(&global::meter("chaincall"))
    }

    pub fn record_invocation(&self, function: &str, path: &str) {
        self.invocations.add(
            1,
            &[
                KeyValue::new("function", function.to_string()),
                KeyValue::new("path", path.to_string()),
            ],
        );
    }

    pub fn record_failure(&self, function: &str, error_type: &str) {
        self.invocation_failures.add(
            1,
            &[
                KeyValue::new("function", function.to_string()),
                KeyValue::new("error_type", error_type.to_string()),
            ],
        );
    }

    pub fn record_event(&self, event: &str) {
        self.events_decoded
            .add(1, &[KeyValue::new("event", event.to_string())]);
    }

    pub fn record_skipped(&self, count: u64) {
        if count > 0 {
            self.logs_skipped.add(count, &[]);
        }
    }

    pub fn record_latency(&self, ms: f64, path: &str) {
        self.call_latency_ms
            .record(ms, &[KeyValue::new("path", path.to_string())]);
    }
}

impl std::fmt::Debug for CallMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallMetrics").finish_non_exhaustive()
    }
}
