//! # chaincall-observability
//!
//! OpenTelemetry-based observability for ChainCall.
//!
//! ## Built-in metrics
//! - `chaincall.invocations`        : counter, tagged with function + path
//! - `chaincall.invocation_failures`: counter, tagged with function + error_type
//! - `chaincall.events_decoded`     : counter, tagged with event
//! - `chaincall.logs_skipped`       : counter
//! - `chaincall.call_latency_ms`    : histogram, tagged with path
//!
//! ## Structured logging
//! Text or JSON logs on stderr, with levels configurable per component.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::CallMetrics;
pub use tracing_setup::{init_tracing, LogConfig};
