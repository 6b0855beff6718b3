//! Observability: tracing setup and request metrics.
//!
//! Logging is the per-exchange access log (method, URL, status, message)
//! emitted by the round-trip adapter, plus structured events everywhere else.
//! Metrics are cheap counters/histograms behind the `metrics` facade; the
//! Prometheus exporter only starts when a listen address is configured.

pub mod logging;
pub mod metrics;
