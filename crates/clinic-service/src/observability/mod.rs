//! Observability for the clinic service (metrics).

pub mod metrics;

pub use metrics::init_metrics_recorder;
