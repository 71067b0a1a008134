//! Metrics module: Prometheus scrape endpoint and request instrumentation

pub mod handlers;
pub mod middleware;

pub use handlers::*;
pub use middleware::http_metrics_middleware;
