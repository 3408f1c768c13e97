//! API layer
//!
//! HTTP handlers for:
//! - Match board API
//! - Metrics (Prometheus)
//!
//! Extractor rejections are reported through `AppError`.

mod extract;
mod matches;
mod metrics;

pub use matches::matches_router;
pub use metrics::metrics_router;
