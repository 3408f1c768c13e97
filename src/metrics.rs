//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Match lifecycle
    pub static ref MATCHES_CREATED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("matchboard_matches_created_total", "Total number of matches created"),
        &["category"]
    ).expect("metric can be created");
    pub static ref MATCHES_DELETED_TOTAL: IntCounter = IntCounter::new(
        "matchboard_matches_deleted_total",
        "Total number of matches deleted"
    ).expect("metric can be created");

    // Authentication
    pub static ref LOGINS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("matchboard_logins_total", "Total number of OAuth login attempts"),
        &["status"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("matchboard_errors_total", "Total number of error responses"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
///
/// Safe to call more than once; later registrations are ignored.
pub fn init_metrics() {
    let collectors: [(&str, Box<dyn prometheus::core::Collector>); 4] = [
        (
            "MATCHES_CREATED_TOTAL",
            Box::new(MATCHES_CREATED_TOTAL.clone()),
        ),
        (
            "MATCHES_DELETED_TOTAL",
            Box::new(MATCHES_DELETED_TOTAL.clone()),
        ),
        ("LOGINS_TOTAL", Box::new(LOGINS_TOTAL.clone())),
        ("ERRORS_TOTAL", Box::new(ERRORS_TOTAL.clone())),
    ];

    for (name, collector) in collectors {
        if let Err(error) = REGISTRY.register(collector) {
            tracing::debug!(metric = name, %error, "Metric already registered");
        }
    }

    tracing::info!("Metrics registry initialized");
}
