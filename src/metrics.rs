//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::{IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("linkedin_profile_http_requests_total", "Total number of HTTP requests"),
        &["method", "endpoint"]
    ).expect("metric can be created");

    // Sign-in Metrics
    pub static ref AUTH_ATTEMPTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("linkedin_profile_auth_attempts_total", "Total number of LinkedIn sign-in callbacks"),
        &["outcome"]
    ).expect("metric can be created");

    // Provider API Metrics
    pub static ref PROFILE_FETCHES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("linkedin_profile_profile_fetches_total", "Total number of profile API calls"),
        &["status"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("linkedin_profile_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

static INIT: Once = Once::new();

/// Initialize metrics registry.
///
/// Safe to call more than once; only the first call registers.
pub fn init_metrics() {
    INIT.call_once(|| {
        REGISTRY
            .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
            .expect("HTTP_REQUESTS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(AUTH_ATTEMPTS_TOTAL.clone()))
            .expect("AUTH_ATTEMPTS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(PROFILE_FETCHES_TOTAL.clone()))
            .expect("PROFILE_FETCHES_TOTAL can be registered");
        REGISTRY
            .register(Box::new(ERRORS_TOTAL.clone()))
            .expect("ERRORS_TOTAL can be registered");

        tracing::info!("Metrics registry initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_metrics_is_idempotent() {
        init_metrics();
        init_metrics();

        AUTH_ATTEMPTS_TOTAL.with_label_values(&["success"]).inc();
        let families = REGISTRY.gather();
        assert!(
            families
                .iter()
                .any(|family| family.get_name() == "linkedin_profile_auth_attempts_total")
        );
    }
}
