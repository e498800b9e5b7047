//! API layer
//!
//! HTTP handlers for:
//! - Profile page
//! - Metrics (Prometheus)

pub mod metrics;
mod profile;
pub mod views;

pub use metrics::{metrics_router, track_requests};
pub use profile::profile_router;
