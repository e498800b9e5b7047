//! Identity provider REST API
//!
//! Outbound calls made with the bearer token held in the session.

mod profile;

pub use profile::{ProfileBody, ProfileClient, ProfileResponse};
