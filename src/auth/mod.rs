//! LinkedIn OAuth authentication
//!
//! Handles:
//! - LinkedIn OAuth flow (via a pluggable strategy)
//! - Session management
//! - Session extraction for handlers

mod middleware;
mod oauth;
pub mod session;
pub mod strategy;

pub use middleware::MaybeUser;
pub use oauth::auth_router;
pub use session::{SESSION_COOKIE, Session, create_session_token, verify_session_token};
pub use strategy::{AccessToken, AuthError, AuthStrategy, CallbackParams, LinkedInStrategy};
