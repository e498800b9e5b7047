//! linkedin-profile - Sign in with LinkedIn and render the member profile
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Routes (Axum)                           │
//! │  - GET /linkedin, /linkedin/callback, /login, POST /logout  │
//! │  - GET / (profile page)                                     │
//! │  - GET /health, /metrics                                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Collaborators                            │
//! │  - AuthStrategy (OAuth handshake with LinkedIn)             │
//! │  - Signed session cookie (holds the bearer token)           │
//! │  - ProfileClient (one outbound GET per page view)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: profile page, views and metrics endpoint
//! - `auth`: LinkedIn OAuth routes, strategy and session
//! - `provider`: LinkedIn REST API client
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod provider;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// Immutable after startup; cloned for each request.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Delegated sign-in strategy
    pub strategy: Arc<dyn auth::AuthStrategy>,

    /// LinkedIn profile API client
    pub profile_client: Arc<provider::ProfileClient>,
}

impl AppState {
    /// Initialize application state with the LinkedIn strategy
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built or an endpoint
    /// URL is invalid
    pub fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        let http_client = build_http_client(&config.linkedin)?;
        let strategy = auth::LinkedInStrategy::new(&config, http_client.clone())?;
        Self::from_parts(config, http_client, Arc::new(strategy))
    }

    /// Initialize application state with a custom sign-in strategy
    pub fn with_strategy(
        config: config::AppConfig,
        strategy: Arc<dyn auth::AuthStrategy>,
    ) -> Result<Self, error::AppError> {
        let http_client = build_http_client(&config.linkedin)?;
        Self::from_parts(config, http_client, strategy)
    }

    fn from_parts(
        config: config::AppConfig,
        http_client: reqwest::Client,
        strategy: Arc<dyn auth::AuthStrategy>,
    ) -> Result<Self, error::AppError> {
        metrics::init_metrics();

        let profile_client = provider::ProfileClient::new(&config.linkedin, http_client)?;
        tracing::info!(
            profile_url = %config.linkedin.profile_url,
            "Application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            strategy,
            profile_client: Arc::new(profile_client),
        })
    }
}

fn build_http_client(linkedin: &config::LinkedInConfig) -> Result<reqwest::Client, error::AppError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("linkedin-profile/", env!("CARGO_PKG_VERSION")));

    if let Some(seconds) = linkedin.request_timeout_seconds {
        builder = builder.timeout(std::time::Duration::from_secs(seconds));
    }

    builder
        .build()
        .map_err(|e| error::AppError::Internal(e.into()))
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{compression::CompressionLayer, trace::TraceLayer};

    let cors_layer = build_cors_layer(&state.config.server);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(auth::auth_router())
        .merge(api::profile_router())
        .merge(api::metrics_router())
        .layer(axum::middleware::from_fn(api::track_requests))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

fn build_cors_layer(server: &config::ServerConfig) -> tower_http::cors::CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::{Any, CorsLayer};

    if !server.protocol.eq_ignore_ascii_case("https") {
        return CorsLayer::permissive();
    }

    let allowed_origin = server.base_url();
    match HeaderValue::from_str(&allowed_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin([origin])
            .allow_methods(Any)
            .allow_headers(Any),
        Err(error) => {
            tracing::error!(
                %error,
                origin = %allowed_origin,
                "Failed to parse CORS origin from server base URL; denying cross-origin requests"
            );
            CorsLayer::new().allow_methods(Any).allow_headers(Any)
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
