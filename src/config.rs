//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::net::IpAddr;

/// Default LinkedIn authorization endpoint
pub const DEFAULT_AUTHORIZATION_URL: &str = "https://www.linkedin.com/oauth/v2/authorization";
/// Default LinkedIn token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://www.linkedin.com/oauth/v2/accessToken";
/// Profile resource rendered on the home page
pub const DEFAULT_PROFILE_URL: &str =
    "https://api.linkedin.com/v1/people/~:(id,num-connections,picture-url)";
/// Anti-forgery value sent with every authorization request
pub const DEFAULT_OAUTH_STATE: &str = "SOME STATE";

/// Longest session lifetime accepted (10 years)
pub const MAX_SESSION_MAX_AGE: i64 = 10 * 365 * 24 * 60 * 60;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub linkedin: LinkedInConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8080)
    pub port: u16,
    /// Public domain (e.g., "profile.example.com")
    pub domain: String,
    /// Protocol ("http" or "https")
    pub protocol: String,
}

impl ServerConfig {
    /// Get the base URL for the instance
    ///
    /// # Returns
    /// Full URL like "https://profile.example.com"
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.protocol, self.domain)
    }
}

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Session secret key (32+ bytes)
    pub session_secret: String,
    /// Session max age in seconds (default: 604800 = 7 days)
    pub session_max_age: i64,
}

/// LinkedIn OAuth application and API endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct LinkedInConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Registered redirect URI (default: `<base_url>/linkedin/callback`)
    pub callback_url: Option<String>,
    pub scope: String,
    /// Fixed `state` parameter
    pub state: String,
    pub authorization_url: String,
    pub token_url: String,
    pub profile_url: String,
    /// Outbound request timeout; unset means no timeout
    pub request_timeout_seconds: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl LoggingConfig {
    /// Default `EnvFilter` directives when `RUST_LOG` is unset
    pub fn default_filter(&self) -> String {
        format!("linkedin_profile={},tower_http=debug", self.level)
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (LINKEDIN_PROFILE__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.domain", "localhost:3000")?
            .set_default("server.protocol", "http")?
            .set_default("auth.session_max_age", 604800)?
            .set_default("linkedin.scope", "r_basicprofile")?
            .set_default("linkedin.state", DEFAULT_OAUTH_STATE)?
            .set_default("linkedin.authorization_url", DEFAULT_AUTHORIZATION_URL)?
            .set_default("linkedin.token_url", DEFAULT_TOKEN_URL)?
            .set_default("linkedin.profile_url", DEFAULT_PROFILE_URL)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (LINKEDIN_PROFILE__*)
            .add_source(
                Environment::with_prefix("LINKEDIN_PROFILE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Redirect URI registered with LinkedIn
    pub fn callback_url(&self) -> String {
        self.linkedin
            .callback_url
            .clone()
            .unwrap_or_else(|| format!("{}/linkedin/callback", self.server.base_url()))
    }

    pub fn should_use_secure_cookies(&self) -> bool {
        self.server.protocol.eq_ignore_ascii_case("https")
            || !is_local_server_domain(&self.server.domain)
    }

    pub(crate) fn validate(&self) -> Result<(), crate::error::AppError> {
        const MIN_SESSION_SECRET_BYTES: usize = 32;

        if self.auth.session_secret.as_bytes().len() < MIN_SESSION_SECRET_BYTES {
            return Err(crate::error::AppError::Config(format!(
                "auth.session_secret must be at least {} bytes",
                MIN_SESSION_SECRET_BYTES
            )));
        }

        if self.auth.session_max_age <= 0 {
            return Err(crate::error::AppError::Config(
                "auth.session_max_age must be greater than 0".to_string(),
            ));
        }

        if self.auth.session_max_age > MAX_SESSION_MAX_AGE {
            return Err(crate::error::AppError::Config(format!(
                "auth.session_max_age must be at most {} seconds",
                MAX_SESSION_MAX_AGE
            )));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(crate::error::AppError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }

        if self.linkedin.client_id.trim().is_empty() || self.linkedin.client_secret.trim().is_empty()
        {
            return Err(crate::error::AppError::Config(
                "linkedin.client_id and linkedin.client_secret are required".to_string(),
            ));
        }

        for (key, value) in [
            ("linkedin.authorization_url", self.linkedin.authorization_url.clone()),
            ("linkedin.token_url", self.linkedin.token_url.clone()),
            ("linkedin.profile_url", self.linkedin.profile_url.clone()),
            ("linkedin.callback_url", self.callback_url()),
        ] {
            url::Url::parse(&value).map_err(|e| {
                crate::error::AppError::Config(format!("{key} is not a valid URL: {e}"))
            })?;
        }

        if self.should_use_secure_cookies() && !self.server.protocol.eq_ignore_ascii_case("https")
        {
            return Err(crate::error::AppError::Config(
                "server.protocol must be https for non-local server domains".to_string(),
            ));
        }

        Ok(())
    }
}

fn normalized_server_host(domain: &str) -> String {
    let trimmed = domain.trim();
    let parsed_host = url::Url::parse(&format!("http://{trimmed}"))
        .ok()
        .and_then(|url| url.host_str().map(|host| host.to_string()));
    let host = parsed_host.unwrap_or_else(|| trimmed.to_string());
    host.trim_end_matches('.').to_ascii_lowercase()
}

fn is_local_server_domain(domain: &str) -> bool {
    let host = normalized_server_host(domain);
    if host == "localhost" || host.ends_with(".localhost") {
        return true;
    }

    // `Url::host_str` keeps the brackets around IPv6 literals
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = host.parse::<IpAddr>() {
        return ip.is_loopback() || ip.is_unspecified();
    }

    false
}
