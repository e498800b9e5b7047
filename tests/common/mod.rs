//! Common test utilities for E2E tests

#![allow(dead_code)]

use linkedin_profile::{AppState, config};
use tokio::net::TcpListener;
use wiremock::MockServer;

/// Path of the profile resource on the mock provider
pub const PROFILE_PATH: &str = "/v1/people/~:(id,num-connections,picture-url)";
/// Path of the token endpoint on the mock provider
pub const TOKEN_PATH: &str = "/oauth/v2/accessToken";

/// Test server instance
///
/// Runs the real router on an ephemeral port, with every LinkedIn
/// endpoint pointed at a local mock server.
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub provider: MockServer,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server after adjusting the default test configuration
    pub async fn with_config(configure: impl FnOnce(&mut config::AppConfig)) -> Self {
        let provider = MockServer::start().await;

        // Create test configuration
        let mut config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                domain: "profile.test.example.com".to_string(),
                protocol: "https".to_string(),
            },
            auth: config::AuthConfig {
                session_secret: "test-secret-key-32-bytes-long!!!".to_string(),
                session_max_age: 604800,
            },
            linkedin: config::LinkedInConfig {
                client_id: "test-client-id".to_string(),
                client_secret: "test-client-secret".to_string(),
                callback_url: None,
                scope: "r_basicprofile".to_string(),
                state: config::DEFAULT_OAUTH_STATE.to_string(),
                authorization_url: format!("{}/oauth/v2/authorization", provider.uri()),
                token_url: format!("{}{}", provider.uri(), TOKEN_PATH),
                profile_url: format!("{}{}", provider.uri(), PROFILE_PATH),
                request_timeout_seconds: Some(10),
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };
        configure(&mut config);

        // Initialize app state
        let state = AppState::new(config).unwrap();

        // Redirects are asserted, never followed
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        let app = linkedin_profile::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            state,
            provider,
            client,
        }
    }

    /// Get base URL for requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Signed session token holding the given LinkedIn access token
    pub fn create_session_token(&self, access_token: &str) -> String {
        use linkedin_profile::auth::{Session, create_session_token};

        let session = Session::new(
            access_token.to_string(),
            Some(5_184_000),
            self.state.config.auth.session_max_age,
        )
        .expect("session max age is in range");
        create_session_token(&session, &self.state.config.auth.session_secret)
            .expect("Failed to create test token")
    }
}

/// Value of the `location` header
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}
