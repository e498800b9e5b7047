//! Delegated sign-in strategies
//!
//! A strategy knows where to send the browser and how to turn the
//! provider's redirect-back into a bearer token. Handlers only see the
//! [`AuthStrategy`] trait; [`LinkedInStrategy`] is the production one.

use axum::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::AppConfig;
use crate::error::AppError;

/// Query parameters on the provider callback
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    /// Authorization code
    pub code: Option<String>,
    /// Echoed anti-forgery state
    pub state: Option<String>,
    /// Provider error code (e.g. `user_cancelled_login`)
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Bearer token issued by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    /// Lifetime in seconds, when the provider reports one
    pub expires_in: Option<u64>,
}

/// Why a sign-in callback did not produce a token
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("provider denied authorization: {error}")]
    Denied {
        error: String,
        description: Option<String>,
    },

    #[error("callback is missing the authorization code")]
    MissingCode,

    #[error("callback state does not match")]
    StateMismatch,

    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token endpoint returned {status}")]
    TokenEndpoint { status: u16, body: String },

    #[error("token response has no access_token")]
    MissingAccessToken,
}

impl AuthError {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Denied { .. } => "denied",
            AuthError::MissingCode => "missing_code",
            AuthError::StateMismatch => "state_mismatch",
            AuthError::Transport(_) => "transport",
            AuthError::TokenEndpoint { .. } => "token_endpoint",
            AuthError::MissingAccessToken => "missing_access_token",
        }
    }
}

/// Delegated authentication against an identity provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Where to send the browser to start sign-in
    fn authorization_url(&self) -> Url;

    /// Verify the callback and exchange its code for a token
    async fn authenticate(&self, params: CallbackParams) -> Result<AccessToken, AuthError>;
}

/// LinkedIn token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

/// OAuth 2.0 authorization code flow against LinkedIn
pub struct LinkedInStrategy {
    http_client: reqwest::Client,
    authorization_url: Url,
    token_url: Url,
    client_id: String,
    client_secret: String,
    callback_url: String,
    state: String,
}

impl LinkedInStrategy {
    /// Build the strategy from the `linkedin` config section
    ///
    /// # Errors
    /// Returns `AppError::Config` if an endpoint URL does not parse
    pub fn new(config: &AppConfig, http_client: reqwest::Client) -> Result<Self, AppError> {
        let linkedin = &config.linkedin;
        let callback_url = config.callback_url();

        let authorization_url = Url::parse_with_params(
            &linkedin.authorization_url,
            &[
                ("response_type", "code"),
                ("client_id", linkedin.client_id.as_str()),
                ("redirect_uri", callback_url.as_str()),
                ("state", linkedin.state.as_str()),
                ("scope", linkedin.scope.as_str()),
            ],
        )
        .map_err(|e| AppError::Config(format!("linkedin.authorization_url: {e}")))?;

        let token_url = Url::parse(&linkedin.token_url)
            .map_err(|e| AppError::Config(format!("linkedin.token_url: {e}")))?;

        Ok(Self {
            http_client,
            authorization_url,
            token_url,
            client_id: linkedin.client_id.clone(),
            client_secret: linkedin.client_secret.clone(),
            callback_url,
            state: linkedin.state.clone(),
        })
    }
}

#[async_trait]
impl AuthStrategy for LinkedInStrategy {
    fn authorization_url(&self) -> Url {
        self.authorization_url.clone()
    }

    async fn authenticate(&self, params: CallbackParams) -> Result<AccessToken, AuthError> {
        if let Some(error) = params.error {
            return Err(AuthError::Denied {
                error,
                description: params.error_description,
            });
        }

        if params.state.as_deref() != Some(self.state.as_str()) {
            return Err(AuthError::StateMismatch);
        }

        let code = params
            .code
            .filter(|code| !code.is_empty())
            .ok_or(AuthError::MissingCode)?;

        let response = self
            .http_client
            .post(self.token_url.clone())
            .header(ACCEPT, "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code.as_str()),
                ("redirect_uri", self.callback_url.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenEndpoint {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        let access_token = token
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingAccessToken)?;

        Ok(AccessToken {
            token: access_token,
            expires_in: token.expires_in,
        })
    }
}
