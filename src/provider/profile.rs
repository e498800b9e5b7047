//! LinkedIn profile API client

use reqwest::header::AUTHORIZATION;
use url::Url;

use crate::config::LinkedInConfig;
use crate::error::AppError;
use crate::metrics::PROFILE_FETCHES_TOTAL;

/// Response body handed to the view, uninspected
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileBody {
    /// Body parsed as JSON
    Json(serde_json::Value),
    /// Anything that is not JSON, verbatim
    Text(String),
}

impl ProfileBody {
    fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => ProfileBody::Json(value),
            Err(_) => ProfileBody::Text(text),
        }
    }
}

/// Completed profile call, whatever its status
#[derive(Debug, Clone)]
pub struct ProfileResponse {
    pub status: u16,
    pub body: ProfileBody,
}

/// Client for the fixed profile resource
pub struct ProfileClient {
    http_client: reqwest::Client,
    profile_url: Url,
}

impl ProfileClient {
    /// # Errors
    /// Returns `AppError::Config` if `linkedin.profile_url` does not parse
    pub fn new(config: &LinkedInConfig, http_client: reqwest::Client) -> Result<Self, AppError> {
        let profile_url = Url::parse(&config.profile_url)
            .map_err(|e| AppError::Config(format!("linkedin.profile_url: {e}")))?;

        Ok(Self {
            http_client,
            profile_url,
        })
    }

    /// Fetch the member profile
    ///
    /// Issues one GET with the bearer token and `x-li-format: json`.
    /// Non-2xx statuses are not errors; the body is returned as-is.
    ///
    /// # Errors
    /// Only transport failures (connect, read) are returned
    pub async fn fetch(&self, access_token: &str) -> Result<ProfileResponse, reqwest::Error> {
        let result = self.send(access_token).await;

        let status_label = match &result {
            Ok(response) => response.status.to_string(),
            Err(_) => "error".to_string(),
        };
        PROFILE_FETCHES_TOTAL
            .with_label_values(&[status_label.as_str()])
            .inc();

        result
    }

    async fn send(&self, access_token: &str) -> Result<ProfileResponse, reqwest::Error> {
        let response = self
            .http_client
            .get(self.profile_url.clone())
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .header("x-li-format", "json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        tracing::debug!(status, bytes = text.len(), "Profile API responded");

        Ok(ProfileResponse {
            status,
            body: ProfileBody::from_text(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_is_parsed() {
        let body = ProfileBody::from_text(r#"{"id":"abc","numConnections":42}"#.to_string());
        assert_eq!(
            body,
            ProfileBody::Json(serde_json::json!({"id": "abc", "numConnections": 42}))
        );
    }

    #[test]
    fn non_json_body_is_kept_verbatim() {
        let body = ProfileBody::from_text("<html>Bad Gateway</html>".to_string());
        assert_eq!(
            body,
            ProfileBody::Text("<html>Bad Gateway</html>".to_string())
        );
    }

    #[test]
    fn profile_url_keeps_field_selector() {
        let config = crate::config::LinkedInConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            callback_url: None,
            scope: "r_basicprofile".to_string(),
            state: crate::config::DEFAULT_OAUTH_STATE.to_string(),
            authorization_url: crate::config::DEFAULT_AUTHORIZATION_URL.to_string(),
            token_url: crate::config::DEFAULT_TOKEN_URL.to_string(),
            profile_url: crate::config::DEFAULT_PROFILE_URL.to_string(),
            request_timeout_seconds: None,
        };
        let client = ProfileClient::new(&config, reqwest::Client::new()).unwrap();
        assert_eq!(
            client.profile_url.as_str(),
            "https://api.linkedin.com/v1/people/~:(id,num-connections,picture-url)"
        );
    }
}
