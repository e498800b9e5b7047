//! Session management
//!
//! Uses HMAC-signed tokens stored in cookies.
//! No server-side session storage needed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "session";

/// User session data
///
/// Stored in a signed cookie. Holds the LinkedIn bearer token
/// obtained at sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// LinkedIn access token
    pub access_token: String,
    /// Token lifetime reported by LinkedIn, in seconds
    pub expires_in: Option<u64>,
    /// When session was created
    pub created_at: DateTime<Utc>,
    /// When session expires
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for a freshly issued token
    ///
    /// # Errors
    /// Returns `AppError::Config` if `max_age_seconds` does not fit a timestamp
    pub fn new(
        access_token: String,
        expires_in: Option<u64>,
        max_age_seconds: i64,
    ) -> Result<Self, AppError> {
        let now = Utc::now();
        let expires_at = Duration::try_seconds(max_age_seconds)
            .and_then(|max_age| now.checked_add_signed(max_age))
            .ok_or_else(|| {
                AppError::Config(format!(
                    "session max age of {max_age_seconds}s is out of range"
                ))
            })?;

        Ok(Self {
            access_token,
            expires_in,
            created_at: now,
            expires_at,
        })
    }

    /// Check if session is expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

type HmacSha256 = hmac::Hmac<sha2::Sha256>;

fn signer(secret: &str) -> Result<HmacSha256, AppError> {
    use hmac::Mac;

    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| AppError::Encryption(e.to_string()))
}

/// Create a signed session token
///
/// Token format: base64(payload).base64(hmac_sha256(payload))
pub fn create_session_token(session: &Session, secret: &str) -> Result<String, AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::Mac;

    let payload = serde_json::to_string(session).map_err(|e| AppError::Internal(e.into()))?;
    let payload_b64 = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());

    let mut mac = signer(secret)?;
    mac.update(payload_b64.as_bytes());
    let signature = mac.finalize().into_bytes();
    let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

    Ok(format!("{}.{}", payload_b64, signature_b64))
}

/// Verify and decode a session token
///
/// # Errors
/// Returns error if signature is invalid, token is malformed or
/// the session has expired
pub fn verify_session_token(token: &str, secret: &str) -> Result<Session, AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::Mac;

    let (payload_b64, signature_b64) = token.split_once('.').ok_or(AppError::Unauthorized)?;
    if signature_b64.contains('.') {
        return Err(AppError::Unauthorized);
    }

    let mut mac = signer(secret)?;
    mac.update(payload_b64.as_bytes());

    let expected_signature = general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AppError::Unauthorized)?;

    mac.verify_slice(&expected_signature)
        .map_err(|_| AppError::InvalidSignature)?;

    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| AppError::Unauthorized)?;

    let session: Session =
        serde_json::from_slice(&payload_bytes).map_err(|_| AppError::Unauthorized)?;

    if session.is_expired() {
        return Err(AppError::Unauthorized);
    }

    Ok(session)
}
