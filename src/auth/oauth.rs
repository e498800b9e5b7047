//! LinkedIn sign-in routes
//!
//! Delegates the OAuth handshake to the configured [`AuthStrategy`]
//! and stores the resulting token on a signed session cookie.
//!
//! [`AuthStrategy`]: super::strategy::AuthStrategy

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use super::session::{SESSION_COOKIE, Session, create_session_token};
use super::strategy::{AccessToken, CallbackParams};
use crate::AppState;
use crate::error::AppError;
use crate::metrics::AUTH_ATTEMPTS_TOTAL;

/// Where the browser lands after a successful sign-in
const SUCCESS_REDIRECT: &str = "/";
/// Where the browser lands after any sign-in failure
const FAILURE_REDIRECT: &str = "/login";

/// Create authentication router
///
/// Routes:
/// - GET /linkedin - Redirect to LinkedIn
/// - GET /linkedin/callback - OAuth callback
/// - GET /login - Login page
/// - POST /logout - Logout
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/linkedin", get(linkedin_redirect))
        .route("/linkedin/callback", get(linkedin_callback))
        .route("/login", get(login_page))
        .route("/logout", post(logout))
}

// =============================================================================
// Login Page
// =============================================================================

/// GET /login
async fn login_page() -> impl IntoResponse {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Login</title></head>
<body>
    <h1>Login</h1>
    <p>Please sign in with LinkedIn</p>
    <a href="/linkedin">Sign in with LinkedIn</a>
</body>
</html>
"#,
    )
}

// =============================================================================
// LinkedIn OAuth
// =============================================================================

/// GET /linkedin
///
/// Redirects user to the LinkedIn authorization page.
async fn linkedin_redirect(State(state): State<AppState>) -> Response {
    let url = state.strategy.authorization_url();
    tracing::debug!(host = ?url.host_str(), "Redirecting to identity provider");
    found(url.as_str())
}

/// GET /linkedin/callback
///
/// Handles OAuth callback from LinkedIn. Every outcome is a redirect:
/// home on success, the login page on anything else.
///
/// # Steps
/// 1. Let the strategy verify the callback and exchange the code
/// 2. On success, store the token in a new session cookie and go home
/// 3. On failure, go to the login page
async fn linkedin_callback(
    State(state): State<AppState>,
    query: Result<Query<CallbackParams>, QueryRejection>,
    jar: CookieJar,
) -> Response {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::warn!(error = %rejection, kind = "bad_query", "LinkedIn sign-in failed");
            return sign_in_failed(jar);
        }
    };

    let token = match state.strategy.authenticate(params).await {
        Ok(token) => token,
        Err(error) => {
            tracing::warn!(%error, kind = error.kind(), "LinkedIn sign-in failed");
            return sign_in_failed(jar);
        }
    };

    let session_token = match start_session(&state, token) {
        Ok(session_token) => session_token,
        Err(error) => {
            tracing::error!(%error, "Could not create session after LinkedIn sign-in");
            return sign_in_failed(jar);
        }
    };

    AUTH_ATTEMPTS_TOTAL.with_label_values(&["success"]).inc();
    tracing::info!("LinkedIn sign-in succeeded");

    let jar = jar.add(build_session_cookie(
        session_token,
        state.config.should_use_secure_cookies(),
    ));
    (jar, found(SUCCESS_REDIRECT)).into_response()
}

fn start_session(state: &AppState, token: AccessToken) -> Result<String, AppError> {
    let session = Session::new(
        token.token,
        token.expires_in,
        state.config.auth.session_max_age,
    )?;
    tracing::debug!(expires_at = %session.expires_at, "Session created");
    create_session_token(&session, &state.config.auth.session_secret)
}

fn sign_in_failed(jar: CookieJar) -> Response {
    AUTH_ATTEMPTS_TOTAL.with_label_values(&["failure"]).inc();
    (jar, found(FAILURE_REDIRECT)).into_response()
}

// =============================================================================
// Logout
// =============================================================================

/// POST /logout
///
/// Clears session cookie and redirects to login.
async fn logout(jar: CookieJar) -> Response {
    let mut removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    removal.make_removal();
    (jar.add(removal), found(FAILURE_REDIRECT)).into_response()
}

// =============================================================================
// Helpers
// =============================================================================

fn build_session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// 302 Found, the status browsers get from the usual sign-in redirects
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}
