//! Profile page
//!
//! - GET /

use axum::{Router, extract::State, response::Html, routing::get};

use super::views::render_index;
use crate::AppState;
use crate::auth::MaybeUser;

/// Create profile router
///
/// Routes:
/// - GET / - Profile of the signed-in member, or the signed-out view
pub fn profile_router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// GET /
///
/// Signed in: one call to the profile API, body rendered as-is.
/// Signed out: the same view with no profile data.
async fn index(State(state): State<AppState>, MaybeUser(session): MaybeUser) -> Html<String> {
    let Some(session) = session else {
        return Html(render_index(None));
    };

    match state.profile_client.fetch(&session.access_token).await {
        Ok(response) => {
            tracing::debug!(status = response.status, "Rendering profile");
            Html(render_index(Some(&response.body)))
        }
        Err(error) => {
            // no body to pass through
            tracing::warn!(%error, "Profile API request failed");
            Html(render_index(None))
        }
    }
}
