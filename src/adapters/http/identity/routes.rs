//! Axum routes for sign-in endpoints.

use axum::{routing::get, Router};

use crate::adapters::http::state::AppState;

use super::handlers::{oauth_callback, user_info};

/// Public sign-in routes.
///
/// # Routes
/// - `GET /api/oauth/callback` - Exchange an authorization code
pub fn sign_in_routes() -> Router<AppState> {
    Router::new().route("/api/oauth/callback", get(oauth_callback))
}

/// Caller routes. Must sit behind `auth_middleware`.
///
/// # Routes
/// - `GET /api/user/info` - The authenticated caller
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/api/user/info", get(user_info))
}
