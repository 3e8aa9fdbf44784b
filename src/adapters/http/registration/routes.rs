//! Axum routes for registration.

use axum::{routing::post, Router};

use crate::adapters::http::state::AppState;

use super::handlers::register;

/// Registration routes. Must sit behind `auth_middleware`.
///
/// # Routes
/// - `POST /api/register` - Provision a directory account for the caller
pub fn registration_routes() -> Router<AppState> {
    Router::new().route("/api/register", post(register))
}
