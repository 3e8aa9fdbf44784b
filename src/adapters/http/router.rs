//! Top-level router assembly.
//!
//! # Routes
//!
//! ## Public
//! - `GET /health` - Liveness probe
//! - `GET /api/oauth/callback` - OAuth code exchange
//!
//! ## Authenticated (behind `auth_middleware`)
//! - `GET /api/user/info` - The resolved caller
//! - `POST /api/register` - Registration pipeline

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

use super::identity::{sign_in_routes, user_routes};
use super::middleware::auth_middleware;
use super::registration::registration_routes;
use super::state::AppState;

/// Builds the API router with all routes wired to `state`.
///
/// Carries no transport layers; see [`with_http_layers`].
pub fn api_router(state: AppState) -> Router {
    let authenticated = Router::new()
        .merge(user_routes())
        .merge(registration_routes())
        .route_layer(middleware::from_fn_with_state(
            state.identity_provider.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(sign_in_routes())
        .merge(authenticated)
        .with_state(state)
}

/// Wraps `router` with request-id, tracing, CORS and timeout layers.
pub fn with_http_layers(router: Router, config: &ServerConfig) -> Router {
    router
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors_layer(config))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if config.allows_any_origin() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
