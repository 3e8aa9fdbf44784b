//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that resolves the caller behind the `Authorization` header
//! - `RequireAuth` - Extractor that hands the resolved `CallerIdentity` to a handler
//!
//! # Architecture
//!
//! The middleware talks to the `IdentityProvider` port only, so the OAuth
//! adapter and the test mock are interchangeable.
//!
//! ```text
//! Request → auth_middleware → injects CallerIdentity into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! Unlike an optional-auth gate, a missing or malformed header is rejected
//! here with 401 and the provider is never called.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::ApiError;
use crate::domain::identity::{AuthError, BearerCredential, CallerIdentity};
use crate::ports::IdentityProvider;

/// Auth middleware state - the identity provider used to resolve tokens.
pub type AuthState = Arc<dyn IdentityProvider>;

/// Authentication middleware for routes that require a caller.
///
/// This middleware:
/// 1. Reads the `Authorization` header, rejecting it if absent or not `<scheme> <token>`
/// 2. Resolves the caller through the `IdentityProvider` port
/// 3. On success, injects `CallerIdentity` into request extensions
/// 4. On an invalid token, returns 401; on a provider failure, 502
pub async fn auth_middleware(
    State(provider): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let credential = match credential_from(&request) {
        Ok(credential) => credential,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected request without usable credentials");
            return ApiError::from(e).into_response();
        }
    };

    match provider.resolve_identity(&credential).await {
        Ok(caller) => {
            tracing::debug!(
                external_username = %caller.username,
                trust_tier = %caller.trust_tier,
                "Caller resolved"
            );
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

fn credential_from(request: &Request) -> Result<BearerCredential, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredentials)?;

    BearerCredential::parse(header)
}

/// Extractor for the authenticated caller.
///
/// Only valid on routes behind `auth_middleware`; elsewhere it rejects with
/// 401.
///
/// # Example
///
/// ```ignore
/// async fn my_handler(RequireAuth(caller): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", caller.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub CallerIdentity);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<CallerIdentity>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Rejection for `RequireAuth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => {
                ApiError::unauthorized("Authentication required").into_response()
            }
        }
    }
}
