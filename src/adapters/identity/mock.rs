//! Mock identity provider for testing.
//!
//! Implements the `IdentityProvider` port without any network access.
//!
//! # Example
//!
//! ```ignore
//! let provider = MockIdentityProvider::new()
//!     .with_caller("valid-token", caller)
//!     .with_code("auth-code", "valid-token");
//!
//! let token = provider.exchange_code("auth-code", "http://localhost/cb").await?;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::identity::{
    AccessToken, AuthError, BearerCredential, CallerIdentity, ExternalId, TrustTier,
};
use crate::ports::IdentityProvider;

/// Mock identity provider.
///
/// Tokens not in the map return `InvalidToken`; codes not in the map return
/// an upstream `400`.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    /// Access token -> caller
    callers: RwLock<HashMap<String, CallerIdentity>>,
    /// Authorization code -> access token
    codes: RwLock<HashMap<String, String>>,
    /// Optional error returned by every call
    force_error: RwLock<Option<AuthError>>,
    exchange_calls: AtomicUsize,
    resolve_calls: AtomicUsize,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as belonging to `caller`.
    pub fn with_caller(self, token: impl Into<String>, caller: CallerIdentity) -> Self {
        self.callers.write().unwrap().insert(token.into(), caller);
        self
    }

    /// Accept `token` for a generated caller with the given username and tier.
    pub fn with_test_caller(self, token: impl Into<String>, username: &str, tier: i32) -> Self {
        let caller = CallerIdentity::new(
            ExternalId::new(format!("ext-{username}")),
            username,
            format!("{username}@provider.example.com"),
            format!("Test User {username}"),
            TrustTier::new(tier),
        );
        self.with_caller(token, caller)
    }

    /// Make `code` exchange for `token`.
    pub fn with_code(self, code: impl Into<String>, token: impl Into<String>) -> Self {
        self.codes.write().unwrap().insert(code.into(), token.into());
        self
    }

    /// Forces every call to return `error`.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn exchange_code(
        &self,
        code: &str,
        _redirect_uri: &str,
    ) -> Result<AccessToken, AuthError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.codes
            .read()
            .unwrap()
            .get(code)
            .map(|token| AccessToken::bearer(token.clone()))
            .ok_or_else(|| AuthError::upstream(Some(400), "invalid_grant"))
    }

    async fn resolve_identity(
        &self,
        credential: &BearerCredential,
    ) -> Result<CallerIdentity, AuthError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.callers
            .read()
            .unwrap()
            .get(credential.token())
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_token_resolves() {
        let provider = MockIdentityProvider::new().with_test_caller("tok", "alice", 3);
        let credential = BearerCredential::parse("Bearer tok").unwrap();

        let caller = provider.resolve_identity(&credential).await.unwrap();
        assert_eq!(caller.username, "alice");
        assert_eq!(provider.resolve_calls(), 1);
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let provider = MockIdentityProvider::new();
        let credential = BearerCredential::parse("Bearer nope").unwrap();

        let result = provider.resolve_identity(&credential).await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn code_exchanges_for_registered_token() {
        let provider = MockIdentityProvider::new().with_code("code-1", "tok");

        let token = provider.exchange_code("code-1", "cb").await.unwrap();
        assert_eq!(token.expose(), "tok");
        assert!(provider.exchange_code("other", "cb").await.is_err());
        assert_eq!(provider.exchange_calls(), 2);
    }

    #[tokio::test]
    async fn forced_error_wins() {
        let provider = MockIdentityProvider::new()
            .with_test_caller("tok", "alice", 3)
            .with_error(AuthError::upstream(None, "down"));
        let credential = BearerCredential::parse("Bearer tok").unwrap();

        let result = provider.resolve_identity(&credential).await;
        assert!(matches!(result, Err(AuthError::Upstream { .. })));
    }
}
