//! Identity provider port for the OAuth2 sign-in flow.
//!
//! This port defines the contract for exchanging an authorization code and
//! resolving a caller from an access token. It is provider-agnostic; the
//! production adapter speaks plain OAuth2 over HTTP and tests use a mock.
//!
//! # Example Implementation
//!
//! ```ignore
//! pub struct OAuthIdentityProvider { ... }
//!
//! #[async_trait]
//! impl IdentityProvider for OAuthIdentityProvider {
//!     async fn resolve_identity(&self, credential: &BearerCredential)
//!         -> Result<CallerIdentity, AuthError>
//!     {
//!         // 1. GET userinfo with the forwarded Authorization header
//!         // 2. Map 401/403 to InvalidToken, other failures to Upstream
//!         // 3. Map the JSON profile to CallerIdentity
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::identity::{AccessToken, AuthError, BearerCredential, CallerIdentity};

/// Exchanges authorization codes and resolves callers.
///
/// HTTP middleware uses `resolve_identity` as the gate in front of every
/// authenticated route.
///
/// # Contract
///
/// Implementations must:
/// - Bound every outbound call with a timeout
/// - Return `AuthError::InvalidToken` when the provider rejects the token
/// - Return `AuthError::Upstream` for non-2xx responses, malformed bodies
///   and transport failures, carrying the status and body for logs
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an authorization code for an access token.
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code from the provider redirect
    /// * `redirect_uri` - The redirect URI registered for this client
    async fn exchange_code(&self, code: &str, redirect_uri: &str)
        -> Result<AccessToken, AuthError>;

    /// Resolve the caller behind a credential.
    ///
    /// # Returns
    ///
    /// * `Ok(CallerIdentity)` - Provider accepted the token
    /// * `Err(AuthError::InvalidToken)` - Provider rejected the token
    /// * `Err(AuthError::Upstream)` - Provider unreachable or misbehaving
    async fn resolve_identity(
        &self,
        credential: &BearerCredential,
    ) -> Result<CallerIdentity, AuthError>;
}
