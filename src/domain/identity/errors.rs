//! Authentication errors.

use thiserror::Error;

/// Errors raised while authenticating a caller.
///
/// Upstream bodies are kept for logs; `Display` never includes them so the
/// message is safe to hand to a client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header was supplied.
    #[error("Authorization header missing")]
    MissingCredentials,

    /// The header was not exactly `<scheme> <token>`.
    #[error("Authorization header must be '<scheme> <token>'")]
    MalformedCredentials,

    /// The OAuth callback arrived without an authorization code.
    #[error("Authorization code missing")]
    MissingAuthorizationCode,

    /// The identity provider rejected the token.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The identity provider could not be reached or answered unexpectedly.
    #[error("Identity provider request failed")]
    Upstream { status: Option<u16>, body: String },
}

impl AuthError {
    pub fn upstream(status: Option<u16>, body: impl Into<String>) -> Self {
        AuthError::Upstream {
            status,
            body: body.into(),
        }
    }

    /// True for failures caused by what the caller sent.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::Upstream { .. })
    }
}
