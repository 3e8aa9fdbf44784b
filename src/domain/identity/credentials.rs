//! Access tokens and `Authorization` header parsing.

use secrecy::{ExposeSecret, SecretString};

use super::AuthError;

/// Access token issued by an OAuth2 token endpoint.
///
/// The secret value is redacted from `Debug` output.
#[derive(Debug, Clone)]
pub struct AccessToken {
    secret: SecretString,
    token_type: String,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            token_type: token_type.into(),
        }
    }

    /// Token with the conventional `Bearer` type.
    pub fn bearer(secret: impl Into<String>) -> Self {
        Self::new(secret, "Bearer")
    }

    pub fn expose(&self) -> &str {
        self.secret.expose_secret()
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }
}

/// Credential taken from an `Authorization: <scheme> <token>` header.
///
/// The scheme is forwarded verbatim to the identity provider; only the
/// shape of the header is checked here.
#[derive(Debug, Clone)]
pub struct BearerCredential {
    scheme: String,
    token: SecretString,
}

impl BearerCredential {
    /// Parses a raw header value.
    ///
    /// The value must be exactly two non-empty tokens separated by a single
    /// space. `"BearerXYZ"` and `"Bearer a b"` are both rejected.
    pub fn parse(header: &str) -> Result<Self, AuthError> {
        if header.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let parts: Vec<&str> = header.split(' ').collect();
        match parts.as_slice() {
            [scheme, token] if !scheme.is_empty() && !token.is_empty() => Ok(Self {
                scheme: (*scheme).to_string(),
                token: SecretString::new((*token).to_string()),
            }),
            _ => Err(AuthError::MalformedCredentials),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// Header value to forward upstream.
    pub fn header_value(&self) -> String {
        format!("{} {}", self.scheme, self.token.expose_secret())
    }
}

impl From<&AccessToken> for BearerCredential {
    fn from(token: &AccessToken) -> Self {
        Self {
            scheme: token.token_type().to_string(),
            token: SecretString::new(token.expose().to_string()),
        }
    }
}
