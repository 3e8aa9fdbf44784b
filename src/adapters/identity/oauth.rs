//! OAuth2 identity provider adapter.
//!
//! This adapter implements the `IdentityProvider` port against a plain
//! OAuth2 provider with two endpoints:
//!
//! 1. A token endpoint for the authorization-code grant, authenticated with
//!    the client credentials as HTTP Basic auth and a form-encoded body
//! 2. A userinfo endpoint returning `id`, `username`, `email`, `name` and
//!    `trust_level` for the bearer of an access token
//!
//! # Example
//!
//! ```ignore
//! let config = OAuthProviderConfig::new(
//!     "client-id",
//!     SecretString::new("client-secret".into()),
//!     "https://connect.example.org/oauth2/token",
//!     "https://connect.example.org/api/user",
//! );
//!
//! let provider = OAuthIdentityProvider::new(config)?;
//! let token = provider.exchange_code("abc", "https://portal.example.org/callback").await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::ValidationError;
use crate::domain::identity::{
    AccessToken, AuthError, BearerCredential, CallerIdentity, ExternalId, TrustTier,
};
use crate::ports::IdentityProvider;

/// Configuration for the OAuth2 identity provider adapter.
#[derive(Debug, Clone)]
pub struct OAuthProviderConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub token_url: String,
    pub userinfo_url: String,
    /// Upper bound for each outbound request. Defaults to 10 seconds.
    pub timeout: Duration,
}

impl OAuthProviderConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: SecretString,
        token_url: impl Into<String>,
        userinfo_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            token_url: token_url.into(),
            userinfo_url: userinfo_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Provider ids arrive as numbers or strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProviderId {
    Number(i64),
    Text(String),
}

impl From<ProviderId> for ExternalId {
    fn from(id: ProviderId) -> Self {
        match id {
            ProviderId::Number(n) => ExternalId::new(n.to_string()),
            ProviderId::Text(s) => ExternalId::new(s),
        }
    }
}

/// Userinfo endpoint response.
#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    id: ProviderId,
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    trust_level: i32,
}

impl TryFrom<UserInfoResponse> for CallerIdentity {
    type Error = ValidationError;

    /// Registrations are keyed by username, so it must be a usable handle.
    fn try_from(info: UserInfoResponse) -> Result<Self, Self::Error> {
        let external_id = ExternalId::from(info.id);
        if external_id.as_str().trim().is_empty() {
            return Err(ValidationError::empty_field("id"));
        }
        if info.username.is_empty() {
            return Err(ValidationError::empty_field("username"));
        }
        if info.username.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "username",
                "contains whitespace",
            ));
        }

        Ok(CallerIdentity::new(
            external_id,
            info.username,
            info.email,
            info.name,
            TrustTier::new(info.trust_level),
        ))
    }
}

/// OAuth2 identity provider.
///
/// This is the production implementation of `IdentityProvider`.
pub struct OAuthIdentityProvider {
    config: OAuthProviderConfig,
    http_client: reqwest::Client,
}

impl OAuthIdentityProvider {
    /// Create a provider with a client bounded by `config.timeout`.
    pub fn new(config: OAuthProviderConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Reads a non-2xx body for logging.
    async fn failure(response: reqwest::Response, endpoint: &str) -> AuthError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(endpoint, status, body = %body, "Identity provider returned an error");
        AuthError::upstream(Some(status), body)
    }
}

#[async_trait]
impl IdentityProvider for OAuthIdentityProvider {
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken, AuthError> {
        tracing::debug!("Exchanging authorization code at {}", self.config.token_url);

        let response = self
            .http_client
            .post(&self.config.token_url)
            .basic_auth(
                &self.config.client_id,
                Some(self.config.client_secret.expose_secret()),
            )
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Token request failed: {}", e);
                AuthError::upstream(None, e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(Self::failure(response, "token").await);
        }

        let status = response.status().as_u16();
        let token: TokenResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse token response: {}", e);
            AuthError::upstream(Some(status), format!("malformed token response: {e}"))
        })?;

        Ok(AccessToken::new(token.access_token, token.token_type))
    }

    async fn resolve_identity(
        &self,
        credential: &BearerCredential,
    ) -> Result<CallerIdentity, AuthError> {
        let response = self
            .http_client
            .get(&self.config.userinfo_url)
            .header(reqwest::header::AUTHORIZATION, credential.header_value())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Userinfo request failed: {}", e);
                AuthError::upstream(None, e.to_string())
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::debug!("Identity provider rejected token");
                return Err(AuthError::InvalidToken);
            }
            status if !status.is_success() => {
                return Err(Self::failure(response, "userinfo").await);
            }
            _ => {}
        }

        let status = response.status().as_u16();
        let info: UserInfoResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse userinfo response: {}", e);
            AuthError::upstream(Some(status), format!("malformed userinfo response: {e}"))
        })?;

        CallerIdentity::try_from(info).map_err(|e| {
            tracing::error!(error = %e, "Identity provider returned an unusable profile");
            AuthError::upstream(Some(status), format!("unusable userinfo profile: {e}"))
        })
    }
}

impl std::fmt::Debug for OAuthIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthIdentityProvider")
            .field("client_id", &self.config.client_id)
            .field("token_url", &self.config.token_url)
            .field("userinfo_url", &self.config.userinfo_url)
            .finish_non_exhaustive()
    }
}
