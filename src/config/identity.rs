//! Identity provider configuration (OAuth2 sign-in)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;
use super::validate_endpoint;

/// OAuth2 client settings for the identity provider
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    pub client_id: String,

    pub client_secret: SecretString,

    /// Redirect URI registered with the provider; sent with the code exchange
    pub redirect_uri: String,

    /// Authorization-code token endpoint
    pub token_url: String,

    /// Userinfo endpoint returning `id, username, email, name, trust_level`
    pub userinfo_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl IdentityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate identity provider configuration
    ///
    /// In production, every endpoint must use HTTPS.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.client_id.is_empty() {
            return Err(ValidationError::MissingRequired("IDENTITY__CLIENT_ID"));
        }
        if self.client_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("IDENTITY__CLIENT_SECRET"));
        }
        validate_endpoint("IDENTITY__REDIRECT_URI", &self.redirect_uri, environment)?;
        validate_endpoint("IDENTITY__TOKEN_URL", &self.token_url, environment)?;
        validate_endpoint("IDENTITY__USERINFO_URL", &self.userinfo_url, environment)?;
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: SecretString::new(String::new()),
            redirect_uri: String::new(),
            token_url: String::new(),
            userinfo_url: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> IdentityConfig {
        IdentityConfig {
            client_id: "portal".to_string(),
            client_secret: SecretString::new("secret".to_string()),
            redirect_uri: "https://portal.example.org/callback".to_string(),
            token_url: "https://connect.example.org/oauth2/token".to_string(),
            userinfo_url: "https://connect.example.org/api/user".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn default_timeout_is_ten_seconds() {
        assert_eq!(IdentityConfig::default().timeout(), Duration::from_secs(10));
    }

    #[test]
    fn valid_config_passes_in_production() {
        assert!(valid().validate(&Environment::Production).is_ok());
    }

    #[test]
    fn missing_client_secret_is_rejected() {
        let config = IdentityConfig {
            client_secret: SecretString::new(String::new()),
            ..valid()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("IDENTITY__CLIENT_SECRET"))
        );
    }

    #[test]
    fn http_endpoints_only_allowed_outside_production() {
        let config = IdentityConfig {
            token_url: "http://localhost:9000/token".to_string(),
            ..valid()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::UrlMustBeHttps("IDENTITY__TOKEN_URL"))
        );
    }

    #[test]
    fn debug_hides_client_secret() {
        let debug = format!("{:?}", valid());
        assert!(!debug.contains("\"secret\""));
    }
}
