//! Directory provider configuration (account provisioning)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::adapters::directory::{DEFAULT_TOKEN_URL, DEFAULT_USERS_URL};

use super::error::ValidationError;
use super::server::Environment;
use super::validate_endpoint;

/// Refresh-token credentials and endpoints for the workspace directory
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    pub client_id: String,

    pub client_secret: SecretString,

    /// Long-lived refresh token for the admin account
    pub refresh_token: SecretString,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_users_url")]
    pub users_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl DirectoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate directory configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.client_id.is_empty() {
            return Err(ValidationError::MissingRequired("DIRECTORY__CLIENT_ID"));
        }
        if self.client_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("DIRECTORY__CLIENT_SECRET"));
        }
        if self.refresh_token.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("DIRECTORY__REFRESH_TOKEN"));
        }
        validate_endpoint("DIRECTORY__TOKEN_URL", &self.token_url, environment)?;
        validate_endpoint("DIRECTORY__USERS_URL", &self.users_url, environment)?;
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: SecretString::new(String::new()),
            refresh_token: SecretString::new(String::new()),
            token_url: default_token_url(),
            users_url: default_users_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_users_url() -> String {
    DEFAULT_USERS_URL.to_string()
}

fn default_timeout() -> u64 {
    15
}
