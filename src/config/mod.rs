//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `REGISTRATION_PORTAL`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use registration_portal::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod directory;
mod error;
mod identity;
mod registration;
mod server;

pub use database::DatabaseConfig;
pub use directory::DirectoryConfig;
pub use error::{ConfigError, ValidationError};
pub use identity::IdentityConfig;
pub use registration::RegistrationConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
/// Each section is handed to the component it configures; nothing reads
/// configuration globally.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Identity provider (OAuth2 sign-in)
    pub identity: IdentityConfig,

    /// Directory provider (account provisioning)
    pub directory: DirectoryConfig,

    /// Registration policy
    #[serde(default)]
    pub registration: RegistrationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `REGISTRATION_PORTAL` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `REGISTRATION_PORTAL__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `REGISTRATION_PORTAL__IDENTITY__CLIENT_ID=...` -> `identity.client_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("REGISTRATION_PORTAL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.identity.validate(&self.server.environment)?;
        self.directory.validate(&self.server.environment)?;
        self.registration.validate()?;
        self.validate_request_budget()?;
        Ok(())
    }

    /// Outbound time one registration may spend: the userinfo lookup, then
    /// the service-token refresh and the account creation.
    pub fn outbound_budget_secs(&self) -> u64 {
        self.identity.timeout_secs + 2 * self.directory.timeout_secs
    }

    /// The inbound timeout must not expire while an outbound call can still
    /// succeed.
    fn validate_request_budget(&self) -> Result<(), ValidationError> {
        let outbound_secs = self.outbound_budget_secs();
        if self.server.request_timeout_secs < outbound_secs {
            return Err(ValidationError::RequestTimeoutBelowOutbound {
                request_secs: self.server.request_timeout_secs,
                outbound_secs,
            });
        }
        Ok(())
    }

    /// Load and validate in one step
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

/// Checks that `url` is http(s), and https in production.
pub(crate) fn validate_endpoint(
    name: &'static str,
    url: &str,
    environment: &Environment,
) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::MissingRequired(name));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(ValidationError::InvalidUrl(name));
    }
    if *environment == Environment::Production && !url.starts_with("https://") {
        return Err(ValidationError::UrlMustBeHttps(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[(&str, &str)] = &[
        ("REGISTRATION_PORTAL__DATABASE__URL", "postgresql://portal@localhost/portal"),
        ("REGISTRATION_PORTAL__IDENTITY__CLIENT_ID", "portal"),
        ("REGISTRATION_PORTAL__IDENTITY__CLIENT_SECRET", "idp-secret"),
        ("REGISTRATION_PORTAL__IDENTITY__REDIRECT_URI", "https://portal.example.org/callback"),
        ("REGISTRATION_PORTAL__IDENTITY__TOKEN_URL", "https://connect.example.org/oauth2/token"),
        ("REGISTRATION_PORTAL__IDENTITY__USERINFO_URL", "https://connect.example.org/api/user"),
        ("REGISTRATION_PORTAL__DIRECTORY__CLIENT_ID", "dir-client"),
        ("REGISTRATION_PORTAL__DIRECTORY__CLIENT_SECRET", "dir-secret"),
        ("REGISTRATION_PORTAL__DIRECTORY__REFRESH_TOKEN", "1//refresh"),
    ];

    const OPTIONAL: &[&str] = &[
        "REGISTRATION_PORTAL__SERVER__PORT",
        "REGISTRATION_PORTAL__SERVER__ENVIRONMENT",
        "REGISTRATION_PORTAL__REGISTRATION__MIN_TRUST_TIER",
        "REGISTRATION_PORTAL__REGISTRATION__INSTITUTIONAL_DOMAIN",
    ];

    fn set_minimal_env() {
        for (key, value) in VARS {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in VARS {
            env::remove_var(key);
        }
        for key in OPTIONAL {
            env::remove_var(key);
        }
    }

    #[test]
    fn loads_sections_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://portal@localhost/portal");
        assert_eq!(config.identity.client_id, "portal");
        assert_eq!(config.identity.client_secret.expose_secret(), "idp-secret");
        assert_eq!(config.directory.refresh_token.expose_secret(), "1//refresh");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults_apply_when_unset() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.identity.timeout_secs, 10);
        assert_eq!(config.directory.timeout_secs, 15);
        assert_eq!(config.registration.institutional_domain, "polyu.edu.rs");
        assert_eq!(config.registration.min_trust_tier, 2);
    }

    #[test]
    fn overrides_are_read() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("REGISTRATION_PORTAL__SERVER__PORT", "3000");
        env::set_var("REGISTRATION_PORTAL__SERVER__ENVIRONMENT", "production");
        env::set_var("REGISTRATION_PORTAL__REGISTRATION__MIN_TRUST_TIER", "3");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.registration.min_trust_tier, 3);
    }

    #[test]
    fn request_timeout_must_cover_outbound_calls() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let mut config = result.unwrap();
        assert_eq!(config.outbound_budget_secs(), 40);
        assert!(config.server.request_timeout_secs >= 40);

        config.server.request_timeout_secs = 30;
        assert_eq!(
            config.validate(),
            Err(ValidationError::RequestTimeoutBelowOutbound {
                request_secs: 30,
                outbound_secs: 40,
            })
        );

        config.server.request_timeout_secs = 40;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn trust_tier_override_below_floor_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("REGISTRATION_PORTAL__REGISTRATION__MIN_TRUST_TIER", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::TrustTierBelowFloor { actual: 0, floor: 2 })
        );
    }

    #[test]
    fn missing_identity_section_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::remove_var("REGISTRATION_PORTAL__IDENTITY__CLIENT_ID");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn endpoint_validation() {
        let dev = Environment::Development;
        let prod = Environment::Production;

        assert!(validate_endpoint("X", "https://a.example", &prod).is_ok());
        assert!(validate_endpoint("X", "http://localhost:9000", &dev).is_ok());
        assert_eq!(
            validate_endpoint("X", "http://a.example", &prod),
            Err(ValidationError::UrlMustBeHttps("X"))
        );
        assert_eq!(
            validate_endpoint("X", "ftp://a.example", &dev),
            Err(ValidationError::InvalidUrl("X"))
        );
        assert_eq!(
            validate_endpoint("X", "", &dev),
            Err(ValidationError::MissingRequired("X"))
        );
    }
}
