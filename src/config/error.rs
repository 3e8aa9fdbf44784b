//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid listen address {0}")]
    InvalidListenAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid log format {0:?}, expected \"pretty\" or \"json\"")]
    InvalidLogFormat(String),

    #[error("Wildcard CORS origin is only allowed in development")]
    WildcardCorsOrigin,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("{0} must be an http(s) URL")]
    InvalidUrl(&'static str),

    #[error("{0} must use HTTPS in production")]
    UrlMustBeHttps(&'static str),

    #[error("Invalid institutional domain {0:?}")]
    InvalidInstitutionalDomain(String),

    #[error("Minimum trust tier {actual} is below the floor of {floor}")]
    TrustTierBelowFloor { actual: i32, floor: i32 },

    #[error("Request timeout {request_secs}s is shorter than the outbound budget of {outbound_secs}s")]
    RequestTimeoutBelowOutbound { request_secs: u64, outbound_secs: u64 },
}
