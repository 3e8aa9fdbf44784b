//! Registration store port.
//!
//! The store's unique constraints are the only correctness guarantee for
//! "one registration per username and per institutional email". Lookups are
//! an early exit; `insert` must enforce uniqueness on its own because a
//! lookup followed by an insert is not atomic.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::registration::{DuplicateField, NewRegistration, RegistrationRecord};

/// Errors from the registration store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique constraint rejected the insert.
    #[error("Duplicate value for {0}")]
    Duplicate(DuplicateField),

    /// The store could not complete the operation.
    #[error("Registration store unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage for registrations.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Whether a registration exists for this provider username.
    async fn exists(&self, external_username: &str) -> Result<bool, StoreError>;

    /// Whether this institutional email is already registered.
    async fn email_taken(&self, institutional_email: &str) -> Result<bool, StoreError>;

    /// Insert a registration.
    ///
    /// # Errors
    ///
    /// * `StoreError::Duplicate` - a unique constraint was violated
    /// * `StoreError::Unavailable` - any other store failure
    async fn insert(&self, registration: NewRegistration)
        -> Result<RegistrationRecord, StoreError>;
}
