//! Directory provisioner port for creating institutional accounts.
//!
//! The directory is the upstream system that owns the institutional mailbox.
//! Account creation is the single externally visible side effect of a
//! registration; callers must treat it as at-most-once.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use crate::domain::identity::AccessToken;

/// Account to create in the directory.
///
/// `password` is a `SecretString` so `Debug` never prints it.
#[derive(Debug, Clone)]
pub struct DirectoryAccount {
    pub primary_email: String,
    pub recovery_email: String,
    pub given_name: String,
    pub family_name: String,
    pub password: SecretString,
}

/// Errors from the directory provider.
///
/// `detail` holds the upstream body for logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The service-token refresh failed or returned no `access_token`.
    #[error("Directory service token request failed")]
    ServiceToken { status: Option<u16>, detail: String },

    /// The account-creation call did not return 2xx.
    #[error("Directory account creation failed")]
    AccountCreation { status: Option<u16>, detail: String },
}

/// Creates accounts in the institutional directory.
///
/// # Contract
///
/// Implementations must:
/// - Bound every outbound call with a timeout
/// - Never retry `create_account`
/// - Succeed only on a 2xx response
#[async_trait]
pub trait DirectoryProvisioner: Send + Sync {
    /// Obtain a short-lived service token through a refresh-token grant.
    async fn obtain_service_token(&self) -> Result<AccessToken, DirectoryError>;

    /// Create `account`, authenticating with `service_token`.
    async fn create_account(
        &self,
        service_token: &AccessToken,
        account: &DirectoryAccount,
    ) -> Result<(), DirectoryError>;
}
