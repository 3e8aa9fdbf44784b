//! Mock directory provisioner for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;

use crate::domain::identity::AccessToken;
use crate::ports::{DirectoryAccount, DirectoryError, DirectoryProvisioner};

/// Mock directory provisioner.
///
/// Records the primary email of every account it creates and counts calls
/// so tests can assert that provisioning did or did not happen.
#[derive(Debug, Default)]
pub struct MockDirectoryProvisioner {
    token_error: Mutex<Option<DirectoryError>>,
    create_error: Mutex<Option<DirectoryError>>,
    /// Every `obtain_service_token` call waits here before completing.
    token_barrier: Option<Arc<Barrier>>,
    /// Every `create_account` call waits here before completing.
    barrier: Option<Arc<Barrier>>,
    /// Delay between recording an account and acknowledging it.
    stall_after_create: Option<Duration>,
    created: Mutex<Vec<String>>,
    token_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl MockDirectoryProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service-token requests fail with an upstream `status`.
    pub fn failing_token(self, status: u16) -> Self {
        *self.token_error.lock().unwrap() = Some(DirectoryError::ServiceToken {
            status: Some(status),
            detail: "token refresh rejected".to_string(),
        });
        self
    }

    /// Account creation fails with an upstream `status`.
    pub fn failing_create(self, status: u16) -> Self {
        *self.create_error.lock().unwrap() = Some(DirectoryError::AccountCreation {
            status: Some(status),
            detail: "account creation rejected".to_string(),
        });
        self
    }

    /// Holds every `create_account` call until `barrier` releases.
    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    /// Holds every `obtain_service_token` call until `barrier` releases.
    pub fn with_token_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.token_barrier = Some(barrier);
        self
    }

    /// Accounts are recorded at once but acknowledged only after `delay`,
    /// like a directory that commits before its response arrives.
    pub fn stalling_after_create(mut self, delay: Duration) -> Self {
        self.stall_after_create = Some(delay);
        self
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Total outbound calls of either kind.
    pub fn total_calls(&self) -> usize {
        self.token_calls() + self.create_calls()
    }

    /// Primary emails of successfully created accounts.
    pub fn created_accounts(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectoryProvisioner for MockDirectoryProvisioner {
    async fn obtain_service_token(&self) -> Result<AccessToken, DirectoryError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(barrier) = &self.token_barrier {
            barrier.wait().await;
        }

        if let Some(error) = self.token_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(AccessToken::bearer("mock-service-token"))
    }

    async fn create_account(
        &self,
        _service_token: &AccessToken,
        account: &DirectoryAccount,
    ) -> Result<(), DirectoryError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }

        if let Some(error) = self.create_error.lock().unwrap().clone() {
            return Err(error);
        }

        self.created
            .lock()
            .unwrap()
            .push(account.primary_email.clone());

        if let Some(delay) = self.stall_after_create {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}
