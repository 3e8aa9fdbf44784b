//! Concurrency and cancellation tests for the registration pipeline.
//!
//! Runs `RegisterAccountHandler` against the in-memory store and the mock
//! directory, forcing interleavings with tokio synchronisation primitives.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Barrier, Notify};

use registration_portal::adapters::directory::MockDirectoryProvisioner;
use registration_portal::adapters::memory::InMemoryRegistrationStore;
use registration_portal::application::{RegisterAccountCommand, RegisterAccountHandler};
use registration_portal::domain::identity::{CallerIdentity, ExternalId, TrustTier};
use registration_portal::domain::registration::{
    DuplicateField, InputPolicy, NewRegistration, RegistrationError, RegistrationRecord,
    RegistrationRequest, RegistrationStage,
};
use registration_portal::ports::{RegistrationStore, StoreError};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn caller(username: &str) -> CallerIdentity {
    CallerIdentity::new(
        ExternalId::new(format!("ext-{username}")),
        username,
        format!("{username}@provider.example.com"),
        username,
        TrustTier::new(3),
    )
}

fn request(local_part: &str) -> RegistrationRequest {
    RegistrationRequest::new(
        "Doe",
        "John",
        format!("{local_part}@students.polyu.edu.rs"),
        format!("{local_part}@example.com"),
    )
}

fn handler(
    store: Arc<dyn RegistrationStore>,
    directory: Arc<MockDirectoryProvisioner>,
) -> Arc<RegisterAccountHandler> {
    Arc::new(RegisterAccountHandler::new(
        store,
        directory,
        InputPolicy::default(),
        TrustTier::REGISTRATION_MINIMUM,
    ))
}

/// Store whose inserts block until released.
struct GatedStore {
    inner: InMemoryRegistrationStore,
    insert_started: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl RegistrationStore for GatedStore {
    async fn exists(&self, external_username: &str) -> Result<bool, StoreError> {
        self.inner.exists(external_username).await
    }

    async fn email_taken(&self, institutional_email: &str) -> Result<bool, StoreError> {
        self.inner.email_taken(institutional_email).await
    }

    async fn insert(&self, registration: NewRegistration) -> Result<RegistrationRecord, StoreError> {
        self.insert_started.notify_one();
        self.release.notified().await;
        self.inner.insert(registration).await
    }
}

// =============================================================================
// Duplicate handling
// =============================================================================

#[tokio::test]
async fn concurrent_requests_for_one_username_record_exactly_once() {
    let store = InMemoryRegistrationStore::new();
    // Both requests must pass the duplicate pre-check before either inserts
    let directory = Arc::new(MockDirectoryProvisioner::new().with_barrier(Arc::new(Barrier::new(2))));
    let handler = handler(Arc::new(store.clone()), directory.clone());

    let (first, second) = futures::future::join(
        handler.handle(RegisterAccountCommand {
            caller: caller("racer"),
            request: request("racer.one"),
        }),
        handler.handle(RegisterAccountCommand {
            caller: caller("racer"),
            request: request("racer.two"),
        }),
    )
    .await;

    let outcomes = vec![first, second];
    let successes = outcomes.iter().filter(|o| o.is_ok()).count();
    let losers: Vec<_> = outcomes.into_iter().filter_map(Result::err).collect();

    assert_eq!(successes, 1);
    assert_eq!(losers.len(), 1);
    assert_eq!(losers[0].stage, RegistrationStage::Persisting);
    assert_eq!(
        losers[0].reason,
        RegistrationError::Duplicate(DuplicateField::ExternalUsername)
    );
    assert!(losers[0].is_partial_failure());

    assert_eq!(store.count().await, 1);
    // Both passed the pre-check, so both reached the directory
    assert_eq!(directory.created_accounts().len(), 2);
}

#[tokio::test]
async fn sequential_duplicate_is_rejected_before_provisioning() {
    let store = InMemoryRegistrationStore::new();
    let directory = Arc::new(MockDirectoryProvisioner::new());
    let handler = handler(Arc::new(store.clone()), directory.clone());

    handler
        .handle(RegisterAccountCommand {
            caller: caller("repeat"),
            request: request("repeat"),
        })
        .await
        .unwrap();

    let abort = handler
        .handle(RegisterAccountCommand {
            caller: caller("repeat"),
            request: request("repeat.again"),
        })
        .await
        .unwrap_err();

    assert_eq!(abort.stage, RegistrationStage::CheckingDuplicate);
    assert_eq!(
        abort.reason,
        RegistrationError::Duplicate(DuplicateField::ExternalUsername)
    );
    assert!(!abort.is_partial_failure());
    assert_eq!(directory.create_calls(), 1);
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn same_school_email_from_another_caller_is_rejected() {
    let store = InMemoryRegistrationStore::new();
    let directory = Arc::new(MockDirectoryProvisioner::new());
    let handler = handler(Arc::new(store.clone()), directory.clone());

    handler
        .handle(RegisterAccountCommand {
            caller: caller("first"),
            request: request("shared"),
        })
        .await
        .unwrap();

    let abort = handler
        .handle(RegisterAccountCommand {
            caller: caller("second"),
            request: request("shared"),
        })
        .await
        .unwrap_err();

    assert_eq!(
        abort.reason,
        RegistrationError::Duplicate(DuplicateField::InstitutionalEmail)
    );
    assert_eq!(directory.create_calls(), 1);
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn cancelling_after_provisioning_still_records_registration() {
    let inner = InMemoryRegistrationStore::new();
    let insert_started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let store = Arc::new(GatedStore {
        inner: inner.clone(),
        insert_started: insert_started.clone(),
        release: release.clone(),
    });
    let directory = Arc::new(MockDirectoryProvisioner::new());
    let handler = handler(store, directory.clone());

    let request_task = tokio::spawn(async move {
        handler
            .handle(RegisterAccountCommand {
                caller: caller("quitter"),
                request: request("quitter"),
            })
            .await
    });

    // The caller goes away while the insert is in flight
    insert_started.notified().await;
    request_task.abort();
    assert!(request_task.await.unwrap_err().is_cancelled());
    release.notify_one();

    tokio::time::timeout(Duration::from_secs(5), async {
        while inner.count().await == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("insert should complete after the request is cancelled");

    let records = inner.records().await;
    assert_eq!(records[0].external_username, "quitter");
    assert_eq!(directory.created_accounts(), vec!["quitter@students.polyu.edu.rs"]);
}

#[tokio::test]
async fn timing_out_after_directory_commits_still_records_registration() {
    let store = InMemoryRegistrationStore::new();
    let directory = Arc::new(
        MockDirectoryProvisioner::new().stalling_after_create(Duration::from_millis(500)),
    );
    let handler = handler(Arc::new(store.clone()), directory.clone());

    // The directory has the account but its response is still in flight
    let outcome = tokio::time::timeout(
        Duration::from_millis(100),
        handler.handle(RegisterAccountCommand {
            caller: caller("patient"),
            request: request("patient"),
        }),
    )
    .await;
    assert!(outcome.is_err());
    assert_eq!(directory.created_accounts(), vec!["patient@students.polyu.edu.rs"]);

    tokio::time::timeout(Duration::from_secs(5), async {
        while store.count().await == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("insert should complete after the request times out");

    let records = store.records().await;
    assert_eq!(records[0].external_username, "patient");
    assert_eq!(records[0].institutional_email, "patient@students.polyu.edu.rs");
}

#[tokio::test]
async fn cancelling_before_account_creation_leaves_no_trace() {
    let store = InMemoryRegistrationStore::new();
    let barrier = Arc::new(Barrier::new(2));
    let directory = Arc::new(MockDirectoryProvisioner::new().with_token_barrier(barrier));
    let handler = handler(Arc::new(store.clone()), directory.clone());

    let request_task = tokio::spawn(async move {
        handler
            .handle(RegisterAccountCommand {
                caller: caller("early"),
                request: request("early"),
            })
            .await
    });

    // Wait until the pipeline is parked inside the service-token refresh
    tokio::time::timeout(Duration::from_secs(5), async {
        while directory.token_calls() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("pipeline should reach provisioning");

    request_task.abort();
    assert!(request_task.await.unwrap_err().is_cancelled());

    assert_eq!(directory.create_calls(), 0);
    assert!(directory.created_accounts().is_empty());
    assert_eq!(store.insert_calls(), 0);
    assert_eq!(store.count().await, 0);
}
