//! In-memory registration store.
//!
//! Enforces the same uniqueness rules as the Postgres constraints. The
//! uniqueness check and the insert happen under one write lock, so
//! concurrent inserts behave like the database. Useful for tests and
//! development.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{RegistrationId, Timestamp};
use crate::domain::registration::{NewRegistration, RegistrationRecord};
use crate::ports::{RegistrationStore, StoreError};

#[derive(Debug, Default)]
struct Counters {
    lookups: AtomicUsize,
    inserts: AtomicUsize,
}

/// In-memory storage for registrations.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistrationStore {
    records: Arc<RwLock<Vec<RegistrationRecord>>>,
    counters: Arc<Counters>,
    fail_inserts: Arc<AtomicBool>,
}

impl InMemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every insert fails with `StoreError::Unavailable`.
    pub fn failing_inserts(self) -> Self {
        self.fail_inserts.store(true, Ordering::SeqCst);
        self
    }

    /// Adds a record directly, bypassing call counters.
    pub async fn seed(&self, registration: NewRegistration) -> RegistrationRecord {
        let mut records = self.records.write().await;
        let record = RegistrationRecord::from_new(
            RegistrationId::new(records.len() as i64 + 1),
            registration,
            Timestamp::now(),
        );
        records.push(record.clone());
        record
    }

    pub async fn records(&self) -> Vec<RegistrationRecord> {
        self.records.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Calls to `exists` and `email_taken`.
    pub fn lookup_calls(&self) -> usize {
        self.counters.lookups.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.counters.inserts.load(Ordering::SeqCst)
    }

    /// Total calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.lookup_calls() + self.insert_calls()
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    async fn exists(&self, external_username: &str) -> Result<bool, StoreError> {
        self.counters.lookups.fetch_add(1, Ordering::SeqCst);
        let records = self.records.read().await;
        Ok(records
            .iter()
            .any(|r| r.external_username == external_username))
    }

    async fn email_taken(&self, institutional_email: &str) -> Result<bool, StoreError> {
        self.counters.lookups.fetch_add(1, Ordering::SeqCst);
        let records = self.records.read().await;
        Ok(records
            .iter()
            .any(|r| r.institutional_email == institutional_email))
    }

    async fn insert(&self, registration: NewRegistration) -> Result<RegistrationRecord, StoreError> {
        self.counters.inserts.fetch_add(1, Ordering::SeqCst);

        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is failing".to_string()));
        }

        let mut records = self.records.write().await;
        if let Some(field) = records.iter().find_map(|r| r.conflicts_with(&registration)) {
            return Err(StoreError::Duplicate(field));
        }

        let record = RegistrationRecord::from_new(
            RegistrationId::new(records.len() as i64 + 1),
            registration,
            Timestamp::now(),
        );
        records.push(record.clone());
        Ok(record)
    }
}
