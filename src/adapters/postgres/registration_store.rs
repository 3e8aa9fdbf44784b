//! PostgreSQL implementation of RegistrationStore.
//!
//! Uniqueness is enforced by the `user_registrations` unique constraints;
//! violations are classified by constraint name. Every value is bound as a
//! query parameter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{RegistrationId, Timestamp};
use crate::domain::identity::TrustTier;
use crate::domain::registration::{DuplicateField, NewRegistration, RegistrationRecord};
use crate::ports::{RegistrationStore, StoreError};

const USERNAME_CONSTRAINT: &str = "user_registrations_external_username_key";
const EMAIL_CONSTRAINT: &str = "user_registrations_institutional_email_key";

/// PostgreSQL implementation of the RegistrationStore port.
pub struct PostgresRegistrationStore {
    pool: PgPool,
}

impl PostgresRegistrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a registration.
#[derive(Debug, sqlx::FromRow)]
struct RegistrationRow {
    id: i64,
    external_username: String,
    external_trust_tier: i32,
    last_name: String,
    first_name: String,
    institutional_email: String,
    recovery_email: String,
    created_at: DateTime<Utc>,
}

impl From<RegistrationRow> for RegistrationRecord {
    fn from(row: RegistrationRow) -> Self {
        RegistrationRecord {
            id: RegistrationId::new(row.id),
            external_username: row.external_username,
            external_trust_tier: TrustTier::new(row.external_trust_tier),
            last_name: row.last_name,
            first_name: row.first_name,
            institutional_email: row.institutional_email,
            recovery_email: row.recovery_email,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

/// Maps a unique-constraint name to the column it guards.
fn duplicate_field_for(constraint: &str) -> Option<DuplicateField> {
    match constraint {
        USERNAME_CONSTRAINT => Some(DuplicateField::ExternalUsername),
        EMAIL_CONSTRAINT => Some(DuplicateField::InstitutionalEmail),
        _ => None,
    }
}

fn unavailable(action: &str, e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl RegistrationStore for PostgresRegistrationStore {
    async fn exists(&self, external_username: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM user_registrations WHERE external_username = $1)",
        )
        .bind(external_username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unavailable("look up username", e))
    }

    async fn email_taken(&self, institutional_email: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM user_registrations WHERE institutional_email = $1)",
        )
        .bind(institutional_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unavailable("look up institutional email", e))
    }

    async fn insert(&self, registration: NewRegistration) -> Result<RegistrationRecord, StoreError> {
        let row: RegistrationRow = sqlx::query_as(
            r#"
            INSERT INTO user_registrations (
                external_username, external_trust_tier, last_name, first_name,
                institutional_email, recovery_email
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, external_username, external_trust_tier, last_name, first_name,
                      institutional_email, recovery_email, created_at
            "#,
        )
        .bind(&registration.external_username)
        .bind(registration.external_trust_tier.level())
        .bind(&registration.last_name)
        .bind(&registration.first_name)
        .bind(&registration.institutional_email)
        .bind(&registration.recovery_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if let Some(field) = db_err.constraint().and_then(duplicate_field_for) {
                    return StoreError::Duplicate(field);
                }
            }
            unavailable("insert registration", e)
        })?;

        Ok(row.into())
    }
}
