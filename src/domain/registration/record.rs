//! Durable registration records.

use std::fmt;

use crate::domain::foundation::{RegistrationId, Timestamp};
use crate::domain::identity::{CallerIdentity, TrustTier};

use super::RegistrationRequest;

/// Column guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuplicateField {
    ExternalUsername,
    InstitutionalEmail,
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateField::ExternalUsername => f.write_str("external_username"),
            DuplicateField::InstitutionalEmail => f.write_str("institutional_email"),
        }
    }
}

/// Registration ready to insert. Has no password field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub external_username: String,
    pub external_trust_tier: TrustTier,
    pub last_name: String,
    pub first_name: String,
    pub institutional_email: String,
    pub recovery_email: String,
}

impl NewRegistration {
    /// Combines the caller snapshot with a validated request.
    pub fn from_validated(caller: &CallerIdentity, request: &RegistrationRequest) -> Self {
        Self {
            external_username: caller.username.clone(),
            external_trust_tier: caller.trust_tier,
            last_name: request.last_name.clone(),
            first_name: request.first_name.clone(),
            institutional_email: request.institutional_email.clone(),
            recovery_email: request.recovery_email.clone(),
        }
    }
}

/// Persisted registration. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub id: RegistrationId,
    pub external_username: String,
    pub external_trust_tier: TrustTier,
    pub last_name: String,
    pub first_name: String,
    pub institutional_email: String,
    pub recovery_email: String,
    pub created_at: Timestamp,
}

impl RegistrationRecord {
    pub fn from_new(id: RegistrationId, new: NewRegistration, created_at: Timestamp) -> Self {
        Self {
            id,
            external_username: new.external_username,
            external_trust_tier: new.external_trust_tier,
            last_name: new.last_name,
            first_name: new.first_name,
            institutional_email: new.institutional_email,
            recovery_email: new.recovery_email,
            created_at,
        }
    }

    /// Which unique column `candidate` would collide on, if any.
    pub fn conflicts_with(&self, candidate: &NewRegistration) -> Option<DuplicateField> {
        if self.external_username == candidate.external_username {
            Some(DuplicateField::ExternalUsername)
        } else if self.institutional_email == candidate.institutional_email {
            Some(DuplicateField::InstitutionalEmail)
        } else {
            None
        }
    }
}
