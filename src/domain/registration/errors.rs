//! Registration error taxonomy.

use thiserror::Error;

use crate::domain::foundation::Timestamp;
use crate::domain::identity::{AuthError, TrustTier};

use super::{DuplicateField, InputViolation, RegistrationStage};

/// Why a registration attempt stopped.
///
/// Upstream details (`status`, `detail`) are for logs. `Display` omits them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("Authentication required")]
    Unauthorized(#[source] AuthError),

    #[error("Trust tier {actual} is below the required {required}")]
    InsufficientTrust {
        actual: TrustTier,
        required: TrustTier,
    },

    #[error("Invalid input: {0}")]
    Validation(#[from] InputViolation),

    #[error("Already registered ({0})")]
    Duplicate(DuplicateField),

    #[error("Upstream authorization failed")]
    UpstreamAuth { status: Option<u16>, detail: String },

    #[error("Directory account creation failed")]
    Provisioning { status: Option<u16>, detail: String },

    /// The directory account exists but no local record was written.
    #[error("Registration could not be recorded")]
    Persistence {
        institutional_email: String,
        provisioned_at: Timestamp,
        detail: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistrationError {
    /// True when the caller can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RegistrationError::Unauthorized(_)
                | RegistrationError::InsufficientTrust { .. }
                | RegistrationError::Validation(_)
                | RegistrationError::Duplicate(_)
        )
    }
}

/// A registration attempt that ended before `Done`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("registration aborted while {stage}: {reason}")]
pub struct RegistrationAbort {
    pub stage: RegistrationStage,
    #[source]
    pub reason: RegistrationError,
}

impl RegistrationAbort {
    pub fn new(stage: RegistrationStage, reason: RegistrationError) -> Self {
        Self { stage, reason }
    }

    /// True if a directory account may exist without a local record.
    pub fn is_partial_failure(&self) -> bool {
        self.stage.has_provisioned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registration::{RegistrationField, ValidationRule};

    #[test]
    fn upstream_display_omits_detail() {
        let err = RegistrationError::Provisioning {
            status: Some(409),
            detail: "{\"error\":\"entity already exists\"}".to_string(),
        };
        assert_eq!(err.to_string(), "Directory account creation failed");
    }

    #[test]
    fn client_errors_are_classified() {
        let violation = InputViolation::new(RegistrationField::FirstName, ValidationRule::NameFormat);
        assert!(RegistrationError::from(violation).is_client_error());
        assert!(RegistrationError::Duplicate(DuplicateField::ExternalUsername).is_client_error());
        assert!(!RegistrationError::Internal("boom".into()).is_client_error());
    }

    #[test]
    fn abort_after_provisioning_is_partial_failure() {
        let abort = RegistrationAbort::new(
            RegistrationStage::Persisting,
            RegistrationError::Internal("db down".into()),
        );
        assert!(abort.is_partial_failure());

        let abort = RegistrationAbort::new(
            RegistrationStage::Provisioning,
            RegistrationError::Internal("directory down".into()),
        );
        assert!(!abort.is_partial_failure());
    }
}
