//! Caller-supplied registration form.

use serde::Deserialize;
use std::fmt;

/// Fields of a registration request, named as the API exposes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationField {
    LastName,
    FirstName,
    InstitutionalEmail,
    RecoveryEmail,
}

impl RegistrationField {
    pub const ALL: [RegistrationField; 4] = [
        RegistrationField::LastName,
        RegistrationField::FirstName,
        RegistrationField::InstitutionalEmail,
        RegistrationField::RecoveryEmail,
    ];

    /// Name used in the JSON body.
    pub fn api_name(&self) -> &'static str {
        match self {
            RegistrationField::LastName => "lastName",
            RegistrationField::FirstName => "firstName",
            RegistrationField::InstitutionalEmail => "schoolEmail",
            RegistrationField::RecoveryEmail => "backupEmail",
        }
    }
}

impl fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// Registration form as submitted by the caller.
///
/// Ephemeral; the validated values are copied into a `NewRegistration`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistrationRequest {
    #[serde(rename = "lastName")]
    pub last_name: String,

    #[serde(rename = "firstName")]
    pub first_name: String,

    #[serde(rename = "schoolEmail")]
    pub institutional_email: String,

    #[serde(rename = "backupEmail")]
    pub recovery_email: String,
}

impl RegistrationRequest {
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        institutional_email: impl Into<String>,
        recovery_email: impl Into<String>,
    ) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            institutional_email: institutional_email.into(),
            recovery_email: recovery_email.into(),
        }
    }

    /// Trims names and trims + lower-cases both addresses.
    ///
    /// The normalized values are the ones validated, provisioned upstream and
    /// persisted, so all three agree.
    pub fn normalized(self) -> Self {
        Self {
            last_name: self.last_name.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            institutional_email: self.institutional_email.trim().to_lowercase(),
            recovery_email: self.recovery_email.trim().to_lowercase(),
        }
    }

    pub fn value(&self, field: RegistrationField) -> &str {
        match field {
            RegistrationField::LastName => &self.last_name,
            RegistrationField::FirstName => &self.first_name,
            RegistrationField::InstitutionalEmail => &self.institutional_email,
            RegistrationField::RecoveryEmail => &self.recovery_email,
        }
    }
}
