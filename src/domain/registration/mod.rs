//! Registration domain: request validation, credential generation, the
//! durable record and the pipeline stages.

mod credential;
mod errors;
mod record;
mod request;
mod stage;
mod validation;

pub use credential::{
    generate_credential, generate_credential_with, GeneratedCredential, CREDENTIAL_LENGTH, DIGITS,
    LOWERCASE, SYMBOLS, UPPERCASE,
};
pub use errors::{RegistrationAbort, RegistrationError};
pub use record::{DuplicateField, NewRegistration, RegistrationRecord};
pub use request::{RegistrationField, RegistrationRequest};
pub use stage::RegistrationStage;
pub use validation::{
    validate_email_shape, validate_name, validate_safe, InputPolicy, InputViolation,
    ValidationRule, DEFAULT_INSTITUTIONAL_DOMAIN,
};
