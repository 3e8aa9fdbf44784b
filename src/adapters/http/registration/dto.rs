//! HTTP DTOs for registration.
//!
//! The request body deserialises straight into the domain
//! `RegistrationRequest`, which already carries the API field names.

use serde::Serialize;

pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Registration successful";

/// Response of a completed registration.
///
/// `password` is the one-time directory credential. It is never stored and
/// cannot be retrieved again.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub password: String,
}

impl RegisterResponse {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            message: REGISTRATION_SUCCESS_MESSAGE,
            password: password.into(),
        }
    }
}
