//! JSON error responses for the HTTP API.
//!
//! Every failure leaves the service as `{ "error": <message>, "code": <CODE> }`.
//! Upstream statuses and bodies stay inside the domain errors and are logged,
//! never serialised.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::identity::AuthError;
use crate::domain::registration::{RegistrationAbort, RegistrationError};

/// Body of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// An error ready to be turned into an HTTP response.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::MissingCredentials
            | AuthError::MalformedCredentials
            | AuthError::InvalidToken => ApiError::unauthorized(err.to_string()),
            AuthError::MissingAuthorizationCode => {
                ApiError::bad_request("MISSING_AUTHORIZATION_CODE", err.to_string())
            }
            AuthError::Upstream { status, body } => {
                tracing::error!(
                    upstream_status = ?status,
                    upstream_body = %body,
                    "Identity provider call failed"
                );
                ApiError::new(StatusCode::BAD_GATEWAY, "UPSTREAM_AUTH_ERROR", err.to_string())
            }
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Unauthorized(auth) => ApiError::from(auth),
            RegistrationError::InsufficientTrust { .. } => ApiError::new(
                StatusCode::FORBIDDEN,
                "INSUFFICIENT_TRUST",
                "Your account trust level is too low to register",
            ),
            RegistrationError::Validation(violation) => {
                ApiError::bad_request("VALIDATION_FAILED", violation.rule.message())
            }
            RegistrationError::Duplicate(_) => {
                ApiError::new(StatusCode::CONFLICT, "ALREADY_REGISTERED", "User already registered")
            }
            e @ RegistrationError::UpstreamAuth { .. } => {
                ApiError::new(StatusCode::BAD_GATEWAY, "UPSTREAM_AUTH_ERROR", e.to_string())
            }
            e @ RegistrationError::Provisioning { .. } => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "PROVISIONING_FAILED",
                e.to_string(),
            ),
            e @ RegistrationError::Persistence { .. } => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "REGISTRATION_NOT_RECORDED",
                e.to_string(),
            ),
            RegistrationError::Internal(_) => ApiError::internal(),
        }
    }
}

impl From<RegistrationAbort> for ApiError {
    fn from(abort: RegistrationAbort) -> Self {
        ApiError::from(abort.reason)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}
