//! HTTP handlers for registration endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::RegisterAccountCommand;
use crate::domain::registration::RegistrationRequest;

use super::dto::RegisterResponse;

/// POST /api/register
///
/// Runs the registration pipeline for the authenticated caller and returns
/// the generated directory password once.
pub async fn register(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    body: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable registration body");
        ApiError::bad_request(
            "VALIDATION_FAILED",
            "Body must be JSON with lastName, firstName, schoolEmail and backupEmail",
        )
    })?;

    let result = state
        .register_account_handler()
        .handle(RegisterAccountCommand { caller, request })
        .await?;

    Ok(Json(RegisterResponse::new(result.credential.expose())))
}
