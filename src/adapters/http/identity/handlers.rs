//! HTTP handlers for sign-in endpoints.

use axum::extract::{Json, Query, State};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::CompleteSignInCommand;

use super::dto::{CallbackQuery, SignInResponse, UserInfoResponse, UserResponse};

/// GET /api/oauth/callback?code=
///
/// Exchanges the authorization code and returns the token together with the
/// resolved caller.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<SignInResponse>, ApiError> {
    let cmd = CompleteSignInCommand {
        code: query.code.unwrap_or_default(),
    };
    let result = state.complete_sign_in_handler().handle(cmd).await?;

    Ok(Json(SignInResponse {
        token: result.token.expose().to_string(),
        token_type: result.token.token_type().to_string(),
        user: UserResponse::from(&result.caller),
    }))
}

/// GET /api/user/info
pub async fn user_info(RequireAuth(caller): RequireAuth) -> Json<UserInfoResponse> {
    Json(UserInfoResponse {
        user: UserResponse::from(&caller),
    })
}
