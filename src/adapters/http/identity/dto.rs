//! HTTP DTOs for sign-in and caller lookup.

use serde::{Deserialize, Serialize};

use crate::domain::identity::CallerIdentity;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query string of the OAuth redirect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    /// Absent when the user denied consent or the redirect was tampered with.
    #[serde(default)]
    pub code: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Caller as exposed to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: String,
    pub trust_level: i32,
}

impl From<&CallerIdentity> for UserResponse {
    fn from(caller: &CallerIdentity) -> Self {
        Self {
            id: caller.external_id.as_str().to_string(),
            username: caller.username.clone(),
            email: caller.email.clone(),
            name: caller.display_name.clone(),
            trust_level: caller.trust_tier.level(),
        }
    }
}

/// Response of a completed OAuth callback.
///
/// The frontend stores `token` and sends it back as `<type> <token>`.
#[derive(Debug, Clone, Serialize)]
pub struct SignInResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserInfoResponse {
    pub user: UserResponse,
}
