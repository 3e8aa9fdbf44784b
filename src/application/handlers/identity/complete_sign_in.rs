//! CompleteSignInHandler - Finishes the OAuth2 authorization-code flow.

use std::sync::Arc;

use crate::domain::identity::{AccessToken, AuthError, BearerCredential, CallerIdentity};
use crate::ports::IdentityProvider;

/// Command carrying the authorization code from the provider redirect.
#[derive(Debug, Clone)]
pub struct CompleteSignInCommand {
    pub code: String,
}

/// Access token and the caller it belongs to.
#[derive(Debug, Clone)]
pub struct CompleteSignInResult {
    pub token: AccessToken,
    pub caller: CallerIdentity,
}

/// Exchanges the code, then resolves the caller with the new token.
pub struct CompleteSignInHandler {
    provider: Arc<dyn IdentityProvider>,
    redirect_uri: String,
}

impl CompleteSignInHandler {
    pub fn new(provider: Arc<dyn IdentityProvider>, redirect_uri: impl Into<String>) -> Self {
        Self {
            provider,
            redirect_uri: redirect_uri.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CompleteSignInCommand,
    ) -> Result<CompleteSignInResult, AuthError> {
        let code = cmd.code.trim();
        if code.is_empty() {
            return Err(AuthError::MissingAuthorizationCode);
        }

        let token = self.provider.exchange_code(code, &self.redirect_uri).await?;
        let caller = self
            .provider
            .resolve_identity(&BearerCredential::from(&token))
            .await?;

        tracing::info!(
            external_username = %caller.username,
            trust_tier = %caller.trust_tier,
            "Sign-in completed"
        );

        Ok(CompleteSignInResult { token, caller })
    }
}
