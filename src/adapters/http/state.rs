//! Shared state for the HTTP API.

use std::sync::Arc;

use crate::application::handlers::{CompleteSignInHandler, RegisterAccountHandler};
use crate::domain::identity::TrustTier;
use crate::domain::registration::InputPolicy;
use crate::ports::{DirectoryProvisioner, IdentityProvider, RegistrationStore};

/// Application state containing every dependency a handler needs.
///
/// Cloned per request; the ports are `Arc`-wrapped so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub directory: Arc<dyn DirectoryProvisioner>,
    pub store: Arc<dyn RegistrationStore>,
    pub policy: InputPolicy,
    pub min_trust_tier: TrustTier,
    /// Redirect URI registered with the identity provider
    pub redirect_uri: String,
}

impl AppState {
    pub fn complete_sign_in_handler(&self) -> CompleteSignInHandler {
        CompleteSignInHandler::new(self.identity_provider.clone(), self.redirect_uri.clone())
    }

    pub fn register_account_handler(&self) -> RegisterAccountHandler {
        RegisterAccountHandler::new(
            self.store.clone(),
            self.directory.clone(),
            self.policy.clone(),
            self.min_trust_tier,
        )
    }
}
