//! Identity provider adapters.
//!
//! - `OAuthIdentityProvider` - production OAuth2 provider over HTTP
//! - `MockIdentityProvider` - in-process provider for tests

mod mock;
mod oauth;

pub use mock::MockIdentityProvider;
pub use oauth::{OAuthIdentityProvider, OAuthProviderConfig};
