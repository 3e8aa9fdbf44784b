//! Identity types for the domain layer.
//!
//! These types describe a caller whose identity was established by the
//! external OAuth2 identity provider. They carry **no provider dependencies**;
//! any adapter implementing the `IdentityProvider` port can populate them.

mod caller;
mod credentials;
mod errors;

pub use caller::{CallerIdentity, ExternalId, TrustTier};
pub use credentials::{AccessToken, BearerCredential};
pub use errors::AuthError;
