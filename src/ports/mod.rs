//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `IdentityProvider` - OAuth2 code exchange and caller resolution
//! - `DirectoryProvisioner` - Institutional account creation
//! - `RegistrationStore` - Durable registrations with unique constraints

mod directory_provisioner;
mod identity_provider;
mod registration_store;

pub use directory_provisioner::{DirectoryAccount, DirectoryError, DirectoryProvisioner};
pub use identity_provider::IdentityProvider;
pub use registration_store::{RegistrationStore, StoreError};
