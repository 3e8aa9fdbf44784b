//! Directory provisioner adapters.
//!
//! - `WorkspaceDirectoryProvisioner` - workspace admin API over HTTP
//! - `MockDirectoryProvisioner` - in-process directory for tests

mod mock;
mod workspace;

pub use mock::MockDirectoryProvisioner;
pub use workspace::{
    WorkspaceDirectoryConfig, WorkspaceDirectoryProvisioner, DEFAULT_TOKEN_URL, DEFAULT_USERS_URL,
};
