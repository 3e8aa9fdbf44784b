//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `identity` - OAuth2 identity provider (and mock)
//! - `directory` - Workspace directory provisioning (and mock)
//! - `postgres` - Registration store on PostgreSQL
//! - `memory` - In-memory registration store
//! - `http` - axum REST API

pub mod directory;
pub mod http;
pub mod identity;
pub mod memory;
pub mod postgres;
