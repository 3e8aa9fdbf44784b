//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, validation errors, state machines)
//! - `identity` - Callers resolved by the external identity provider
//! - `registration` - Validation, credentials, records and pipeline stages

pub mod foundation;
pub mod identity;
pub mod registration;
