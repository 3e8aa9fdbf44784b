//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that the identity
//! and registration modules build on.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::RegistrationId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
