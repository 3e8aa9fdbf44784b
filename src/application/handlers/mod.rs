//! Command handlers, grouped by domain module.

pub mod identity;
pub mod registration;

pub use identity::{CompleteSignInCommand, CompleteSignInHandler, CompleteSignInResult};
pub use registration::{RegisterAccountCommand, RegisterAccountHandler, RegisterAccountResult};
