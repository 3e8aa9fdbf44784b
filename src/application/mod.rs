//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    CompleteSignInCommand, CompleteSignInHandler, CompleteSignInResult, RegisterAccountCommand,
    RegisterAccountHandler, RegisterAccountResult,
};
