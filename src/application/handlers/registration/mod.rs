//! Registration command handlers.

mod register_account;

pub use register_account::{RegisterAccountCommand, RegisterAccountHandler, RegisterAccountResult};
