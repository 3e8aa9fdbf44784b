//! HTTP adapter for account registration.

mod dto;
mod handlers;
mod routes;

pub use dto::{RegisterResponse, REGISTRATION_SUCCESS_MESSAGE};
pub use handlers::register;
pub use routes::registration_routes;
