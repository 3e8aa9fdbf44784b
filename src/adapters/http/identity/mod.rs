//! HTTP adapter for OAuth sign-in and caller lookup.

mod dto;
mod handlers;
mod routes;

pub use dto::{CallbackQuery, SignInResponse, UserInfoResponse, UserResponse};
pub use handlers::{oauth_callback, user_info};
pub use routes::{sign_in_routes, user_routes};
