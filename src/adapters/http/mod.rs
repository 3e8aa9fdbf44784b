//! HTTP adapter - the axum REST API.
//!
//! Each feature has its own submodule with DTOs, handlers and routes;
//! `router` assembles them behind the shared middleware.

pub mod error;
pub mod identity;
pub mod middleware;
pub mod registration;
pub mod router;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use middleware::{auth_middleware, RequireAuth};
pub use router::{api_router, with_http_layers};
pub use state::AppState;
