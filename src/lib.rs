//! Registration Portal - identity-gated account registration
//!
//! Callers sign in through an OAuth2 identity provider, then request an
//! institutional directory account. Each request passes a trust gate, input
//! validation and a duplicate check before the account is provisioned and
//! recorded.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod server;
pub mod telemetry;
