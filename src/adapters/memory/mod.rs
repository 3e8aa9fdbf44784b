//! In-memory adapters for tests and local development.

mod registration_store;

pub use registration_store::InMemoryRegistrationStore;
