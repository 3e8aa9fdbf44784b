//! PostgreSQL adapters - Database implementations for store ports.
//!
//! - `PostgresRegistrationStore` - Registrations with unique constraints

mod registration_store;

pub use registration_store::PostgresRegistrationStore;
