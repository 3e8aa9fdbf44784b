//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned surrogate key of a registration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(i64);

impl RegistrationId {
    /// Wraps a key handed out by the store.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw key.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RegistrationId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_id_displays_raw_value() {
        assert_eq!(RegistrationId::new(42).to_string(), "42");
    }

    #[test]
    fn registration_id_serializes_transparently() {
        let json = serde_json::to_string(&RegistrationId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn registration_ids_order_by_value() {
        assert!(RegistrationId::new(1) < RegistrationId::from(2));
    }
}
