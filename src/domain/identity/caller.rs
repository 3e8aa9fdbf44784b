//! The authenticated caller and its trust tier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by the identity provider.
///
/// Providers hand this out either as a number or a string; it is kept as
/// text so both shapes compare the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalId(String);

impl ExternalId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider-assigned trust rank. Higher is more trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrustTier(i32);

impl TrustTier {
    /// Lowest tier allowed to register unless configured otherwise.
    pub const REGISTRATION_MINIMUM: TrustTier = TrustTier(2);

    pub const fn new(level: i32) -> Self {
        Self(level)
    }

    pub fn level(&self) -> i32 {
        self.0
    }

    /// True when this tier is at least `required`.
    pub fn meets(&self, required: TrustTier) -> bool {
        self.0 >= required.0
    }
}

impl Default for TrustTier {
    fn default() -> Self {
        Self::REGISTRATION_MINIMUM
    }
}

impl fmt::Display for TrustTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller identity resolved from a provider access token.
///
/// Request-scoped: built for each authenticated request and dropped with it.
/// Only `username` and `trust_tier` outlive the request, copied into the
/// registration record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Unique per real-world person.
    pub external_id: ExternalId,

    /// Provider-chosen handle; the uniqueness key for registrations.
    pub username: String,

    pub email: String,

    pub display_name: String,

    pub trust_tier: TrustTier,
}

impl CallerIdentity {
    pub fn new(
        external_id: ExternalId,
        username: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
        trust_tier: TrustTier,
    ) -> Self {
        Self {
            external_id,
            username: username.into(),
            email: email.into(),
            display_name: display_name.into(),
            trust_tier,
        }
    }

    /// Whether this caller may continue past authentication.
    pub fn may_register(&self, required: TrustTier) -> bool {
        self.trust_tier.meets(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(tier: i32) -> CallerIdentity {
        CallerIdentity::new(
            ExternalId::new("1024"),
            "johndoe",
            "john@example.com",
            "John Doe",
            TrustTier::new(tier),
        )
    }

    #[test]
    fn trust_tier_meets_equal_and_higher() {
        let required = TrustTier::REGISTRATION_MINIMUM;
        assert!(TrustTier::new(2).meets(required));
        assert!(TrustTier::new(4).meets(required));
        assert!(!TrustTier::new(1).meets(required));
        assert!(!TrustTier::new(0).meets(required));
    }

    #[test]
    fn caller_below_tier_two_may_not_register() {
        assert!(!caller(1).may_register(TrustTier::REGISTRATION_MINIMUM));
        assert!(caller(2).may_register(TrustTier::REGISTRATION_MINIMUM));
    }

    #[test]
    fn external_id_displays_raw_value() {
        assert_eq!(ExternalId::new("abc-1").to_string(), "abc-1");
    }
}
