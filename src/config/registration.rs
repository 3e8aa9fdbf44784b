//! Registration policy configuration

use serde::Deserialize;

use crate::domain::identity::TrustTier;
use crate::domain::registration::{InputPolicy, DEFAULT_INSTITUTIONAL_DOMAIN};

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    /// Domain every school email must end with
    #[serde(default = "default_institutional_domain")]
    pub institutional_domain: String,

    /// Lowest provider trust tier allowed to register
    #[serde(default = "default_min_trust_tier")]
    pub min_trust_tier: i32,
}

impl RegistrationConfig {
    pub fn input_policy(&self) -> InputPolicy {
        InputPolicy::new(self.institutional_domain.clone())
    }

    pub fn min_trust_tier(&self) -> TrustTier {
        TrustTier::new(self.min_trust_tier)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let floor = TrustTier::REGISTRATION_MINIMUM.level();
        if self.min_trust_tier < floor {
            return Err(ValidationError::TrustTierBelowFloor {
                actual: self.min_trust_tier,
                floor,
            });
        }

        let domain = self.input_policy();
        let domain = domain.institutional_domain();
        let well_formed = domain.contains('.')
            && domain
                .split('.')
                .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
        if !well_formed {
            return Err(ValidationError::InvalidInstitutionalDomain(
                self.institutional_domain.clone(),
            ));
        }
        Ok(())
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            institutional_domain: default_institutional_domain(),
            min_trust_tier: default_min_trust_tier(),
        }
    }
}

fn default_institutional_domain() -> String {
    DEFAULT_INSTITUTIONAL_DOMAIN.to_string()
}

fn default_min_trust_tier() -> i32 {
    TrustTier::REGISTRATION_MINIMUM.level()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy_defaults() {
        let config = RegistrationConfig::default();
        assert_eq!(config.input_policy(), InputPolicy::default());
        assert_eq!(config.min_trust_tier(), TrustTier::new(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_domains_are_rejected() {
        for domain in ["", "localhost", "bad domain.rs", "a..rs"] {
            let config = RegistrationConfig {
                institutional_domain: domain.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{domain:?} should be rejected");
        }
    }

    #[test]
    fn trust_tier_below_registration_minimum_is_rejected() {
        for tier in [-1, 0, 1] {
            let config = RegistrationConfig {
                min_trust_tier: tier,
                ..Default::default()
            };
            assert_eq!(
                config.validate(),
                Err(ValidationError::TrustTierBelowFloor {
                    actual: tier,
                    floor: 2
                })
            );
        }
    }

    #[test]
    fn stricter_trust_tier_is_accepted() {
        let config = RegistrationConfig {
            min_trust_tier: 4,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.min_trust_tier(), TrustTier::new(4));
    }

    #[test]
    fn leading_at_sign_is_tolerated() {
        let config = RegistrationConfig {
            institutional_domain: "@example.edu".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.input_policy().institutional_domain(), "example.edu");
    }
}
