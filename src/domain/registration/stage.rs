//! Registration pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Stage of a single registration attempt.
///
/// ```text
/// Authenticating → Validating → CheckingDuplicate → Provisioning → Persisting → Done
///        └──────────────┴──────────────┴──────────────┴──────────────┴──→ Aborted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStage {
    Authenticating,
    Validating,
    CheckingDuplicate,
    Provisioning,
    Persisting,
    Done,
    Aborted,
}

impl RegistrationStage {
    /// True once the directory account exists upstream.
    pub fn has_provisioned(&self) -> bool {
        matches!(self, RegistrationStage::Persisting | RegistrationStage::Done)
    }
}

impl StateMachine for RegistrationStage {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RegistrationStage::*;
        match self {
            Authenticating => vec![Validating, Aborted],
            Validating => vec![CheckingDuplicate, Aborted],
            CheckingDuplicate => vec![Provisioning, Aborted],
            Provisioning => vec![Persisting, Aborted],
            Persisting => vec![Done, Aborted],
            Done | Aborted => vec![],
        }
    }
}

impl fmt::Display for RegistrationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegistrationStage::Authenticating => "authenticating",
            RegistrationStage::Validating => "validating",
            RegistrationStage::CheckingDuplicate => "checking_duplicate",
            RegistrationStage::Provisioning => "provisioning",
            RegistrationStage::Persisting => "persisting",
            RegistrationStage::Done => "done",
            RegistrationStage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RegistrationStage::*;

    #[test]
    fn happy_path_is_linear() {
        let mut stage = Authenticating;
        for next in [Validating, CheckingDuplicate, Provisioning, Persisting, Done] {
            stage = stage.transition_to(next).unwrap();
        }
        assert_eq!(stage, Done);
        assert!(stage.is_terminal());
    }

    #[test]
    fn every_non_terminal_stage_can_abort() {
        for stage in [Authenticating, Validating, CheckingDuplicate, Provisioning, Persisting] {
            assert!(stage.can_transition_to(&Aborted), "{stage} should abort");
        }
    }

    #[test]
    fn stages_cannot_be_skipped() {
        assert!(Validating.transition_to(Provisioning).is_err());
        assert!(CheckingDuplicate.transition_to(Persisting).is_err());
        assert!(Authenticating.transition_to(Done).is_err());
    }

    #[test]
    fn terminal_stages_have_no_exits() {
        assert!(Done.is_terminal());
        assert!(Aborted.is_terminal());
        assert!(Done.transition_to(Aborted).is_err());
    }

    #[test]
    fn provisioned_only_after_provisioning() {
        assert!(!Provisioning.has_provisioned());
        assert!(Persisting.has_provisioned());
        assert!(Done.has_provisioned());
    }
}
