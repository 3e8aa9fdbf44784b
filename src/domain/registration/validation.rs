//! Input validation for registration requests.
//!
//! Pure and synchronous. The denylist rejects obviously hostile input early;
//! it is not a security boundary. Persistence always uses bound parameters.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

use super::request::{RegistrationField, RegistrationRequest};

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 100;

/// Default institutional domain for school addresses.
pub const DEFAULT_INSTITUTIONAL_DOMAIN: &str = "polyu.edu.rs";

/// Characters never accepted in any field.
pub const DENIED_CHARACTERS: &[char] = &['\'', '"', ';', '\\', '=', '&', '|', '<', '>'];

/// Keywords rejected when they appear as a whole word, case-insensitively.
pub const DENIED_KEYWORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "DROP", "UNION", "WHERE", "HAVING", "EXEC", "EXECUTE",
    "DECLARE", "CAST", "CONVERT",
];

/// Two-word keywords, matched as adjacent words.
pub const DENIED_KEYWORD_PAIRS: &[(&str, &str)] = &[("GROUP", "BY"), ("ORDER", "BY")];

/// Comment markers rejected anywhere in a value.
pub const DENIED_SEQUENCES: &[&str] = &["--", "/*", "*/"];

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9 \-']+$").expect("name pattern is valid"));

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is valid")
});

/// Rule a registration field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    UnsafeContent,
    NameFormat,
    EmailFormat,
    InstitutionalDomain,
}

impl ValidationRule {
    /// Client-facing category message.
    pub fn message(&self) -> &'static str {
        match self {
            ValidationRule::UnsafeContent => "Input contains disallowed characters",
            ValidationRule::NameFormat => "Name format is invalid",
            ValidationRule::EmailFormat => "Email format is invalid",
            ValidationRule::InstitutionalDomain => {
                "School email must use the institutional domain"
            }
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationRule::UnsafeContent => "unsafe_content",
            ValidationRule::NameFormat => "name_format",
            ValidationRule::EmailFormat => "email_format",
            ValidationRule::InstitutionalDomain => "institutional_domain",
        };
        f.write_str(name)
    }
}

/// A field that failed validation and the rule it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field} failed {rule}")]
pub struct InputViolation {
    pub field: RegistrationField,
    pub rule: ValidationRule,
}

impl InputViolation {
    pub fn new(field: RegistrationField, rule: ValidationRule) -> Self {
        Self { field, rule }
    }
}

/// True iff `s` is 2..=50 characters of letters, digits, space, hyphen or
/// apostrophe.
///
/// The apostrophe is also on [`DENIED_CHARACTERS`], and
/// [`InputPolicy::validate`] runs the denylist first, so a full request with
/// an apostrophe name is rejected as unsafe content.
pub fn validate_name(s: &str) -> bool {
    let len = s.chars().count();
    (NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) && NAME_PATTERN.is_match(s)
}

/// True iff `s` is at most 100 characters and looks like `local@domain.tld`.
pub fn validate_email_shape(s: &str) -> bool {
    s.chars().count() <= EMAIL_MAX_LEN && EMAIL_PATTERN.is_match(s)
}

/// True iff `s` has no denied character, comment marker or SQL keyword.
///
/// Keywords match whole words only, so `Castillo` and
/// `exec.office@example.com` pass while `drop table` does not.
pub fn validate_safe(s: &str) -> bool {
    if s.chars().any(|c| DENIED_CHARACTERS.contains(&c)) {
        return false;
    }
    if DENIED_SEQUENCES.iter().any(|seq| s.contains(seq)) {
        return false;
    }

    let words: Vec<String> = s.split_whitespace().map(str::to_uppercase).collect();
    if words
        .iter()
        .any(|word| DENIED_KEYWORDS.contains(&word.as_str()))
    {
        return false;
    }

    !words.windows(2).any(|pair| {
        DENIED_KEYWORD_PAIRS
            .iter()
            .any(|(first, second)| pair[0] == *first && pair[1] == *second)
    })
}

/// Validation policy for registration requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPolicy {
    institutional_domain: String,
}

impl InputPolicy {
    /// Creates a policy for the given domain. A leading `@` or `.` is ignored.
    pub fn new(institutional_domain: impl Into<String>) -> Self {
        let domain: String = institutional_domain.into();
        let domain = domain
            .trim()
            .trim_start_matches(['@', '.'])
            .to_ascii_lowercase();
        Self {
            institutional_domain: domain,
        }
    }

    pub fn institutional_domain(&self) -> &str {
        &self.institutional_domain
    }

    /// Case-insensitive suffix match on a label boundary.
    ///
    /// `john@polyu.edu.rs` and `john@students.polyu.edu.rs` match;
    /// `john@notpolyu.edu.rs` does not.
    pub fn has_institutional_suffix(&self, email: &str) -> bool {
        if self.institutional_domain.is_empty() {
            return false;
        }

        let email = email.to_ascii_lowercase();
        let Some(head) = email.strip_suffix(self.institutional_domain.as_str()) else {
            return false;
        };
        matches!(head.chars().last(), Some('@') | Some('.'))
    }

    pub fn is_safe(&self, s: &str) -> bool {
        validate_safe(s)
    }

    /// Normalizes and validates a request.
    ///
    /// Checks run in a fixed order: denylist on all four fields, then names,
    /// then both email shapes, then the institutional suffix. The first
    /// failure is returned.
    pub fn validate(
        &self,
        request: RegistrationRequest,
    ) -> Result<RegistrationRequest, InputViolation> {
        let request = request.normalized();

        for field in RegistrationField::ALL {
            if !self.is_safe(request.value(field)) {
                return Err(InputViolation::new(field, ValidationRule::UnsafeContent));
            }
        }

        for field in [RegistrationField::LastName, RegistrationField::FirstName] {
            if !validate_name(request.value(field)) {
                return Err(InputViolation::new(field, ValidationRule::NameFormat));
            }
        }

        for field in [
            RegistrationField::InstitutionalEmail,
            RegistrationField::RecoveryEmail,
        ] {
            if !validate_email_shape(request.value(field)) {
                return Err(InputViolation::new(field, ValidationRule::EmailFormat));
            }
        }

        if !self.has_institutional_suffix(&request.institutional_email) {
            return Err(InputViolation::new(
                RegistrationField::InstitutionalEmail,
                ValidationRule::InstitutionalDomain,
            ));
        }

        Ok(request)
    }
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_INSTITUTIONAL_DOMAIN)
    }
}
