//! Email value object.
//!
//! An `Email` can only be constructed from a syntactically valid address,
//! so every instance in the system is already normalized.

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::errors::{AppError, AppResult};

/// Validated, normalized email address.
///
/// Normalization trims surrounding whitespace and lowercases the domain part;
/// the local part is preserved as given. Equality and hashing use the
/// normalized form. Deliverability is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Parse and normalize a raw address.
    pub fn new(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if !trimmed.validate_email() {
            return Err(AppError::validation(format!(
                "Invalid email address: {}",
                raw
            )));
        }

        // validate_email guarantees exactly one '@' with a non-empty domain
        let (local, domain) = trimmed
            .rsplit_once('@')
            .ok_or_else(|| AppError::validation(format!("Invalid email address: {}", raw)))?;

        Ok(Self(format!("{}@{}", local, domain.to_lowercase())))
    }

    /// The normalized address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_domain_casing() {
        let email = Email::new("Alice@Example.COM").unwrap();
        assert_eq!(email.as_str(), "Alice@example.com");
    }

    #[test]
    fn trims_whitespace() {
        let email = Email::new("  bob@example.com ").unwrap();
        assert_eq!(email.as_str(), "bob@example.com");
    }

    #[test]
    fn normalization_is_idempotent() {
        let first = Email::new("Carol@EXAMPLE.org").unwrap();
        let second = Email::new(first.as_str()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_invalid_addresses() {
        for raw in ["", "no-at-sign", "missing@", "@missing-local", "a b@example.com"] {
            let result = Email::new(raw);
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "expected validation failure for {:?}",
                raw
            );
        }
    }

    #[test]
    fn equality_uses_normalized_form() {
        let a = Email::new("dave@Example.com").unwrap();
        let b = Email::new("dave@example.COM").unwrap();
        assert_eq!(a, b);
    }
}
