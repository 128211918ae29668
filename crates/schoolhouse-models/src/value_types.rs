//! Validated domain primitives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::ValidateEmail;

/// Error type for value type parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueTypeError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
}

/// A validated, lower-cased email address.
///
/// Emails are unique per identity regardless of case, so the value is
/// normalized once at construction and compared byte-wise afterwards.
///
/// ```ignore
/// let email: Email = "Jane@School.com".parse().unwrap();
/// assert_eq!(email.as_str(), "jane@school.com");
/// assert!("not-an-email".parse::<Email>().is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, format = "email", example = "jane@school.com")]
pub struct Email(String);

impl Email {
    pub fn new(email: impl AsRef<str>) -> Result<Self, ValueTypeError> {
        let email = email.as_ref().trim().to_lowercase();

        if email.is_empty() {
            Err(ValueTypeError::InvalidEmail("email cannot be empty".into()))
        } else if email.validate_email() {
            Ok(Self(email))
        } else {
            Err(ValueTypeError::InvalidEmail(format!("'{email}' is not a valid email address")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Email {
    type Error = ValueTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> String {
        email.0
    }
}

impl PartialEq<str> for Email {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Email {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_lowercased_and_trimmed() {
        let email = Email::new("  Jane.Doe@School.COM ").unwrap();
        assert_eq!(email, "jane.doe@school.com");
    }

    #[test]
    fn test_invalid_emails_rejected() {
        assert!(Email::new("").is_err());
        assert!(Email::new("not-an-email").is_err());
        assert!("@school.com".parse::<Email>().is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let email: Email = serde_json::from_str("\"ADMIN@example.com\"").unwrap();
        assert_eq!(email.as_str(), "admin@example.com");

        let result: Result<Email, _> = serde_json::from_str("\"nope\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email = Email::new("a@b.com").unwrap();
        assert_eq!(serde_json::to_value(&email).unwrap(), serde_json::json!("a@b.com"));
    }
}
