//! Email address validation
//!
//! Emails identify users across the API (profile lookups, post authorship,
//! vote ownership), so they are normalized to lowercase on construction.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for an email address (RFC 5321 path limit)
const MAX_EMAIL_LEN: usize = 254;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// Validated, lowercased email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Create a new email address.
    ///
    /// # Rules
    /// - Non-empty after trimming
    /// - Max 254 characters
    /// - Shape `local@domain.tld`, no whitespace
    ///
    /// # Example
    /// ```
    /// use forumfusion_server::models::Email;
    ///
    /// assert_eq!(Email::new(" Ann@Example.com ").unwrap().as_str(), "ann@example.com");
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }

        if trimmed.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }

        if !EMAIL_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like name@domain.tld",
            });
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_emails() {
        assert!(Email::new("a@b.co").is_ok());
        assert!(Email::new("first.last+tag@sub.example.org").is_ok());
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        let email = Email::new("  Someone@Example.COM\n").unwrap();
        assert_eq!(email.as_str(), "someone@example.com");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            Email::new("   ").unwrap_err(),
            ValidationError::Empty { .. }
        ));
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["plain", "no-at.example.com", "a@b", "a b@c.com", "@example.com"] {
            assert!(
                matches!(Email::new(bad).unwrap_err(), ValidationError::InvalidFormat { .. }),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn max_length() {
        let local = "a".repeat(MAX_EMAIL_LEN - "@x.io".len());
        assert!(Email::new(&format!("{local}@x.io")).is_ok());

        let local = "a".repeat(MAX_EMAIL_LEN);
        let err = Email::new(&format!("{local}@x.io")).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 254, .. }));
    }
}
