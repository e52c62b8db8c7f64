//! Tag name validation

use super::ValidationError;

/// Maximum length for tag names
const MAX_TAG_LEN: usize = 64;

/// Validated tag name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    /// Create a new tag name. Whitespace is trimmed, case is preserved.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "tag name" });
        }

        if trimmed.chars().count() > MAX_TAG_LEN {
            return Err(ValidationError::TooLong {
                field: "tag name",
                max: MAX_TAG_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_keeps_case() {
        assert_eq!(TagName::new("  Rust ").unwrap().as_str(), "Rust");
    }

    #[test]
    fn rejects_empty_and_long() {
        assert!(matches!(
            TagName::new("").unwrap_err(),
            ValidationError::Empty { .. }
        ));
        let err = TagName::new(&"t".repeat(65)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 64, .. }));
    }
}
