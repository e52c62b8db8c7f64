//! Title validation for posts and announcements

use super::ValidationError;

/// Maximum length for titles
const MAX_TITLE_LEN: usize = 256;

/// Validated title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    /// Create a new title.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 256 characters
    ///
    /// # Example
    /// ```
    /// use forumfusion_server::models::Title;
    ///
    /// assert!(Title::new("Welcome to the forum").is_ok());
    /// assert!(Title::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_titles() {
        assert!(Title::new("My Post").is_ok());
        assert!(Title::new("a").is_ok());
    }

    #[test]
    fn rejects_whitespace_only() {
        assert!(matches!(
            Title::new(" \t ").unwrap_err(),
            ValidationError::Empty { .. }
        ));
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 256 multi-byte characters is still within the limit
        let title = "é".repeat(256);
        assert!(Title::new(&title).is_ok());

        let title = "é".repeat(257);
        let err = Title::new(&title).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 256, .. }));
    }

    #[test]
    fn trims_whitespace() {
        let title = Title::new("  hello  ").unwrap();
        assert_eq!(title.as_str(), "hello");
    }
}
