//! Free-text body validation (post descriptions, comments, announcements)

use super::ValidationError;

/// Maximum length for body text (64KB)
const MAX_BODY_LEN: usize = 65536;

/// Validated body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body(String);

impl Body {
    /// Create new body text.
    ///
    /// # Rules
    /// - Not empty or whitespace-only
    /// - Max 64KB (65536 bytes)
    pub fn new(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty { field });
        }
        if s.len() > MAX_BODY_LEN {
            return Err(ValidationError::TooLong {
                field,
                max: MAX_BODY_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
