//! Membership enums: badge tier and moderation role

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Membership tier. New users start at bronze; a paid upgrade grants gold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    #[default]
    Bronze,
    Gold,
}

impl Badge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Gold => "gold",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "bronze" => Ok(Self::Bronze),
            "gold" => Ok(Self::Gold),
            other => Err(ValidationError::InvalidVariant {
                field: "badge",
                value: other.to_owned(),
            }),
        }
    }
}

/// Moderation role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(ValidationError::InvalidVariant {
                field: "role",
                value: other.to_owned(),
            }),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}
