//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Maximum username length in characters (`VARCHAR(50)`).
pub const USERNAME_MAX: usize = 50;

/// Validation errors returned when building a [`Username`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The username was empty or only whitespace.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The username started or ended with whitespace.
    #[error("username must not start or end with whitespace")]
    SurroundingWhitespace,
    /// The username exceeded [`USERNAME_MAX`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
}

/// Login name chosen at registration.
///
/// ## Invariants
/// - No leading or trailing whitespace; the stored name is exactly what the
///   user typed.
/// - Non-empty and at most [`USERNAME_MAX`] characters.
/// - Compared case-sensitively; `Alice` and `alice` are different users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = username.as_ref();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.len() != raw.len() {
            return Err(UserValidationError::SurroundingWhitespace);
        }
        if raw.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(raw.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Public identity of a registered user.
///
/// Never carries the password digest; the digest only travels between the
/// identity service and the user repository inside [`super::StoredUser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    #[schema(value_type = String, example = "alice")]
    username: Username,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login name.
    pub fn username(&self) -> &Username {
        &self.username
    }
}
