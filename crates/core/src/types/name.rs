//! User display name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`UserName`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UserNameError {
    /// The input is empty after trimming.
    #[error("name cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A user's display name.
///
/// Names identify users uniquely, so the raw input is normalized before it
/// is compared or stored: surrounding whitespace is trimmed and runs of
/// inner whitespace collapse to a single space.
///
/// ## Constraints
///
/// - Non-empty after normalization
/// - At most 100 characters after normalization
///
/// ## Examples
///
/// ```
/// use chargeboard_core::UserName;
///
/// let name = UserName::parse("  Ada   Lovelace ").unwrap();
/// assert_eq!(name.as_str(), "Ada Lovelace");
///
/// assert!(UserName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Maximum length of a normalized name.
    pub const MAX_LENGTH: usize = 100;

    /// Parse a `UserName` from raw input, normalizing whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the normalized input is empty or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, UserNameError> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized.is_empty() {
            return Err(UserNameError::Empty);
        }

        if normalized.chars().count() > Self::MAX_LENGTH {
            return Err(UserNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(normalized))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `UserName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
