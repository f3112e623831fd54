//! User identifiers and the identifier-generation seam.

use crate::{Interface, UserApiError, UserApiResult};
use serde::{Deserialize, Serialize};
use shaku::Component;
use std::fmt::{self, Display};
use uuid::Uuid;

/// A user's primary key: a string of at most [`UserId::MAX_LEN`] characters.
///
/// The identifier is assigned once by an [`IdGenerator`] and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Maximum length of the `users.id` column.
    pub const MAX_LEN: usize = 36;

    /// Parses a user ID, rejecting empty or over-long input.
    pub fn parse(s: impl Into<String>) -> UserApiResult<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(UserApiError::validation("User id must not be empty"));
        }
        let len = s.chars().count();
        if len > Self::MAX_LEN {
            return Err(UserApiError::validation(format!(
                "User id must be at most {} characters, got {}",
                Self::MAX_LEN,
                len
            )));
        }
        Ok(Self(s))
    }

    /// Interprets a caller-supplied key for a lookup.
    ///
    /// A key that cannot fit the `users.id` column names no stored user, so
    /// it resolves to `NotFound` instead of a validation failure.
    pub fn lookup(s: impl Into<String>) -> UserApiResult<Self> {
        let s = s.into();
        if s.is_empty() || s.chars().count() > Self::MAX_LEN {
            return Err(UserApiError::not_found("User", s));
        }
        Ok(Self(s))
    }

    /// Wraps a value read back from storage without re-validating it.
    #[must_use]
    pub fn new_unchecked(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserApiError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for UserId {
    type Error = UserApiError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Produces unique user identifiers.
///
/// Implementations must return identifiers of 1 to [`UserId::MAX_LEN`]
/// characters that never repeat.
pub trait IdGenerator: Interface + Send + Sync {
    /// Generates a fresh identifier.
    fn generate(&self) -> UserId;
}

/// Default generator: time-ordered UUIDv7 in 36-character hyphenated form.
#[derive(Component, Debug, Default, Clone, Copy)]
#[shaku(interface = IdGenerator)]
pub struct UuidV7Generator {}

impl UuidV7Generator {
    /// Creates a new generator.
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl IdGenerator for UuidV7Generator {
    fn generate(&self) -> UserId {
        UserId(Uuid::now_v7().hyphenated().to_string())
    }
}
