//! Error model and small validated types shared by every Caseline crate.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias returned by fallible Caseline operations.
pub type AppResult<T> = Result<T, AppError>;

/// String guaranteed to contain a non-whitespace character.
///
/// Used for role and template names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Validates `value`, rejecting blank input.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Borrows the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Failure categories surfaced by services and mapped to HTTP statuses by
/// the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input, such as a token outside the permission catalog.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown user, role or template.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate account id or username.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing session or rejected credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Signed in, but an access gate or permission check failed.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Adapter or transport failure.
    #[error("internal error: {0}")]
    Internal(String),
}
