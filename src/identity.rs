//! Caller identity scalar shared by the task, bid, and stats contexts.
//!
//! The marketplace trusts caller-supplied identity strings; validation is
//! limited to rejecting blank values so that every stored record carries a
//! usable identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when an identity string is blank.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("identity email must not be empty")]
pub struct EmptyEmailError;

/// Non-empty email-shaped identity string.
///
/// The same value can act as a task owner and as a bidder; the two roles are
/// never reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated identity from a caller-supplied string.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyEmailError`] when the value is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyEmailError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(EmptyEmailError);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identity as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
