//! Caller identity.
//!
//! The core never authenticates anyone: the transport layer hands it an
//! already-authenticated identity and the core only compares identities
//! against the authority and the voter registry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// An authenticated caller identity (voter or authority).
///
/// Ordered so that registries keyed by identity serialize deterministically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Create an identity from a raw string.
    ///
    /// # Panics
    /// Panics if the string is empty or whitespace-only. Use [`Identity::parse`]
    /// for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(!s.trim().is_empty(), "identity must not be empty");
        Self(s)
    }

    /// Parse an identity from untrusted input.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        if raw.trim().is_empty() {
            return Err(TypesError::EmptyIdentity);
        }
        Ok(Self(raw.to_string()))
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Identity {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = TypesError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        if raw.trim().is_empty() {
            return Err(TypesError::EmptyIdentity);
        }
        Ok(Self(raw))
    }
}

impl From<Identity> for String {
    fn from(id: Identity) -> Self {
        id.0
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
