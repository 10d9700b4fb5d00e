//! Identity Collaborator
//!
//! User and channel identifiers are opaque to the registry. An
//! [`IdentityStore`] decides whether raw input is well-formed and turns it
//! into an [`Identifier`]; nothing else in the crate looks at their shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::error::{Result, SubscriptionError};

pub mod object_id;
pub mod pattern;

pub use object_id::ObjectIdIdentityStore;
pub use pattern::PatternIdentityStore;

/// Opaque, comparable user or channel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap a value without validation. Untrusted input goes through an
    /// [`IdentityStore`] instead.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validates identifiers on behalf of the registry.
pub trait IdentityStore: Send + Sync {
    /// Canonical identifier for `raw`, or `None` if it is not well-formed.
    fn parse(&self, raw: &str) -> Option<Identifier>;

    /// Validate `raw` for the named field, failing with `InvalidIdentifier`.
    fn validate(&self, field: &'static str, raw: &str) -> Result<Identifier> {
        self.parse(raw)
            .ok_or_else(|| SubscriptionError::invalid_identifier(field, raw))
    }
}
