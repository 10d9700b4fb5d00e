//! Subscription Error Types

use thiserror::Error;

/// MongoDB server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The identity collaborator rejected an identifier.
    #[error("Invalid identifier for {field}: {value:?}")]
    InvalidIdentifier { field: &'static str, value: String },

    /// The edge store could not complete a read or write.
    #[error("Subscription store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// A uniqueness race on the pair was still unresolved after a retry.
    #[error("Subscription constraint violation for subscriber {subscriber} and channel {channel}")]
    ConstraintViolation { subscriber: String, channel: String },

    /// A caller-context operation was invoked without a subscriber identity.
    #[error("Caller is not authenticated")]
    Unauthenticated,
}

impl SubscriptionError {
    pub fn invalid_identifier(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            field,
            value: value.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn constraint_violation(subscriber: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            subscriber: subscriber.into(),
            channel: channel.into(),
        }
    }

    /// Stable machine-readable code for collaborators that map errors to responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            Self::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            Self::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            Self::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    /// Whether the caller can fix the request and try again.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidIdentifier { .. } | Self::Unauthenticated)
    }
}

impl From<mongodb::error::Error> for SubscriptionError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::store_unavailable(err.to_string())
    }
}

/// True when a MongoDB write failed on a unique index.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}

pub type Result<T> = std::result::Result<T, SubscriptionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SubscriptionError::invalid_identifier("channel", "nope").code(),
            "INVALID_IDENTIFIER"
        );
        assert_eq!(SubscriptionError::store_unavailable("down").code(), "STORE_UNAVAILABLE");
        assert_eq!(
            SubscriptionError::constraint_violation("u1", "c1").code(),
            "CONSTRAINT_VIOLATION"
        );
        assert_eq!(SubscriptionError::Unauthenticated.code(), "UNAUTHENTICATED");
    }

    #[test]
    fn test_caller_errors() {
        assert!(SubscriptionError::invalid_identifier("subscriber", "x").is_caller_error());
        assert!(SubscriptionError::Unauthenticated.is_caller_error());
        assert!(!SubscriptionError::store_unavailable("timeout").is_caller_error());
    }

    #[test]
    fn test_display_includes_field() {
        let err = SubscriptionError::invalid_identifier("channel", "not-an-id");
        assert_eq!(err.to_string(), "Invalid identifier for channel: \"not-an-id\"");
    }
}
