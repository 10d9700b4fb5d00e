//! Caller Context
//!
//! Who is calling and how to correlate their logs. Operations that act on
//! behalf of the caller take the subscriber identity from here rather than
//! from their command.

use chrono::{DateTime, Utc};
use tracing::{info_span, Span};

use crate::shared::error::{Result, SubscriptionError};
use crate::shared::tsid::TsidGenerator;

#[derive(Debug, Clone)]
pub struct CallerContext {
    /// Unique ID for this execution (generated)
    pub execution_id: String,
    /// ID for distributed tracing (usually from original request)
    pub correlation_id: String,
    /// Authenticated subscriber, if any
    pub subscriber_id: Option<String>,
    pub initiated_at: DateTime<Utc>,
}

impl CallerContext {
    /// Context for an authenticated caller.
    ///
    /// The correlation id starts as the execution id; use
    /// [`with_correlation`](Self::with_correlation) to carry an upstream one.
    pub fn authenticated(subscriber_id: impl Into<String>) -> Self {
        Self::build(Some(subscriber_id.into()))
    }

    pub fn anonymous() -> Self {
        Self::build(None)
    }

    fn build(subscriber_id: Option<String>) -> Self {
        let exec_id = format!("exec-{}", TsidGenerator::generate());
        Self {
            execution_id: exec_id.clone(),
            correlation_id: exec_id,
            subscriber_id,
            initiated_at: Utc::now(),
        }
    }

    pub fn with_correlation(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    /// The caller's subscriber id, or `Unauthenticated`.
    pub fn require_subscriber(&self) -> Result<&str> {
        self.subscriber_id
            .as_deref()
            .ok_or(SubscriptionError::Unauthenticated)
    }

    /// Span carrying this caller's tracing ids.
    pub fn span(&self, operation: &'static str) -> Span {
        info_span!(
            "subscription_op",
            operation,
            execution_id = %self.execution_id,
            correlation_id = %self.correlation_id,
        )
    }
}
