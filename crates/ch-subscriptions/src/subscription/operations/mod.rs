//! Subscription Operations
//!
//! Caller-facing operations: the subscriber is always the authenticated
//! caller taken from [`CallerContext`](crate::usecase::CallerContext).

pub mod status;
pub mod toggle;

pub use status::{SubscriptionStatus, SubscriptionStatusQuery};
pub use toggle::{ToggleSubscriptionCommand, ToggleSubscriptionUseCase};
