//! Shared Module
//!
//! Cross-cutting concerns and shared utilities.

pub mod error;
pub mod indexes;
pub mod tsid;

pub use error::{Result, SubscriptionError};
pub use tsid::TsidGenerator;
