//! Use Case Infrastructure
//!
//! - `CallerContext` - the authenticated caller and tracing ids for an operation

pub mod caller_context;

pub use caller_context::CallerContext;
