//! Edge Store
//!
//! Storage seam for subscription edges. Writes are conditional so that a
//! racing writer is reported rather than silently overwritten:
//! - `insert` refuses to create a second edge for a pair
//! - `delete` only removes the exact edge that was read

use async_trait::async_trait;

use crate::identity::Identifier;
use crate::shared::error::Result;
use crate::subscription::entity::{EdgeKey, Subscription};

/// Outcome of a conditional insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Another edge already exists for the pair.
    Conflict,
}

#[async_trait]
pub trait EdgeStore: Send + Sync {
    /// The edge for an exact pair, if any.
    async fn find(&self, key: &EdgeKey) -> Result<Option<Subscription>>;

    /// Insert `edge` unless its pair already has one.
    async fn insert(&self, edge: &Subscription) -> Result<InsertOutcome>;

    /// Delete `edge` by id. Returns false if it was already gone.
    async fn delete(&self, edge: &Subscription) -> Result<bool>;

    async fn find_by_channel(&self, channel: &Identifier) -> Result<Vec<Subscription>>;

    async fn find_by_subscriber(&self, subscriber: &Identifier) -> Result<Vec<Subscription>>;

    async fn exists(&self, key: &EdgeKey) -> Result<bool> {
        Ok(self.find(key).await?.is_some())
    }
}
