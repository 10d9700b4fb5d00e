//! Subscription Aggregate
//!
//! Directed subscriber -> channel edges and the registry that toggles them.

pub mod entity;
pub mod locks;
pub mod memory_store;
pub mod mongo_store;
pub mod operations;
pub mod registry;
pub mod store;

// Re-export main types
pub use entity::{EdgeKey, Subscription, ToggleOutcome};
pub use memory_store::MemoryEdgeStore;
pub use mongo_store::MongoEdgeStore;
pub use registry::SubscriptionRegistry;
pub use store::{EdgeStore, InsertOutcome};
