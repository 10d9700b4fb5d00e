//! ChannelHub Subscriptions
//!
//! Registry of directed "subscriber follows channel" edges:
//! - Toggle a subscription on or off for a (subscriber, channel) pair
//! - List the subscribers of a channel
//! - List the channels a subscriber follows
//! - Check whether a subscription exists
//!
//! ## Module Organization
//!
//! - `subscription` - entity, edge stores, registry and caller-facing operations
//! - `identity` - identifier validation collaborators
//! - `usecase` - caller context for operations run on behalf of a user
//! - `shared` - errors, id generation and MongoDB index setup

pub mod identity;
pub mod shared;
pub mod subscription;
pub mod usecase;

// Re-export common types from shared
pub use shared::error::{Result, SubscriptionError};
pub use shared::indexes::initialize_indexes;
pub use shared::tsid::TsidGenerator;

pub use identity::{Identifier, IdentityStore, ObjectIdIdentityStore, PatternIdentityStore};
pub use usecase::CallerContext;

// Re-export main subscription types for convenience
pub use subscription::entity::{EdgeKey, Subscription, ToggleOutcome};
pub use subscription::memory_store::MemoryEdgeStore;
pub use subscription::mongo_store::MongoEdgeStore;
pub use subscription::registry::SubscriptionRegistry;
pub use subscription::store::{EdgeStore, InsertOutcome};
