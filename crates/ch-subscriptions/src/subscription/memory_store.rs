//! In-Memory Edge Store (for testing/development)
//!
//! Edges live in a sharded map keyed by pair, with one secondary index per
//! direction. Both indexes are updated while the pair's shard is held, and
//! readers copy an index entry out before touching the primary map, so lock
//! order is always primary -> secondary.

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::trace;

use crate::identity::Identifier;
use crate::shared::error::Result;
use crate::subscription::entity::{EdgeKey, Subscription};
use crate::subscription::store::{EdgeStore, InsertOutcome};

pub struct MemoryEdgeStore {
    edges: DashMap<EdgeKey, Subscription>,
    /// channel -> subscribers
    by_channel: DashMap<Identifier, HashSet<Identifier>>,
    /// subscriber -> channels
    by_subscriber: DashMap<Identifier, HashSet<Identifier>>,
}

impl MemoryEdgeStore {
    pub fn new() -> Self {
        Self {
            edges: DashMap::new(),
            by_channel: DashMap::new(),
            by_subscriber: DashMap::new(),
        }
    }

    /// Number of edges currently stored.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    fn index(&self, key: &EdgeKey) {
        self.by_channel
            .entry(key.channel.clone())
            .or_default()
            .insert(key.subscriber.clone());
        self.by_subscriber
            .entry(key.subscriber.clone())
            .or_default()
            .insert(key.channel.clone());
    }

    fn unindex(&self, key: &EdgeKey) {
        remove_from_index(&self.by_channel, &key.channel, &key.subscriber);
        remove_from_index(&self.by_subscriber, &key.subscriber, &key.channel);
    }

    fn collect(&self, keys: impl Iterator<Item = EdgeKey>) -> Vec<Subscription> {
        keys.filter_map(|key| self.edges.get(&key).map(|edge| edge.value().clone()))
            .collect()
    }
}

fn remove_from_index(
    index: &DashMap<Identifier, HashSet<Identifier>>,
    outer: &Identifier,
    inner: &Identifier,
) {
    if let Some(mut members) = index.get_mut(outer) {
        members.remove(inner);
    }
    index.remove_if(outer, |_, members| members.is_empty());
}

fn snapshot(
    index: &DashMap<Identifier, HashSet<Identifier>>,
    outer: &Identifier,
) -> Vec<Identifier> {
    index
        .get(outer)
        .map(|members| members.iter().cloned().collect())
        .unwrap_or_default()
}

impl Default for MemoryEdgeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EdgeStore for MemoryEdgeStore {
    async fn find(&self, key: &EdgeKey) -> Result<Option<Subscription>> {
        Ok(self.edges.get(key).map(|edge| edge.value().clone()))
    }

    async fn insert(&self, edge: &Subscription) -> Result<InsertOutcome> {
        let key = edge.key();
        match self.edges.entry(key.clone()) {
            Entry::Occupied(_) => {
                trace!(subscriber = %key.subscriber, channel = %key.channel, "Insert lost to existing edge");
                Ok(InsertOutcome::Conflict)
            }
            Entry::Vacant(slot) => {
                self.index(&key);
                slot.insert(edge.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn delete(&self, edge: &Subscription) -> Result<bool> {
        let key = edge.key();
        match self.edges.entry(key.clone()) {
            Entry::Occupied(current) if current.get().id == edge.id => {
                self.unindex(&key);
                current.remove();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_by_channel(&self, channel: &Identifier) -> Result<Vec<Subscription>> {
        let subscribers = snapshot(&self.by_channel, channel);
        Ok(self.collect(
            subscribers
                .into_iter()
                .map(|subscriber| EdgeKey::new(subscriber, channel.clone())),
        ))
    }

    async fn find_by_subscriber(&self, subscriber: &Identifier) -> Result<Vec<Subscription>> {
        let channels = snapshot(&self.by_subscriber, subscriber);
        Ok(self.collect(
            channels
                .into_iter()
                .map(|channel| EdgeKey::new(subscriber.clone(), channel)),
        ))
    }

    async fn exists(&self, key: &EdgeKey) -> Result<bool> {
        Ok(self.edges.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(subscriber: &str, channel: &str) -> EdgeKey {
        EdgeKey::new(Identifier::new(subscriber), Identifier::new(channel))
    }

    #[tokio::test]
    async fn test_insert_is_conditional() {
        let store = MemoryEdgeStore::new();
        let first = Subscription::new(key("u1", "c1"));
        let second = Subscription::new(key("u1", "c1"));

        assert_eq!(store.insert(&first).await.unwrap(), InsertOutcome::Inserted);
        assert_eq!(store.insert(&second).await.unwrap(), InsertOutcome::Conflict);
        assert_eq!(store.len(), 1);
        assert_eq!(store.find(&key("u1", "c1")).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_delete_only_removes_the_edge_that_was_read() {
        let store = MemoryEdgeStore::new();
        let stale = Subscription::new(key("u1", "c1"));
        store.insert(&stale).await.unwrap();
        assert!(store.delete(&stale).await.unwrap());

        let fresh = Subscription::new(key("u1", "c1"));
        store.insert(&fresh).await.unwrap();

        // A second delete of the old edge must not take the new one with it
        assert!(!store.delete(&stale).await.unwrap());
        assert!(store.exists(&key("u1", "c1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_secondary_indexes_follow_edges() {
        let store = MemoryEdgeStore::new();
        let a = Subscription::new(key("u1", "c1"));
        let b = Subscription::new(key("u2", "c1"));
        let c = Subscription::new(key("u1", "c2"));
        for edge in [&a, &b, &c] {
            store.insert(edge).await.unwrap();
        }

        assert_eq!(store.find_by_channel(&Identifier::new("c1")).await.unwrap().len(), 2);
        assert_eq!(store.find_by_subscriber(&Identifier::new("u1")).await.unwrap().len(), 2);

        store.delete(&a).await.unwrap();
        let c1 = store.find_by_channel(&Identifier::new("c1")).await.unwrap();
        assert_eq!(c1, vec![b.clone()]);
        let u1 = store.find_by_subscriber(&Identifier::new("u1")).await.unwrap();
        assert_eq!(u1, vec![c.clone()]);

        store.delete(&b).await.unwrap();
        store.delete(&c).await.unwrap();
        assert!(store.is_empty());
        assert!(store.by_channel.is_empty());
        assert!(store.by_subscriber.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_keys_are_empty() {
        let store = MemoryEdgeStore::new();
        assert!(store.find(&key("u1", "c1")).await.unwrap().is_none());
        assert!(!store.exists(&key("u1", "c1")).await.unwrap());
        assert!(store.find_by_channel(&Identifier::new("c1")).await.unwrap().is_empty());
        assert!(store.find_by_subscriber(&Identifier::new("u1")).await.unwrap().is_empty());
    }
}
