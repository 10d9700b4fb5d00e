//! Subscription Registry
//!
//! Owns the edge store and enforces one edge per (subscriber, channel).
//!
//! A toggle holds the pair's lock stripe across its lookup and write, which
//! serialises toggles inside this process. Writers in other processes are
//! caught by the store's conditional writes: a conflicting insert or a
//! delete that found nothing to delete means someone else flipped the pair
//! first, and the toggle is run once more against the new state.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::identity::IdentityStore;
use crate::shared::error::{Result, SubscriptionError};
use crate::subscription::entity::{EdgeKey, Subscription, ToggleOutcome};
use crate::subscription::locks::PairLocks;
use crate::subscription::store::{EdgeStore, InsertOutcome};

enum Attempt {
    Done(ToggleOutcome),
    /// A concurrent writer changed the pair between lookup and write.
    Raced,
}

pub struct SubscriptionRegistry {
    store: Arc<dyn EdgeStore>,
    identity: Arc<dyn IdentityStore>,
    locks: PairLocks,
}

impl SubscriptionRegistry {
    pub fn new(store: Arc<dyn EdgeStore>, identity: Arc<dyn IdentityStore>) -> Self {
        Self {
            store,
            identity,
            locks: PairLocks::default(),
        }
    }

    /// Replace the default stripe count. Very small counts make unrelated
    /// pairs queue behind each other; a single stripe is only useful in tests.
    pub fn with_lock_stripes(mut self, stripes: usize) -> Self {
        self.locks = PairLocks::new(stripes);
        self
    }

    /// Subscribe if the pair is absent, unsubscribe if it is present.
    pub async fn toggle_edge(&self, subscriber: &str, channel: &str) -> Result<ToggleOutcome> {
        let key = self.edge_key(subscriber, channel)?;
        let _pair = self.locks.lock(&key).await;

        let outcome = match self.attempt_toggle(&key).await? {
            Attempt::Done(outcome) => outcome,
            Attempt::Raced => {
                metrics::counter!("subscriptions.toggle.conflicts_total").increment(1);
                warn!(
                    subscriber = %key.subscriber,
                    channel = %key.channel,
                    "Concurrent writer changed subscription, retrying toggle"
                );
                match self.attempt_toggle(&key).await? {
                    Attempt::Done(outcome) => outcome,
                    Attempt::Raced => {
                        error!(
                            subscriber = %key.subscriber,
                            channel = %key.channel,
                            "Subscription race unresolved after retry"
                        );
                        return Err(SubscriptionError::constraint_violation(
                            key.subscriber.as_str(),
                            key.channel.as_str(),
                        ));
                    }
                }
            }
        };

        match &outcome {
            ToggleOutcome::Created(edge) => {
                metrics::counter!("subscriptions.toggle.created_total").increment(1);
                info!(
                    subscription_id = %edge.id,
                    subscriber = %edge.subscriber,
                    channel = %edge.channel,
                    "Subscription created"
                );
            }
            ToggleOutcome::Removed => {
                metrics::counter!("subscriptions.toggle.removed_total").increment(1);
                info!(subscriber = %key.subscriber, channel = %key.channel, "Subscription removed");
            }
        }

        Ok(outcome)
    }

    /// All edges pointing at `channel`. Empty if it has no subscribers.
    pub async fn list_subscribers(&self, channel: &str) -> Result<Vec<Subscription>> {
        let channel = self.identity.validate("channel", channel)?;
        let edges = self.observe(self.store.find_by_channel(&channel).await)?;
        debug!(channel = %channel, count = edges.len(), "Listed subscribers");
        Ok(edges)
    }

    /// All edges originating from `subscriber`.
    pub async fn list_subscribed_channels(&self, subscriber: &str) -> Result<Vec<Subscription>> {
        let subscriber = self.identity.validate("subscriber", subscriber)?;
        let edges = self.observe(self.store.find_by_subscriber(&subscriber).await)?;
        debug!(subscriber = %subscriber, count = edges.len(), "Listed subscribed channels");
        Ok(edges)
    }

    pub async fn edge_exists(&self, subscriber: &str, channel: &str) -> Result<bool> {
        let key = self.edge_key(subscriber, channel)?;
        self.observe(self.store.exists(&key).await)
    }

    fn edge_key(&self, subscriber: &str, channel: &str) -> Result<EdgeKey> {
        Ok(EdgeKey::new(
            self.identity.validate("subscriber", subscriber)?,
            self.identity.validate("channel", channel)?,
        ))
    }

    async fn attempt_toggle(&self, key: &EdgeKey) -> Result<Attempt> {
        match self.observe(self.store.find(key).await)? {
            Some(existing) => {
                if self.observe(self.store.delete(&existing).await)? {
                    Ok(Attempt::Done(ToggleOutcome::Removed))
                } else {
                    Ok(Attempt::Raced)
                }
            }
            None => {
                let edge = Subscription::new(key.clone());
                match self.observe(self.store.insert(&edge).await)? {
                    InsertOutcome::Inserted => Ok(Attempt::Done(ToggleOutcome::Created(edge))),
                    InsertOutcome::Conflict => Ok(Attempt::Raced),
                }
            }
        }
    }

    /// Record store failures before handing them back unchanged.
    fn observe<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            metrics::counter!("subscriptions.store.errors_total").increment(1);
            error!(error = %e, "Subscription store operation failed");
        }
        result
    }
}
