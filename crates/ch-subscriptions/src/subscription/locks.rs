//! Striped pair locks
//!
//! Serialises toggles on the same (subscriber, channel) pair within one
//! process. Each pair hashes to one of a fixed number of stripes, so
//! unrelated pairs only contend when they share a stripe.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

use tokio::sync::{Mutex, MutexGuard};

use crate::subscription::entity::EdgeKey;

pub const DEFAULT_LOCK_STRIPES: usize = 64;

pub struct PairLocks {
    stripes: Box<[Mutex<()>]>,
    hasher: RandomState,
}

impl PairLocks {
    /// `stripes` is clamped to at least one.
    pub fn new(stripes: usize) -> Self {
        let stripes = stripes.max(1);
        Self {
            stripes: (0..stripes).map(|_| Mutex::new(())).collect(),
            hasher: RandomState::new(),
        }
    }

    pub fn stripe_for(&self, key: &EdgeKey) -> usize {
        (self.hasher.hash_one(key) % self.stripes.len() as u64) as usize
    }

    /// Hold the stripe for `key` until the guard is dropped.
    pub async fn lock(&self, key: &EdgeKey) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe_for(key)].lock().await
    }
}

impl Default for PairLocks {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_STRIPES)
    }
}
