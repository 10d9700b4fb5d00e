//! Subscription Entity
//!
//! One directed edge: `subscriber` follows `channel`. An edge is either
//! present or absent; it is never updated in place.

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Identifier;

/// The directed pair an edge is unique on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub subscriber: Identifier,
    pub channel: Identifier,
}

impl EdgeKey {
    pub fn new(subscriber: Identifier, channel: Identifier) -> Self {
        Self { subscriber, channel }
    }

    pub fn is_self_subscription(&self) -> bool {
        self.subscriber == self.channel
    }
}

/// Subscription entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// TSID as Crockford Base32 string
    #[serde(rename = "_id")]
    pub id: String,

    /// The following user
    pub subscriber: Identifier,

    /// The followed user or channel
    pub channel: Identifier,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(key: EdgeKey) -> Self {
        Self {
            id: crate::TsidGenerator::generate(),
            subscriber: key.subscriber,
            channel: key.channel,
            created_at: Utc::now(),
        }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.subscriber.clone(), self.channel.clone())
    }
}

/// Result of toggling a (subscriber, channel) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The pair was absent; this edge now exists.
    Created(Subscription),
    /// The pair was present and its edge has been deleted.
    Removed,
}

impl ToggleOutcome {
    pub fn edge_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }

    pub fn edge(&self) -> Option<&Subscription> {
        match self {
            Self::Created(edge) => Some(edge),
            Self::Removed => None,
        }
    }

    pub fn into_edge(self) -> Option<Subscription> {
        match self {
            Self::Created(edge) => Some(edge),
            Self::Removed => None,
        }
    }
}
