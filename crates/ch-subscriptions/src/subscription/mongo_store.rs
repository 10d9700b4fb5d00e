//! MongoDB Edge Store
//!
//! Uniqueness of a pair is enforced by the `subscriber_channel_unique`
//! index (see `shared::indexes`); a losing insert surfaces as a duplicate
//! key error and is reported as [`InsertOutcome::Conflict`].

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Client, Collection, Database};
use tracing::info;

use crate::identity::Identifier;
use crate::shared::error::{is_duplicate_key, Result};
use crate::subscription::entity::{EdgeKey, Subscription};
use crate::subscription::store::{EdgeStore, InsertOutcome};

pub const DEFAULT_COLLECTION: &str = "subscriptions";

pub struct MongoEdgeStore {
    collection: Collection<Subscription>,
}

impl MongoEdgeStore {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection: &str) -> Self {
        Self {
            collection: db.collection(collection),
        }
    }

    /// Connect to `uri` and use `database.collection` for edges.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        info!(database, collection, "Connected subscription store to MongoDB");
        Ok(Self::with_collection(&client.database(database), collection))
    }
}

#[async_trait]
impl EdgeStore for MongoEdgeStore {
    async fn find(&self, key: &EdgeKey) -> Result<Option<Subscription>> {
        Ok(self
            .collection
            .find_one(doc! {
                "subscriber": key.subscriber.as_str(),
                "channel": key.channel.as_str(),
            })
            .await?)
    }

    async fn insert(&self, edge: &Subscription) -> Result<InsertOutcome> {
        match self.collection.insert_one(edge).await {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_duplicate_key(&e) => Ok(InsertOutcome::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, edge: &Subscription) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": edge.id.as_str() }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn find_by_channel(&self, channel: &Identifier) -> Result<Vec<Subscription>> {
        let cursor = self
            .collection
            .find(doc! { "channel": channel.as_str() })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_subscriber(&self, subscriber: &Identifier) -> Result<Vec<Subscription>> {
        let cursor = self
            .collection
            .find(doc! { "subscriber": subscriber.as_str() })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn exists(&self, key: &EdgeKey) -> Result<bool> {
        let count = self
            .collection
            .count_documents(doc! {
                "subscriber": key.subscriber.as_str(),
                "channel": key.channel.as_str(),
            })
            .limit(1)
            .await?;
        Ok(count > 0)
    }
}
