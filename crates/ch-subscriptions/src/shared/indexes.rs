//! MongoDB Index Initialization
//!
//! Creates the indexes the subscription collection relies on. The unique
//! compound index is what turns a racing second insert into a duplicate-key
//! error instead of a second edge.

use mongodb::{bson::doc, options::IndexOptions, Database, IndexModel};
use tracing::info;

/// Name of the unique (subscriber, channel) index.
pub const EDGE_UNIQUE_INDEX: &str = "subscriber_channel_unique";

/// Initialize indexes on the given subscription collection
pub async fn initialize_indexes(db: &Database, collection: &str) -> Result<(), mongodb::error::Error> {
    info!(collection, "Initializing MongoDB indexes...");

    let subscriptions = db.collection::<mongodb::bson::Document>(collection);

    // One edge per directed pair
    subscriptions
        .create_index(
            IndexModel::builder()
                .keys(doc! { "subscriber": 1, "channel": 1 })
                .options(
                    IndexOptions::builder()
                        .name(EDGE_UNIQUE_INDEX.to_string())
                        .unique(true)
                        .build(),
                )
                .build(),
        )
        .await?;

    // Subscribers of a channel
    subscriptions
        .create_index(
            IndexModel::builder()
                .keys(doc! { "channel": 1 })
                .build(),
        )
        .await?;

    // Channels followed by a subscriber
    subscriptions
        .create_index(
            IndexModel::builder()
                .keys(doc! { "subscriber": 1 })
                .build(),
        )
        .await?;

    info!(collection, "MongoDB indexes initialized successfully");
    Ok(())
}
