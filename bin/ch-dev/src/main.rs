//! ChannelHub Developer CLI
//!
//! Drives the subscription registry from the shell:
//! - toggle / status on behalf of a subscriber
//! - list subscribers of a channel, or channels of a subscriber
//! - create MongoDB indexes
//!
//! With the memory backend every invocation starts from an empty registry,
//! so it is mostly useful for checking configuration and identifier formats.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;

use ch_config::{AppConfig, ConfigLoader, IdentityFormat, StoreBackend};
use ch_subscriptions::subscription::operations::{
    SubscriptionStatusQuery, ToggleSubscriptionCommand, ToggleSubscriptionUseCase,
};
use ch_subscriptions::{
    initialize_indexes, CallerContext, EdgeStore, IdentityStore, MemoryEdgeStore, MongoEdgeStore,
    ObjectIdIdentityStore, PatternIdentityStore, Subscription, SubscriptionRegistry, ToggleOutcome,
};

/// ChannelHub developer CLI
#[derive(Parser, Debug)]
#[command(name = "ch-dev")]
#[command(about = "ChannelHub developer CLI - toggle and inspect channel subscriptions")]
struct Args {
    /// Path to a TOML config file (otherwise CHANNELHUB_CONFIG or the standard paths)
    #[arg(long, env = "CHANNELHUB_CONFIG")]
    config: Option<PathBuf>,

    /// Correlation id attached to logs for this invocation
    #[arg(long)]
    correlation_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Subscribe to a channel, or unsubscribe if already subscribed
    Toggle {
        #[arg(long)]
        subscriber: String,
        #[arg(long)]
        channel: String,
    },
    /// Whether a subscriber follows a channel
    Status {
        #[arg(long)]
        subscriber: String,
        #[arg(long)]
        channel: String,
    },
    /// List the subscribers of a channel
    Subscribers {
        #[arg(long)]
        channel: String,
    },
    /// List the channels a subscriber follows
    Channels {
        #[arg(long)]
        subscriber: String,
    },
    /// Create the MongoDB indexes for the subscription collection
    InitIndexes,
    /// Print an example configuration file
    ExampleConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    ch_common::init_logging("ch-dev");

    let args = Args::parse();

    if let Command::ExampleConfig = args.command {
        print!("{}", AppConfig::example_toml());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => ConfigLoader::with_path(path).load(),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    info!(
        backend = %config.store.backend,
        lock_stripes = config.registry.lock_stripes,
        dev_mode = config.dev_mode,
        "Configuration loaded"
    );

    if let Command::InitIndexes = args.command {
        return init_indexes(&config).await;
    }

    let registry = Arc::new(build_registry(&config).await?);
    let caller = |subscriber: &str| {
        let ctx = CallerContext::authenticated(subscriber);
        match &args.correlation_id {
            Some(id) => ctx.with_correlation(id.clone()),
            None => ctx,
        }
    };

    let output = match &args.command {
        Command::Toggle { subscriber, channel } => {
            let use_case = ToggleSubscriptionUseCase::new(registry.clone());
            let command = ToggleSubscriptionCommand {
                channel_id: channel.clone(),
            };
            match use_case.execute(command, &caller(subscriber)).await? {
                ToggleOutcome::Created(edge) => json!({
                    "edgeRemoved": false,
                    "subscription": edge_json(&edge),
                }),
                ToggleOutcome::Removed => json!({ "edgeRemoved": true }),
            }
        }
        Command::Status { subscriber, channel } => {
            let query = SubscriptionStatusQuery::new(registry.clone());
            let status = query.execute(channel, &caller(subscriber)).await?;
            serde_json::to_value(status)?
        }
        Command::Subscribers { channel } => {
            let edges = registry.list_subscribers(channel).await?;
            json!(edges.iter().map(edge_json).collect::<Vec<_>>())
        }
        Command::Channels { subscriber } => {
            let edges = registry.list_subscribed_channels(subscriber).await?;
            json!(edges.iter().map(edge_json).collect::<Vec<_>>())
        }
        Command::InitIndexes | Command::ExampleConfig => unreachable!("handled above"),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn build_registry(config: &AppConfig) -> Result<SubscriptionRegistry> {
    let identity: Arc<dyn IdentityStore> = match config.identity.format {
        IdentityFormat::ObjectId => Arc::new(ObjectIdIdentityStore::new()),
        IdentityFormat::Pattern => Arc::new(
            PatternIdentityStore::new(&config.identity.pattern)
                .with_context(|| format!("Invalid identity.pattern '{}'", config.identity.pattern))?,
        ),
    };

    let store: Arc<dyn EdgeStore> = match config.store.backend {
        StoreBackend::Memory => Arc::new(MemoryEdgeStore::new()),
        StoreBackend::Mongodb => Arc::new(
            MongoEdgeStore::connect(
                &config.mongodb.uri,
                &config.mongodb.database,
                &config.mongodb.collection,
            )
            .await?,
        ),
    };

    Ok(SubscriptionRegistry::new(store, identity).with_lock_stripes(config.registry.lock_stripes))
}

async fn init_indexes(config: &AppConfig) -> Result<()> {
    if config.store.backend != StoreBackend::Mongodb {
        bail!("init-indexes requires store.backend = \"mongodb\"");
    }

    let client = mongodb::Client::with_uri_str(&config.mongodb.uri)
        .await
        .context("Failed to connect to MongoDB")?;
    let db = client.database(&config.mongodb.database);
    initialize_indexes(&db, &config.mongodb.collection).await?;

    println!(
        "Indexes ready on {}.{}",
        config.mongodb.database, config.mongodb.collection
    );
    Ok(())
}

fn edge_json(edge: &Subscription) -> serde_json::Value {
    json!({
        "id": edge.id,
        "subscriber": edge.subscriber.as_str(),
        "channel": edge.channel.as_str(),
        "createdAt": edge.created_at.to_rfc3339(),
    })
}
