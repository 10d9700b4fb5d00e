//! Toggle Subscription Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::shared::error::Result;
use crate::subscription::entity::ToggleOutcome;
use crate::subscription::registry::SubscriptionRegistry;
use crate::usecase::CallerContext;

/// Command for subscribing to or unsubscribing from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleSubscriptionCommand {
    /// Channel to follow or unfollow
    pub channel_id: String,
}

/// Toggles the caller's subscription to a channel.
pub struct ToggleSubscriptionUseCase {
    registry: Arc<SubscriptionRegistry>,
}

impl ToggleSubscriptionUseCase {
    pub fn new(registry: Arc<SubscriptionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(
        &self,
        command: ToggleSubscriptionCommand,
        ctx: &CallerContext,
    ) -> Result<ToggleOutcome> {
        let subscriber = ctx.require_subscriber()?;

        self.registry
            .toggle_edge(subscriber, &command.channel_id)
            .instrument(ctx.span("toggle_subscription"))
            .await
    }
}
