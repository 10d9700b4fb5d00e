//! Subscription Status Query

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::shared::error::Result;
use crate::subscription::registry::SubscriptionRegistry;
use crate::usecase::CallerContext;

/// Whether the caller follows a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub is_subscribed: bool,
}

/// Reports the caller's subscription status for a channel.
///
/// Validates the channel exactly like the toggle does.
pub struct SubscriptionStatusQuery {
    registry: Arc<SubscriptionRegistry>,
}

impl SubscriptionStatusQuery {
    pub fn new(registry: Arc<SubscriptionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self, channel_id: &str, ctx: &CallerContext) -> Result<SubscriptionStatus> {
        let subscriber = ctx.require_subscriber()?;

        let is_subscribed = self
            .registry
            .edge_exists(subscriber, channel_id)
            .instrument(ctx.span("subscription_status"))
            .await?;

        Ok(SubscriptionStatus { is_subscribed })
    }
}
