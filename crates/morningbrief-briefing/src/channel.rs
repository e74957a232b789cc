use async_trait::async_trait;

use crate::error::ChannelError;

/// Push side of the delivery path, implemented by the messaging adapter.
///
/// Implementations must be `Send + Sync` so the coordinator can deliver to
/// many subscribers concurrently from scheduler tasks.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Deliver formatted text to one chat identity. Failures are transient
    /// from the coordinator's point of view (recipient blocked the bot,
    /// network error) and are logged, never retried within a cycle.
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), ChannelError>;
}
