use async_trait::async_trait;
use teloxide::prelude::*;

use morningbrief_briefing::{ChannelError, DeliveryChannel};

use crate::send;

/// Push side of the Telegram adapter: delivers scheduled briefings.
pub struct TelegramChannel {
    bot: Bot,
}

impl TelegramChannel {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl DeliveryChannel for TelegramChannel {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), ChannelError> {
        // Recipient is a Telegram chat ID (i64 encoded as string).
        let id: i64 = chat_id
            .parse()
            .map_err(|_| ChannelError::InvalidRecipient(chat_id.to_string()))?;
        send::send_chunked(&self.bot, ChatId(id), text)
            .await
            .map_err(|e| ChannelError::Send(e.to_string()))
    }
}
