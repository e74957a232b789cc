//! Telegram channel adapter.
//!
//! Wraps a teloxide `Bot` + `Dispatcher` and drives the long-polling event
//! loop until the process exits. Long polling — no public URL required.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tracing::{info, warn};

use crate::context::TelegramAppContext;
use crate::handler;

pub struct TelegramAdapter {
    bot: Bot,
    ctx: Arc<TelegramAppContext>,
}

impl TelegramAdapter {
    pub fn new(bot: Bot, ctx: Arc<TelegramAppContext>) -> Self {
        Self { bot, ctx }
    }

    /// Connect to Telegram and drive the long-polling loop.
    ///
    /// Never returns — runs for the lifetime of the process.
    pub async fn run(self) {
        if let Err(e) = self.bot.set_my_commands(bot_commands()).await {
            warn!(error = %e, "could not register Telegram command menu");
        }

        info!("Telegram: starting long-polling dispatcher");

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handler::handle_message))
            .branch(Update::filter_callback_query().endpoint(handler::handle_callback));

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.ctx])
            .default_handler(|_upd| async {})
            .build()
            .dispatch()
            .await;
    }
}

fn bot_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "Start using MorningBrief"),
        BotCommand::new("categories", "Select news categories"),
        BotCommand::new("briefing", "Get your daily briefing now"),
        BotCommand::new("settings", "Manage your preferences"),
        BotCommand::new("help", "Show help information"),
        BotCommand::new("stop", "Stop receiving briefings"),
    ]
}
