//! Telegram handlers registered in the teloxide Dispatcher.
//!
//! Every successful store write here is followed by the matching
//! coordinator notification — the one contract the command surface must
//! honour for the registry to stay consistent with the store.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, MessageId};
use tracing::warn;

use morningbrief_briefing::BriefingError;
use morningbrief_pipeline::PipelineError;
use morningbrief_scheduler::DailyTime;
use morningbrief_store::{PreferenceInput, UserPreference};

use crate::context::TelegramAppContext;
use crate::keyboard;
use crate::send;

const HELP_TEXT: &str = "🤖 *MorningBrief Help*\n\n\
*Available Commands:*\n\
/start - Start using MorningBrief\n\
/categories - Select your news categories\n\
/briefing - Get your daily briefing now\n\
/settings - Manage your preferences\n\
/help - Show this help message\n\
/stop - Stop receiving briefings\n\n\
*How it works:*\n\
1. Select your preferred news categories\n\
2. Choose when you want to receive your daily briefing\n\
3. Get curated news summaries delivered automatically";

const STOPPED_TEXT: &str = "😢 You've been unsubscribed from MorningBrief.\n\n\
You can restart anytime by sending /start";

/// Main message handler. Dispatches the slash commands and nudges everything
/// else towards them.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    ctx: Arc<TelegramAppContext>,
) -> ResponseResult<()> {
    // Ignore messages from other bots.
    if msg.from.as_ref().map(|u| u.is_bot).unwrap_or(false) {
        return Ok(());
    }
    let text = match msg.text() {
        Some(t) => t.trim(),
        None => return Ok(()),
    };
    let chat_id = msg.chat.id;
    let chat_key = chat_id.0.to_string();
    let display_name = msg.from.as_ref().map(|u| u.first_name.clone());

    let command = text.split_whitespace().next().unwrap_or("");
    match command {
        "/start" => {
            let name = display_name.clone().unwrap_or_else(|| "there".to_string());
            let pref = register_subscriber(&ctx, &chat_key, display_name);
            let selected = pref.map(|p| p.categories).unwrap_or_default();

            let welcome = format!(
                "🌅 Welcome to MorningBrief, {name}!\n\n\
                 Get your daily news briefing delivered right here on Telegram. \
                 I'll curate the most important stories from your selected categories \
                 and deliver them in a concise, easy-to-read format.\n\n\
                 Let's get started by selecting your news categories:"
            );
            bot.send_message(chat_id, welcome)
                .reply_markup(keyboard::categories_keyboard(
                    &ctx.available_categories,
                    &selected,
                ))
                .await?;
        }
        "/help" => {
            send::send_chunked(&bot, chat_id, HELP_TEXT).await?;
        }
        "/categories" => {
            let selected = current_categories(&ctx, &chat_key);
            bot.send_message(
                chat_id,
                "📰 Select your news categories (you can choose multiple):",
            )
            .reply_markup(keyboard::categories_keyboard(
                &ctx.available_categories,
                &selected,
            ))
            .await?;
        }
        "/briefing" => {
            bot.send_message(chat_id, "📰 Generating your briefing...")
                .await?;
            match ctx.coordinator.deliver_on_demand(&chat_key).await {
                Ok(briefing) => send::send_chunked(&bot, chat_id, &briefing).await?,
                Err(e) => {
                    bot.send_message(chat_id, on_demand_error_text(&e)).await?;
                }
            }
        }
        "/settings" => {
            bot.send_message(chat_id, "⚙️ Settings\n\nWhat would you like to change?")
                .reply_markup(keyboard::settings_keyboard())
                .await?;
        }
        "/stop" => {
            deactivate_subscriber(&ctx, &chat_key);
            bot.send_message(chat_id, STOPPED_TEXT).await?;
        }
        _ => {
            bot.send_message(
                chat_id,
                "🤖 I understand commands better! Try:\n\
                 /briefing - Get your daily briefing\n\
                 /categories - Select news categories\n\
                 /help - Show all commands",
            )
            .await?;
        }
    }
    Ok(())
}

/// Callback handler for the inline keyboards (`cat_`, `time_`, `set_` data).
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    ctx: Arc<TelegramAppContext>,
) -> ResponseResult<()> {
    let Some(data) = q.data.clone() else {
        return Ok(());
    };
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };
    let chat_id = message.chat().id;
    let message_id = message.id();
    let chat_key = chat_id.0.to_string();
    let display_name = Some(q.from.first_name.clone());

    if let Some(category) = data.strip_prefix("cat_") {
        toggle_category(&bot, &ctx, chat_id, message_id, &chat_key, display_name, category)
            .await?;
    } else if let Some(time_str) = data.strip_prefix("time_") {
        set_delivery_time(&bot, &ctx, chat_id, message_id, &chat_key, time_str).await?;
    } else if let Some(action) = data.strip_prefix("set_") {
        match action {
            "categories" => {
                let selected = current_categories(&ctx, &chat_key);
                bot.edit_message_text(chat_id, message_id, "📰 Select your news categories:")
                    .reply_markup(keyboard::categories_keyboard(
                        &ctx.available_categories,
                        &selected,
                    ))
                    .await?;
            }
            "time" => {
                bot.edit_message_text(
                    chat_id,
                    message_id,
                    "⏰ When would you like to receive your daily briefing?",
                )
                .reply_markup(keyboard::times_keyboard())
                .await?;
            }
            "stop" => {
                deactivate_subscriber(&ctx, &chat_key);
                bot.edit_message_text(chat_id, message_id, STOPPED_TEXT).await?;
            }
            other => warn!(action = other, "unknown settings callback"),
        }
    }
    Ok(())
}

async fn toggle_category(
    bot: &Bot,
    ctx: &Arc<TelegramAppContext>,
    chat_id: ChatId,
    message_id: MessageId,
    chat_key: &str,
    display_name: Option<String>,
    category: &str,
) -> ResponseResult<()> {
    if !ctx.available_categories.iter().any(|c| c == category) {
        warn!(category, "toggle for unknown category");
        return Ok(());
    }

    let mut input = load_or_default(ctx, chat_key, display_name);
    let had_categories = !input.categories.is_empty();
    match input.categories.iter().position(|c| c == category) {
        Some(i) => {
            input.categories.remove(i);
        }
        None => {
            if input.categories.len() >= ctx.store.max_categories() {
                bot.send_message(
                    chat_id,
                    format!(
                        "❌ You can select up to {} categories.",
                        ctx.store.max_categories()
                    ),
                )
                .await?;
                return Ok(());
            }
            input.categories.push(category.to_string());
        }
    }
    // A subscriber with no categories left cannot stay scheduled.
    input.active = !input.categories.is_empty();

    let pref = match ctx.store.upsert(input) {
        Ok(pref) => pref,
        Err(e) => {
            warn!(chat_id = chat_key, error = %e, "category toggle failed");
            bot.send_message(chat_id, "❌ Could not update your categories — try again.")
                .await?;
            return Ok(());
        }
    };
    ctx.coordinator.on_preference_changed(&pref);

    bot.edit_message_reply_markup(chat_id, message_id)
        .reply_markup(keyboard::categories_keyboard(
            &ctx.available_categories,
            &pref.categories,
        ))
        .await?;

    // First category picked: move straight on to the delivery time.
    if !had_categories && !pref.categories.is_empty() {
        bot.send_message(
            chat_id,
            "⏰ When would you like to receive your daily briefing?",
        )
        .reply_markup(keyboard::times_keyboard())
        .await?;
    }
    Ok(())
}

async fn set_delivery_time(
    bot: &Bot,
    ctx: &Arc<TelegramAppContext>,
    chat_id: ChatId,
    message_id: MessageId,
    chat_key: &str,
    time_str: &str,
) -> ResponseResult<()> {
    let time: DailyTime = match time_str.parse() {
        Ok(t) => t,
        Err(_) => {
            warn!(time = time_str, "unparseable time callback");
            return Ok(());
        }
    };

    let mut input = load_or_default(ctx, chat_key, None);
    input.delivery_hour = time.hour();
    input.delivery_minute = time.minute();
    input.active = !input.categories.is_empty();

    let pref = match ctx.store.upsert(input) {
        Ok(pref) => pref,
        Err(e) => {
            warn!(chat_id = chat_key, error = %e, "delivery time update failed");
            bot.send_message(chat_id, "❌ Could not update your delivery time — try again.")
                .await?;
            return Ok(());
        }
    };
    ctx.coordinator.on_preference_changed(&pref);

    bot.edit_message_text(
        chat_id,
        message_id,
        format!(
            "✅ Perfect! You'll receive your daily briefing at {time} UTC.\n\n\
             🎉 Setup complete! You can:\n\
             • Get your briefing now with /briefing\n\
             • Change settings anytime with /settings\n\
             • Get help with /help"
        ),
    )
    .await?;
    Ok(())
}

/// Create-or-reactivate on /start. A returning subscriber with categories
/// goes straight back to scheduled.
fn register_subscriber(
    ctx: &Arc<TelegramAppContext>,
    chat_key: &str,
    display_name: Option<String>,
) -> Option<UserPreference> {
    let input = match ctx.store.get(chat_key) {
        Ok(Some(existing)) => {
            let mut input = PreferenceInput::from_existing(&existing);
            if display_name.is_some() {
                input.display_name = display_name;
            }
            input.active = !input.categories.is_empty();
            input
        }
        Ok(None) => PreferenceInput::new(chat_key, display_name),
        Err(e) => {
            warn!(chat_id = chat_key, error = %e, "subscriber lookup failed");
            return None;
        }
    };
    match ctx.store.upsert(input) {
        Ok(pref) => {
            ctx.coordinator.on_preference_changed(&pref);
            Some(pref)
        }
        Err(e) => {
            warn!(chat_id = chat_key, error = %e, "subscriber registration failed");
            None
        }
    }
}

fn deactivate_subscriber(ctx: &Arc<TelegramAppContext>, chat_key: &str) {
    match ctx.store.get(chat_key) {
        Ok(Some(existing)) => {
            let mut input = PreferenceInput::from_existing(&existing);
            input.active = false;
            match ctx.store.upsert(input) {
                Ok(pref) => ctx.coordinator.on_preference_changed(&pref),
                Err(e) => warn!(chat_id = chat_key, error = %e, "deactivation failed"),
            }
        }
        Ok(None) => {}
        Err(e) => warn!(chat_id = chat_key, error = %e, "subscriber lookup failed"),
    }
}

fn load_or_default(
    ctx: &Arc<TelegramAppContext>,
    chat_key: &str,
    display_name: Option<String>,
) -> PreferenceInput {
    match ctx.store.get(chat_key) {
        Ok(Some(existing)) => {
            let mut input = PreferenceInput::from_existing(&existing);
            if display_name.is_some() {
                input.display_name = display_name;
            }
            input
        }
        _ => PreferenceInput::new(chat_key, display_name),
    }
}

fn current_categories(ctx: &Arc<TelegramAppContext>, chat_key: &str) -> Vec<String> {
    ctx.store
        .get(chat_key)
        .ok()
        .flatten()
        .map(|p| p.categories)
        .unwrap_or_default()
}

fn on_demand_error_text(err: &BriefingError) -> &'static str {
    match err {
        BriefingError::NotFound { .. } | BriefingError::NoCategories { .. } => {
            "❌ Please select your news categories first using /categories"
        }
        BriefingError::Pipeline(PipelineError::NoArticles) => {
            "📰 No recent articles found for your selected categories. Try again later!"
        }
        _ => "❌ Sorry, I couldn't generate your briefing right now. Please try again later.",
    }
}
