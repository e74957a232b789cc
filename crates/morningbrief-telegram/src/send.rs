//! Message sending helpers for the Telegram adapter.
//!
//! Telegram's message limit is 4096 characters; we use 4090 for safety.
//! Tries Markdown first and falls back to plain text if Telegram rejects
//! the parse mode.

use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::ParseMode;

/// Maximum characters per Telegram message (limit is 4096; we use 4090 for safety).
const CHUNK_MAX: usize = 4090;

/// Split briefing text into Telegram-sized chunks at line boundaries.
///
/// Briefings are plain paragraphs with bullet lines, so a newline split is
/// always available; a single line longer than the limit is force-split.
pub fn split_chunks(text: &str) -> Vec<String> {
    if text.len() <= CHUNK_MAX {
        return vec![text.to_string()];
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in text.split('\n') {
        let cost = if current.is_empty() {
            line.len()
        } else {
            1 + line.len()
        };
        if !current.is_empty() && current.len() + cost > CHUNK_MAX {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    // Force-split any chunk that still exceeds the limit (a single line
    // longer than 4090 chars).
    let mut result = Vec::new();
    for chunk in chunks {
        if chunk.len() <= CHUNK_MAX {
            result.push(chunk);
            continue;
        }
        let mut remaining = chunk.as_str();
        while remaining.len() > CHUNK_MAX {
            let split_at = match remaining[..CHUNK_MAX].rfind(' ') {
                Some(i) if i > 0 => i,
                _ => CHUNK_MAX,
            };
            result.push(remaining[..split_at].to_string());
            remaining = remaining[split_at..].trim_start();
        }
        if !remaining.is_empty() {
            result.push(remaining.to_string());
        }
    }
    result
}

/// Send `text` to `chat_id` in chunks, Markdown first with a plain-text
/// fallback per chunk. A 100ms delay between chunks keeps under rate limits.
pub async fn send_chunked(
    bot: &Bot,
    chat_id: ChatId,
    text: &str,
) -> Result<(), teloxide::RequestError> {
    let chunks = split_chunks(text);
    for (i, chunk) in chunks.iter().enumerate() {
        let sent = bot
            .send_message(chat_id, chunk)
            .parse_mode(ParseMode::Markdown)
            .await;

        if sent.is_err() {
            // Markdown rejected — retry the chunk as plain text.
            bot.send_message(chat_id, chunk).await?;
        }

        if i + 1 < chunks.len() {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_single_chunk() {
        let chunks = split_chunks("Good morning!");
        assert_eq!(chunks, vec!["Good morning!"]);
    }

    #[test]
    fn exactly_chunk_max_is_single_chunk() {
        let text = "a".repeat(CHUNK_MAX);
        assert_eq!(split_chunks(&text).len(), 1);
    }

    #[test]
    fn over_limit_splits_on_newline() {
        let line = "a".repeat(2000);
        let text = format!("{line}\n{line}\n{line}");
        let chunks = split_chunks(&text);
        assert!(chunks.len() >= 2);
        for c in &chunks {
            assert!(c.len() <= CHUNK_MAX, "chunk too large: {}", c.len());
        }
    }

    #[test]
    fn very_long_single_line_force_splits() {
        let text = "x".repeat(9000);
        let chunks = split_chunks(&text);
        assert!(chunks.len() >= 2);
        for c in &chunks {
            assert!(c.len() <= CHUNK_MAX);
        }
    }

    #[test]
    fn nothing_is_lost_across_chunks() {
        let line = "word ".repeat(500);
        let text = format!("{line}\n{line}");
        let rejoined: String = split_chunks(&text).join("\n");
        // Whitespace at split points may differ; words must all survive.
        assert_eq!(
            rejoined.split_whitespace().count(),
            text.split_whitespace().count()
        );
    }
}
