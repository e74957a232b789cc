use serde::{Deserialize, Serialize};

/// Full subscriber record. Stored in SQLite; loaded on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreference {
    /// External chat identity (e.g. a Telegram chat id rendered as a string).
    /// Primary key; immutable once created.
    pub chat_id: String,
    /// Optional human-readable name spliced into greetings.
    pub display_name: Option<String>,
    /// Selected category labels. Stored as a JSON array in SQLite.
    /// Never empty while `active` is true.
    pub categories: Vec<String>,
    /// Daily delivery hour in the reference timezone, 0..=23.
    pub delivery_hour: u8,
    /// Daily delivery minute, 0..=59.
    pub delivery_minute: u8,
    /// False means "keep preferences but stop scheduled delivery".
    pub active: bool,
    /// ISO-8601 timestamp of record creation.
    pub created_at: String,
    /// ISO-8601 timestamp of the last mutation.
    pub updated_at: String,
}

/// Caller-supplied fields for an upsert. Timestamps are managed by the store.
#[derive(Debug, Clone)]
pub struct PreferenceInput {
    pub chat_id: String,
    pub display_name: Option<String>,
    pub categories: Vec<String>,
    pub delivery_hour: u8,
    pub delivery_minute: u8,
    pub active: bool,
}

impl PreferenceInput {
    /// A fresh record with the stock defaults: no categories yet, 07:00
    /// delivery, inactive until the subscriber picks a category.
    pub fn new(chat_id: &str, display_name: Option<String>) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            display_name,
            categories: Vec::new(),
            delivery_hour: 7,
            delivery_minute: 0,
            active: false,
        }
    }

    pub fn from_existing(pref: &UserPreference) -> Self {
        Self {
            chat_id: pref.chat_id.clone(),
            display_name: pref.display_name.clone(),
            categories: pref.categories.clone(),
            delivery_hour: pref.delivery_hour,
            delivery_minute: pref.delivery_minute,
            active: pref.active,
        }
    }
}
