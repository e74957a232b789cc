//! `morningbrief-store` — persisted subscriber preferences.
//!
//! One SQLite table keyed by `chat_id` holds everything a subscriber has
//! chosen: categories, daily delivery time, active flag. The schedule
//! registry is rebuilt from this table at startup, so nothing else needs to
//! survive a restart.

pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::PreferenceStore;
pub use types::{PreferenceInput, UserPreference};
