use std::sync::Arc;

use morningbrief_briefing::Coordinator;
use morningbrief_store::PreferenceStore;

/// Everything the Telegram handlers need, injected into the dispatcher.
pub struct TelegramAppContext {
    pub store: PreferenceStore,
    pub coordinator: Arc<Coordinator>,
    /// Category labels offered in the selection keyboard.
    pub available_categories: Vec<String>,
}
