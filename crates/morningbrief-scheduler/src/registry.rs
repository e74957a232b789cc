use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, info};

use crate::engine::TriggerSet;
use crate::error::{Result, SchedulerError};
use crate::types::{DailyTime, ScheduleEntry, TriggerCallback};

/// Owner of the `chat_id` → [`ScheduleEntry`] mapping.
///
/// All mutation of the trigger set for subscriber schedules goes through
/// this registry, never through the trigger set directly. Every operation
/// holds the registry lock for its full duration, so mutations for one
/// chat identity are applied strictly in the order they were issued and
/// two live triggers for one subscriber can never exist.
pub struct ScheduleRegistry {
    triggers: TriggerSet,
    entries: Mutex<HashMap<String, ScheduleEntry>>,
}

impl ScheduleRegistry {
    pub fn new(triggers: TriggerSet) -> Self {
        Self {
            triggers,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a recurring daily trigger for `chat_id`.
    ///
    /// Fails with `DuplicateSchedule` if a live entry already exists —
    /// callers that may race an existing entry use [`replace`](Self::replace).
    pub fn install(
        &self,
        chat_id: &str,
        time: DailyTime,
        callback: TriggerCallback,
    ) -> Result<ScheduleEntry> {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(chat_id) {
            return Err(SchedulerError::DuplicateSchedule {
                chat_id: chat_id.to_string(),
            });
        }
        let entry = self.install_locked(&mut entries, chat_id, time, callback)?;
        info!(chat_id, time = %entry.time, "schedule installed");
        Ok(entry)
    }

    /// Install-or-update. An existing entry at the same time is returned
    /// unchanged (no trigger churn); otherwise the old trigger is cancelled
    /// and a new one installed.
    pub fn replace(
        &self,
        chat_id: &str,
        time: DailyTime,
        callback: TriggerCallback,
    ) -> Result<ScheduleEntry> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(existing) = entries.get(chat_id) {
            if existing.time == time {
                debug!(chat_id, time = %time, "schedule unchanged — keeping trigger");
                return Ok(existing.clone());
            }
            let old = existing.trigger_id;
            self.triggers.cancel(old);
        }
        let entry = self.install_locked(&mut entries, chat_id, time, callback)?;
        info!(chat_id, time = %entry.time, "schedule replaced");
        Ok(entry)
    }

    /// Cancel and discard the entry for `chat_id`, removing all future
    /// occurrences. No-op (not an error) if absent.
    pub fn remove(&self, chat_id: &str) {
        let mut entries = self.entries.lock().unwrap();
        match entries.remove(chat_id) {
            Some(entry) => {
                self.triggers.cancel(entry.trigger_id);
                info!(chat_id, "schedule removed");
            }
            None => debug!(chat_id, "remove: no schedule present"),
        }
    }

    /// Chat identities with a live entry, sorted for stable output.
    pub fn list_active(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap();
        let mut ids: Vec<String> = entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn get(&self, chat_id: &str) -> Option<ScheduleEntry> {
        self.entries.lock().unwrap().get(chat_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Cancel every live trigger. Called on process shutdown.
    pub fn shutdown(&self) {
        let mut entries = self.entries.lock().unwrap();
        let count = entries.len();
        for (_, entry) in entries.drain() {
            self.triggers.cancel(entry.trigger_id);
        }
        info!(count, "all schedules cancelled");
    }

    fn install_locked(
        &self,
        entries: &mut HashMap<String, ScheduleEntry>,
        chat_id: &str,
        time: DailyTime,
        callback: TriggerCallback,
    ) -> Result<ScheduleEntry> {
        let trigger_id = self.triggers.add(chat_id, time, callback)?;
        let entry = ScheduleEntry {
            chat_id: chat_id.to_string(),
            trigger_id,
            time,
        };
        entries.insert(chat_id.to_string(), entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::BoxFuture;
    use std::sync::Arc;

    fn noop() -> TriggerCallback {
        Arc::new(|_chat_id| -> BoxFuture<'static, ()> { Box::pin(async {}) })
    }

    fn seven() -> DailyTime {
        DailyTime::new(7, 0).unwrap()
    }

    #[test]
    fn install_rejects_duplicate() {
        let triggers = TriggerSet::new();
        let registry = ScheduleRegistry::new(triggers.clone());

        registry.install("u1", seven(), noop()).unwrap();
        let err = registry.install("u1", seven(), noop()).unwrap_err();
        assert!(matches!(err, SchedulerError::DuplicateSchedule { .. }));
        assert_eq!(triggers.len(), 1);
    }

    #[test]
    fn replace_same_time_keeps_trigger() {
        let triggers = TriggerSet::new();
        let registry = ScheduleRegistry::new(triggers.clone());

        let first = registry.replace("u1", seven(), noop()).unwrap();
        let second = registry.replace("u1", seven(), noop()).unwrap();

        // Same underlying handle retained; exactly one live trigger, zero churn.
        assert_eq!(first.trigger_id, second.trigger_id);
        assert_eq!(triggers.len(), 1);
        assert!(triggers.contains(first.trigger_id));
    }

    #[test]
    fn replace_new_time_swaps_trigger() {
        let triggers = TriggerSet::new();
        let registry = ScheduleRegistry::new(triggers.clone());

        let old = registry.replace("u1", seven(), noop()).unwrap();
        let new = registry
            .replace("u1", DailyTime::new(8, 0).unwrap(), noop())
            .unwrap();

        assert_ne!(old.trigger_id, new.trigger_id);
        assert!(!triggers.contains(old.trigger_id));
        assert!(triggers.contains(new.trigger_id));
        assert_eq!(triggers.len(), 1);
        assert_eq!(registry.get("u1").unwrap().time, new.time);
    }

    #[test]
    fn remove_is_idempotent() {
        let triggers = TriggerSet::new();
        let registry = ScheduleRegistry::new(triggers.clone());

        registry.install("u1", seven(), noop()).unwrap();
        registry.remove("u1");
        assert!(registry.is_empty());
        assert!(triggers.is_empty());

        // Absent entry: no-op, registry unchanged.
        registry.remove("u1");
        assert!(registry.is_empty());
    }

    #[test]
    fn list_active_is_sorted() {
        let registry = ScheduleRegistry::new(TriggerSet::new());
        registry.install("zed", seven(), noop()).unwrap();
        registry.install("amy", seven(), noop()).unwrap();
        assert_eq!(registry.list_active(), vec!["amy", "zed"]);
    }

    #[test]
    fn shutdown_cancels_everything() {
        let triggers = TriggerSet::new();
        let registry = ScheduleRegistry::new(triggers.clone());
        registry.install("u1", seven(), noop()).unwrap();
        registry.install("u2", seven(), noop()).unwrap();

        registry.shutdown();
        assert!(registry.is_empty());
        assert!(triggers.is_empty());
    }
}
