use std::sync::Arc;

use chrono::{Timelike, Utc};
use futures_util::future::BoxFuture;
use tracing::{debug, error, info, warn};

use morningbrief_pipeline::{ContentPipeline, PipelineError};
use morningbrief_scheduler::{
    DailyTime, ScheduleEntry, ScheduleRegistry, SchedulerError, TriggerCallback,
};
use morningbrief_store::{PreferenceStore, UserPreference};

use crate::channel::DeliveryChannel;
use crate::error::{BriefingError, Result};
use crate::{format, greeting};

/// Keeps the schedule registry consistent with the preference store and
/// executes the fetch → format → deliver sequence.
///
/// "What should run" lives in the store; "what is running" lives in the
/// registry. Every mutation flows through here, and the registry callback
/// captures only the chat identity — the preference record is re-fetched at
/// fire time, so a record that changed after install is honoured.
pub struct Coordinator {
    store: PreferenceStore,
    registry: Arc<ScheduleRegistry>,
    pipeline: Arc<dyn ContentPipeline>,
    channel: Arc<dyn DeliveryChannel>,
}

impl Coordinator {
    pub fn new(
        store: PreferenceStore,
        registry: Arc<ScheduleRegistry>,
        pipeline: Arc<dyn ContentPipeline>,
        channel: Arc<dyn DeliveryChannel>,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            registry,
            pipeline,
            channel,
        })
    }

    /// Rebuild the registry from the store. Called once at startup.
    ///
    /// One bad record logs and continues — it must never abort the whole
    /// sync. Returns the number of schedules installed.
    pub fn sync_all(self: &Arc<Self>) -> usize {
        let prefs = match self.store.list_active() {
            Ok(prefs) => prefs,
            Err(e) => {
                error!(error = %e, "could not load active subscribers for sync");
                return 0;
            }
        };

        let mut synced = 0;
        for pref in prefs {
            match self.schedule_user(&pref) {
                Ok(entry) => {
                    debug!(chat_id = %pref.chat_id, time = %entry.time, "schedule synced");
                    synced += 1;
                }
                Err(e) => {
                    warn!(chat_id = %pref.chat_id, error = %e, "skipping bad schedule record");
                }
            }
        }
        info!(synced, "subscriber schedules synced");
        synced
    }

    /// Called by the preference mutation entry points after every
    /// successful upsert. Routes to registry replace/remove per the
    /// subscriber's active flag.
    pub fn on_preference_changed(self: &Arc<Self>, pref: &UserPreference) {
        if pref.active {
            if let Err(e) = self.schedule_user(pref) {
                error!(chat_id = %pref.chat_id, error = %e, "schedule update failed");
            }
        } else {
            self.registry.remove(&pref.chat_id);
        }
    }

    /// Called after a record is deleted from the store.
    pub fn on_preference_deleted(&self, chat_id: &str) {
        self.registry.remove(chat_id);
    }

    /// The registry callback for one scheduled firing.
    ///
    /// Nothing propagates out of here: an unknown or deactivated subscriber
    /// is skipped, and pipeline/channel failures are logged — tomorrow's
    /// firing is the retry.
    pub async fn deliver_scheduled(&self, chat_id: &str) {
        let pref = match self.store.get(chat_id) {
            Ok(Some(pref)) => pref,
            Ok(None) => {
                warn!(chat_id, "scheduled firing for unknown subscriber — skipping");
                return;
            }
            Err(e) => {
                error!(chat_id, error = %e, "preference load failed — skipping delivery");
                return;
            }
        };
        if !pref.active {
            debug!(chat_id, "subscriber deactivated since install — skipping");
            return;
        }

        let text = match self.build_briefing(&pref).await {
            Ok(text) => text,
            Err(e) => {
                warn!(chat_id, error = %e, "briefing generation failed");
                return;
            }
        };

        let scheduled_for = format!("{:02}:{:02}", pref.delivery_hour, pref.delivery_minute);
        match self.channel.send(chat_id, &text).await {
            Ok(()) => info!(chat_id, %scheduled_for, "scheduled briefing delivered"),
            Err(e) => warn!(chat_id, error = %e, "delivery failed"),
        }
    }

    /// Same pipeline, invoked for an explicit subscriber request. Returns
    /// the formatted briefing to the caller instead of pushing it.
    pub async fn deliver_on_demand(&self, chat_id: &str) -> Result<String> {
        let pref = self
            .store
            .get(chat_id)?
            .ok_or_else(|| BriefingError::NotFound {
                chat_id: chat_id.to_string(),
            })?;
        if pref.categories.is_empty() {
            return Err(BriefingError::NoCategories {
                chat_id: chat_id.to_string(),
            });
        }
        Ok(self.build_briefing(&pref).await?)
    }

    /// Cancel every live schedule. Called on process shutdown.
    pub fn shutdown(&self) {
        self.registry.shutdown();
    }

    fn schedule_user(
        self: &Arc<Self>,
        pref: &UserPreference,
    ) -> std::result::Result<ScheduleEntry, SchedulerError> {
        let time = DailyTime::new(pref.delivery_hour, pref.delivery_minute)?;
        self.registry.replace(&pref.chat_id, time, self.callback())
    }

    /// Build the trigger callback. Captures the coordinator and, at fire
    /// time, only the chat identity handed over by the engine.
    fn callback(self: &Arc<Self>) -> TriggerCallback {
        let coordinator = Arc::clone(self);
        Arc::new(move |chat_id: String| -> BoxFuture<'static, ()> {
            let coordinator = Arc::clone(&coordinator);
            Box::pin(async move {
                coordinator.deliver_scheduled(&chat_id).await;
            })
        })
    }

    async fn build_briefing(
        &self,
        pref: &UserPreference,
    ) -> std::result::Result<String, PipelineError> {
        let result = self.pipeline.produce_briefing(&pref.categories).await?;
        let line = greeting::greeting(Utc::now().hour(), pref.display_name.as_deref());
        Ok(format::format_briefing(&line, &result))
    }
}
